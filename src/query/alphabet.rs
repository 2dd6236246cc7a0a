//! Search alphabets
//!
//! The order of both alphabets is fixed; it determines the order in which
//! queries are visited and therefore makes runs reproducible.

/// Characters used for the single-character seed queries
pub const FIRST_SEARCH_CHARACTERS: &str = "abcdefghijklmnopqrstuvwxyz";

/// Characters appended to a truncated query to narrow it by one level
pub const GENERAL_SEARCH_CHARACTERS: &str = "abcdefghijklmnopqrstuvwxyz0123456789=.";

/// Returns true if every character of `term` is in the general alphabet
pub fn is_searchable(term: &str) -> bool {
    !term.is_empty() && term.chars().all(|c| GENERAL_SEARCH_CHARACTERS.contains(c))
}
