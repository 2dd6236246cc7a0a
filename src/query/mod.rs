//! Search queries and the prefix frontier
//!
//! This module contains:
//! - The fixed search alphabets used to seed and deepen the search
//! - The [`Query`] newtype
//! - The [`QueryFrontier`], an append-only, duplicate-free queue walked cyclically

pub mod alphabet;
mod frontier;

pub use alphabet::{FIRST_SEARCH_CHARACTERS, GENERAL_SEARCH_CHARACTERS};
pub use frontier::QueryFrontier;

use std::borrow::Borrow;
use std::fmt;

/// A single search prefix sent to the remote API
///
/// Queries are immutable; deepening a query produces a new one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Query(String);

impl Query {
    /// Creates a query from any string-like value
    pub fn new(term: impl Into<String>) -> Self {
        Self(term.into())
    }

    /// Returns a new query with `c` appended
    pub fn extended(&self, c: char) -> Self {
        let mut term = String::with_capacity(self.0.len() + c.len_utf8());
        term.push_str(&self.0);
        term.push(c);
        Self(term)
    }

    /// Returns the query as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Query {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Query {
    fn from(term: &str) -> Self {
        Self::new(term)
    }
}

impl From<String> for Query {
    fn from(term: String) -> Self {
        Self(term)
    }
}
