//! The query frontier
//!
//! The frontier is the list of every search prefix the crawl will issue. It
//! only ever grows: a prefix whose answer was truncated is deepened by appending
//! one query per character of the general alphabet to the tail. A cursor walks
//! the list cyclically, and a pass is complete once the cursor sits on the last
//! entry of the list as it stands *after* any growth from the current step.

use crate::query::alphabet::{FIRST_SEARCH_CHARACTERS, GENERAL_SEARCH_CHARACTERS};
use crate::query::Query;
use std::collections::HashSet;

/// Append-only, duplicate-free sequence of queries with a cyclic cursor
#[derive(Debug, Clone)]
pub struct QueryFrontier {
    /// Queries in insertion order
    queries: Vec<Query>,

    /// Membership index over `queries`
    seen: HashSet<Query>,

    /// Index of the current query; `None` until the first advance
    cursor: Option<usize>,
}

impl Default for QueryFrontier {
    fn default() -> Self {
        Self::with_default_seeds()
    }
}

impl QueryFrontier {
    /// Creates a frontier seeded with one single-letter query per letter a-z
    pub fn with_default_seeds() -> Self {
        Self::new(FIRST_SEARCH_CHARACTERS.chars().map(|c| Query::new(c.to_string())))
    }

    /// Creates a frontier from a custom seed set
    ///
    /// Duplicate seeds are dropped, keeping the first occurrence.
    pub fn new<I>(seeds: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Query>,
    {
        let mut frontier = Self {
            queries: Vec::new(),
            seen: HashSet::new(),
            cursor: None,
        };
        for seed in seeds {
            frontier.push(seed.into());
        }
        frontier
    }

    /// Appends `query` unless it is already present
    ///
    /// # Returns
    ///
    /// `true` if the query was appended
    pub fn push(&mut self, query: Query) -> bool {
        if self.seen.contains(&query) {
            return false;
        }
        self.seen.insert(query.clone());
        self.queries.push(query);
        true
    }

    /// Moves the cursor one position forward, wrapping to the start
    ///
    /// # Returns
    ///
    /// The query now under the cursor, or `None` if the frontier is empty
    pub fn advance(&mut self) -> Option<&Query> {
        if self.queries.is_empty() {
            return None;
        }

        let next = match self.cursor {
            Some(idx) if idx + 1 < self.queries.len() => idx + 1,
            _ => 0,
        };
        self.cursor = Some(next);
        self.queries.get(next)
    }

    /// Returns the query under the cursor
    pub fn current(&self) -> Option<&Query> {
        self.cursor.and_then(|idx| self.queries.get(idx))
    }

    /// Deepens the current query by one character of the general alphabet
    ///
    /// # Returns
    ///
    /// The number of new queries appended
    pub fn expand_current(&mut self) -> usize {
        match self.current().cloned() {
            Some(prefix) => self.expand(&prefix),
            None => 0,
        }
    }

    /// Appends `prefix + c` for every `c` in the general alphabet not yet present
    pub fn expand(&mut self, prefix: &Query) -> usize {
        GENERAL_SEARCH_CHARACTERS
            .chars()
            .filter(|&c| self.push(prefix.extended(c)))
            .count()
    }

    /// Returns true when the cursor sits on the last query of the frontier
    ///
    /// Must be evaluated after any expansion for the current step, since
    /// growth moves the end of the pass further out.
    pub fn is_pass_complete(&self) -> bool {
        match self.cursor {
            Some(idx) => idx + 1 >= self.queries.len(),
            None => false,
        }
    }

    /// Returns true if `term` is already in the frontier
    pub fn contains(&self, term: &str) -> bool {
        self.seen.contains(term)
    }

    /// Current cursor index, if the frontier has been advanced
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of queries in the frontier
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    /// Returns true if the frontier has no queries
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// All queries in insertion order
    pub fn queries(&self) -> &[Query] {
        &self.queries
    }
}
