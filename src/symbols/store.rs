use crate::symbols::SymbolRecord;
use std::collections::HashMap;

/// Accumulates discovered symbols, keyed by ticker
///
/// A ticker found by several queries is stored once; the most recent record
/// wins.
#[derive(Debug, Clone, Default)]
pub struct SymbolStore {
    symbols: HashMap<String, SymbolRecord>,
}

impl SymbolStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts each record under its ticker, overwriting earlier entries
    pub fn merge<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = SymbolRecord>,
    {
        for record in records {
            self.symbols.insert(record.ticker.clone(), record);
        }
    }

    /// All stored records, in no particular order
    pub fn all(&self) -> impl Iterator<Item = &SymbolRecord> {
        self.symbols.values()
    }

    /// All stored records sorted by ticker
    pub fn sorted(&self) -> Vec<SymbolRecord> {
        let mut records: Vec<SymbolRecord> = self.symbols.values().cloned().collect();
        records.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        records
    }

    /// Looks up a record by ticker
    pub fn get(&self, ticker: &str) -> Option<&SymbolRecord> {
        self.symbols.get(ticker)
    }

    /// Number of unique tickers
    pub fn count(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if no symbols have been stored
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
