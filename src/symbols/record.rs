use serde::{Deserialize, Serialize};

/// A ticker symbol discovered through the search API
///
/// Identity is the ticker string; two records with the same ticker describe the
/// same symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    /// Unique ticker identifier (e.g. "AAPL", "EURUSD=X")
    pub ticker: String,

    /// Human-readable name
    pub name: String,

    /// Exchange code
    pub exchange: String,

    /// Exchange display name
    #[serde(default)]
    pub exchange_display: String,

    /// Single-letter instrument type code reported by the API
    #[serde(default)]
    pub type_code: String,

    /// Instrument type display name
    #[serde(default)]
    pub type_display: String,
}

impl SymbolRecord {
    /// Column header for tabular exports
    pub const ROW_HEADER: [&'static str; 3] = ["Ticker", "Name", "Exchange"];

    /// Creates a record with only the exported fields set
    pub fn new(
        ticker: impl Into<String>,
        name: impl Into<String>,
        exchange: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            exchange: exchange.into(),
            exchange_display: String::new(),
            type_code: String::new(),
            type_display: String::new(),
        }
    }

    /// The exported fields, in [`Self::ROW_HEADER`] order
    pub fn row(&self) -> [&str; 3] {
        [&self.ticker, &self.name, &self.exchange]
    }
}
