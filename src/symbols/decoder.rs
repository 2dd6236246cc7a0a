//! Response decoders
//!
//! One decoder exists per data source. All of them share the [`Decoder`]
//! contract, so the crawl core can stay ignorant of the payload schema.

use crate::symbols::SymbolRecord;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Errors raised while decoding a response body
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unexpected response schema: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("Missing field in response: {0}")]
    MissingField(&'static str),
}

/// Output of a single decode
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    /// Records kept by the decoder
    pub records: Vec<SymbolRecord>,

    /// Number of results the API returned for the query, before any filtering
    pub count: usize,
}

/// Turns a raw JSON body into symbol records plus the reported result count
pub trait Decoder {
    /// Decodes one response body
    ///
    /// # Arguments
    ///
    /// * `body` - The JSON body returned for a single query
    ///
    /// # Returns
    ///
    /// * `Ok(Decoded)` - Records and the raw result count
    /// * `Err(DecodeError)` - The body does not match the expected schema
    fn decode(&self, body: &Value) -> Result<Decoded, DecodeError>;
}

/// The kind of instrument a crawl collects
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// Every instrument type
    #[default]
    Generic,
    Stocks,
    Etf,
    Index,
    Mutualfund,
    Future,
    Currency,
}

impl SymbolKind {
    /// The type code the API attaches to items of this kind
    ///
    /// `None` means every type is accepted.
    pub fn type_code(&self) -> Option<&'static str> {
        match self {
            Self::Generic => None,
            Self::Stocks => Some("S"),
            Self::Etf => Some("E"),
            Self::Index => Some("I"),
            Self::Mutualfund => Some("M"),
            Self::Future => Some("F"),
            Self::Currency => Some("C"),
        }
    }

    /// Lowercase name, used for default output file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Stocks => "stocks",
            Self::Etf => "etf",
            Self::Index => "index",
            Self::Mutualfund => "mutualfund",
            Self::Future => "future",
            Self::Currency => "currency",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the search-assist `data.items` array
#[derive(Debug, Deserialize)]
struct SearchItem {
    symbol: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    exch: Option<String>,
    #[serde(default, rename = "type")]
    type_code: Option<String>,
    #[serde(default, rename = "exchDisp")]
    exch_disp: Option<String>,
    #[serde(default, rename = "typeDisp")]
    type_disp: Option<String>,
}

impl From<SearchItem> for SymbolRecord {
    fn from(item: SearchItem) -> Self {
        Self {
            ticker: item.symbol,
            name: item.name.unwrap_or_default(),
            exchange: item.exch.unwrap_or_default(),
            exchange_display: item.exch_disp.unwrap_or_default(),
            type_code: item.type_code.unwrap_or_default(),
            type_display: item.type_disp.unwrap_or_default(),
        }
    }
}

/// Decoder for the search-assist endpoint
///
/// The reported count is the number of raw items, so truncation is detected
/// even when most items are filtered out by kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct YahooDecoder {
    kind: SymbolKind,
}

impl YahooDecoder {
    /// Creates a decoder that keeps only items of `kind`
    pub fn new(kind: SymbolKind) -> Self {
        Self { kind }
    }
}

impl Decoder for YahooDecoder {
    fn decode(&self, body: &Value) -> Result<Decoded, DecodeError> {
        let items = body
            .get("data")
            .ok_or(DecodeError::MissingField("data"))?
            .get("items")
            .ok_or(DecodeError::MissingField("data.items"))?;

        let items: Vec<SearchItem> = Vec::<SearchItem>::deserialize(items)?;
        let count = items.len();

        let wanted = self.kind.type_code();
        let records = items
            .into_iter()
            .filter(|item| match wanted {
                Some(code) => item.type_code.as_deref() == Some(code),
                None => true,
            })
            .map(SymbolRecord::from)
            .collect();

        Ok(Decoded { records, count })
    }
}
