//! Ticker-Sweep: exhaustive symbol enumeration over a prefix-search API
//!
//! This crate walks a search endpoint that caps every answer at ten results
//! and offers no pagination. It grows a frontier of search prefixes until every
//! prefix is answered without truncation, collecting the unique symbols found
//! along the way.

pub mod config;
pub mod crawler;
pub mod output;
pub mod query;
pub mod symbols;

use thiserror::Error;

pub use crawler::TransportError;
pub use output::ExportError;
pub use symbols::DecodeError;

/// Main error type for Ticker-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Query '{query}' failed after {retries} retries: {source}")]
    ExhaustedRetries {
        query: String,
        retries: u32,
        source: TransportError,
    },

    #[error("Query '{query}' returned {count} results, more than the page cap. Content:\n{body}")]
    UnexpectedResultCount {
        query: String,
        count: usize,
        body: String,
    },

    #[error("Query '{query}' failed: {source}")]
    Transport {
        query: String,
        source: TransportError,
    },

    #[error("Failed to decode response for query '{query}': {source}")]
    Decode { query: String, source: DecodeError },

    #[error("Query frontier is empty")]
    EmptyFrontier,

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Ticker-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlDriver, HttpTransport, Progress, ProgressSink, RetryPolicy};
pub use query::{Query, QueryFrontier};
pub use symbols::{Decoder, SymbolKind, SymbolRecord, SymbolStore, YahooDecoder};
