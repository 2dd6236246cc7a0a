//! Exporter trait and errors
//!
//! An exporter receives the final symbol list of a run and writes it to its
//! destination. Rows always carry the Ticker, Name, Exchange triple.

use crate::symbols::SymbolRecord;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv_async::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Trait for symbol exporters
#[async_trait]
pub trait Exporter: Send + Sync {
    /// Writes `symbols` to the exporter's destination
    ///
    /// # Arguments
    ///
    /// * `symbols` - The records to write, already filtered and ordered
    async fn export(&self, symbols: &[SymbolRecord]) -> ExportResult<()>;
}
