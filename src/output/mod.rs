//! Output module for exporting collected symbols
//!
//! This module handles:
//! - Filtering and ordering the final symbol set
//! - Writing it as CSV, JSON, or into a SQLite database
//! - Summarizing the run

mod csv;
mod json;
mod schema;
mod sqlite_output;
mod summary;
mod traits;

pub use self::csv::CsvExporter;
pub use json::JsonExporter;
pub use sqlite_output::SqliteExporter;
pub use summary::{print_summary, RunStatus, RunSummary};
pub use traits::{ExportError, ExportResult, Exporter};

use crate::config::ExportFormat;
use crate::symbols::{SymbolRecord, SymbolStore};
use std::path::Path;

/// Selects the records to export: sorted by ticker, optionally limited to one exchange
///
/// The exchange comparison ignores case.
pub fn select_symbols(store: &SymbolStore, exchange: Option<&str>) -> Vec<SymbolRecord> {
    let mut symbols = store.sorted();
    if let Some(exchange) = exchange {
        symbols.retain(|s| s.exchange.eq_ignore_ascii_case(exchange));
    }
    symbols
}

/// Builds the exporter for `format`
///
/// The run summary is only used by formats that can store it.
pub fn exporter_for(
    format: ExportFormat,
    path: &Path,
    run: Option<RunSummary>,
) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Csv => Box::new(CsvExporter::new(path)),
        ExportFormat::Json => Box::new(JsonExporter::new(path)),
        ExportFormat::Sqlite => {
            let exporter = SqliteExporter::new(path);
            match run {
                Some(run) => Box::new(exporter.with_run(run)),
                None => Box::new(exporter),
            }
        }
    }
}
