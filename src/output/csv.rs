//! CSV export

use crate::output::traits::{ExportResult, Exporter};
use crate::symbols::SymbolRecord;
use async_trait::async_trait;
use csv_async::AsyncWriter;
use std::path::PathBuf;

/// Writes symbols as CSV with a `Ticker,Name,Exchange` header
#[derive(Debug, Clone)]
pub struct CsvExporter {
    path: PathBuf,
}

impl CsvExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Exporter for CsvExporter {
    async fn export(&self, symbols: &[SymbolRecord]) -> ExportResult<()> {
        let file = tokio::fs::File::create(&self.path).await?;
        let mut writer = AsyncWriter::from_writer(file);

        writer.write_record(SymbolRecord::ROW_HEADER).await?;
        for symbol in symbols {
            writer.write_record(symbol.row()).await?;
        }
        writer.flush().await?;

        tracing::debug!("Wrote {} rows to {}", symbols.len(), self.path.display());
        Ok(())
    }
}
