//! JSON export

use crate::output::traits::{ExportResult, Exporter};
use crate::symbols::SymbolRecord;
use async_trait::async_trait;
use std::path::PathBuf;

/// Writes symbols as a pretty-printed JSON array of full records
#[derive(Debug, Clone)]
pub struct JsonExporter {
    path: PathBuf,
}

impl JsonExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Exporter for JsonExporter {
    async fn export(&self, symbols: &[SymbolRecord]) -> ExportResult<()> {
        let json = serde_json::to_vec_pretty(symbols)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
