//! SQLite export
//!
//! Symbols are upserted by ticker, so exporting several runs into the same
//! database keeps the latest record for each symbol. When a run summary is
//! attached, it is recorded in the `runs` table and linked from each symbol.

use crate::output::schema::initialize_schema;
use crate::output::summary::RunSummary;
use crate::output::traits::{ExportResult, Exporter};
use crate::symbols::SymbolRecord;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

/// Writes symbols into a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteExporter {
    path: PathBuf,
    run: Option<RunSummary>,
}

impl SqliteExporter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            run: None,
        }
    }

    /// Attaches the summary of the run being exported
    pub fn with_run(mut self, run: RunSummary) -> Self {
        self.run = Some(run);
        self
    }

    fn open(path: &Path) -> rusqlite::Result<Connection> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;
        initialize_schema(&conn)?;
        Ok(conn)
    }

    fn write(&self, symbols: &[SymbolRecord]) -> rusqlite::Result<Option<i64>> {
        let mut conn = Self::open(&self.path)?;
        let tx = conn.transaction()?;

        let run_id = match &self.run {
            Some(run) => {
                tx.execute(
                    "INSERT INTO runs (started_at, finished_at, config_hash, status, queries, steps, symbols)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    params![
                        run.started_at.to_rfc3339(),
                        run.finished_at.to_rfc3339(),
                        run.config_hash,
                        run.status.to_db_string(),
                        run.queries as i64,
                        run.steps as i64,
                        run.symbols as i64,
                    ],
                )?;
                Some(tx.last_insert_rowid())
            }
            None => None,
        };

        {
            let mut stmt = tx.prepare(
                "INSERT INTO symbols (ticker, name, exchange, exchange_display, type_code, type_display, last_run)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(ticker) DO UPDATE SET
                    name = excluded.name,
                    exchange = excluded.exchange,
                    exchange_display = excluded.exchange_display,
                    type_code = excluded.type_code,
                    type_display = excluded.type_display,
                    last_run = excluded.last_run",
            )?;
            for symbol in symbols {
                stmt.execute(params![
                    symbol.ticker,
                    symbol.name,
                    symbol.exchange,
                    symbol.exchange_display,
                    symbol.type_code,
                    symbol.type_display,
                    run_id,
                ])?;
            }
        }

        tx.commit()?;
        Ok(run_id)
    }
}

#[async_trait]
impl Exporter for SqliteExporter {
    async fn export(&self, symbols: &[SymbolRecord]) -> ExportResult<()> {
        let run_id = self.write(symbols)?;
        tracing::debug!(
            "Upserted {} symbols into {} (run {:?})",
            symbols.len(),
            self.path.display(),
            run_id
        );
        Ok(())
    }
}
