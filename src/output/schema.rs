//! Database schema for the SQLite export

use rusqlite::Connection;

/// SQL schema for the export database
pub const SCHEMA_SQL: &str = r#"
-- One row per sweep that exported into this database
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT NOT NULL,
    config_hash TEXT,
    status TEXT NOT NULL,
    queries INTEGER NOT NULL,
    steps INTEGER NOT NULL,
    symbols INTEGER NOT NULL
);

-- Latest known record per ticker
CREATE TABLE IF NOT EXISTS symbols (
    ticker TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    exchange TEXT NOT NULL,
    exchange_display TEXT NOT NULL,
    type_code TEXT NOT NULL,
    type_display TEXT NOT NULL,
    last_run INTEGER REFERENCES runs(id)
);

CREATE INDEX IF NOT EXISTS idx_symbols_exchange ON symbols(exchange);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
