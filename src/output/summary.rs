//! Run summaries
//!
//! A [`RunSummary`] describes one sweep: when it ran, how it ended, and how
//! much it collected. It is printed at the end of a run and stored by the
//! SQLite exporter.

use chrono::{DateTime, Utc};

/// How a sweep ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Interrupted,
    Failed,
}

impl RunStatus {
    /// Status of a sweep that ran until it stopped on its own
    pub fn from_outcome<T, E>(outcome: &Result<T, E>) -> Self {
        match outcome {
            Ok(_) => Self::Completed,
            Err(_) => Self::Failed,
        }
    }

    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Interrupted => "interrupted",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(Self::Completed),
            "interrupted" => Some(Self::Interrupted),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Summary statistics for a sweep
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub status: RunStatus,
    pub config_hash: Option<String>,

    /// Final frontier size
    pub queries: usize,

    /// Requests issued, counting every pass
    pub steps: u64,

    /// Unique symbols collected
    pub symbols: usize,

    /// Symbols written after filtering
    pub exported: usize,
}

impl RunSummary {
    /// Wall-clock duration in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Average symbols per request
    pub fn yield_per_step(&self) -> f64 {
        if self.steps == 0 {
            return 0.0;
        }
        self.symbols as f64 / self.steps as f64
    }
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!("=== Ticker-Sweep Summary ===\n");
    println!("Status: {}", summary.status.to_db_string());
    println!("Started: {}", summary.started_at.to_rfc3339());
    println!("Finished: {}", summary.finished_at.to_rfc3339());
    println!("Duration: {}s", summary.duration_seconds());
    println!();
    println!("Queries in frontier: {}", summary.queries);
    println!("Requests issued: {}", summary.steps);
    println!("Unique symbols: {}", summary.symbols);
    println!("Symbols exported: {}", summary.exported);
    println!("Symbols per request: {:.2}", summary.yield_per_step());
}
