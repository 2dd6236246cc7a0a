//! Progress reporting
//!
//! The crawl reports through a [`ProgressSink`]: free-form notes (retry
//! narration) and [`Progress`] snapshots after each step. How they are shown
//! is up to the sink.

use std::fmt;

/// Read-only snapshot of a running crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    /// Unique symbols collected so far
    pub symbols: usize,

    /// Queries processed in the current pass (1-based cursor position)
    pub processed: usize,

    /// Current frontier size
    pub total: usize,

    /// Query under the cursor
    pub current: Option<String>,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} queries, {} symbols",
            self.processed, self.total, self.symbols
        )?;
        if let Some(current) = &self.current {
            write!(f, ", query '{}'", current)?;
        }
        Ok(())
    }
}

/// Receives human-readable notes and progress snapshots
pub trait ProgressSink: Send + Sync {
    /// Receives a free-form note, such as a retry announcement
    fn note(&self, message: &str);

    /// Receives a snapshot after each completed step
    fn update(&self, _progress: &Progress) {}
}

/// Sink that forwards everything to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn note(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn update(&self, progress: &Progress) {
        tracing::debug!("Progress: {}", progress);
    }
}
