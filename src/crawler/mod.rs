//! Crawler module: fetching, retrying, and driving the prefix search
//!
//! This module contains the core crawling logic, including:
//! - HTTP transport against the search endpoint
//! - Exponential backoff for transient failures
//! - Progress reporting
//! - The step-by-step crawl driver

mod driver;
mod progress;
mod retry;
mod transport;

pub use driver::{CrawlDriver, RESULT_CAP};
pub use progress::{Progress, ProgressSink, TracingSink};
pub use retry::{RetryError, RetryPolicy, Transient};
pub use transport::{build_http_client, request_url, HttpTransport, Transport, TransportError};

use crate::config::Config;
use crate::query::QueryFrontier;
use crate::symbols::YahooDecoder;
use crate::SweepError;
use std::time::Duration;

/// Builds a driver for the search-assist API from a configuration
///
/// This wires together:
/// 1. The HTTP transport (one client for the whole run)
/// 2. The decoder for the configured symbol kind
/// 3. The seed frontier (custom seeds or a-z)
/// 4. The retry policy and the pause between queries
///
/// # Returns
///
/// * `Ok(CrawlDriver)` - Ready to run
/// * `Err(SweepError)` - The HTTP client could not be built
pub fn build_driver(config: &Config) -> Result<CrawlDriver<HttpTransport, YahooDecoder>, SweepError> {
    let transport = HttpTransport::new(&config.client)?;
    let decoder = YahooDecoder::new(config.crawl.kind);
    let frontier = match &config.crawl.seeds {
        Some(seeds) => QueryFrontier::new(seeds.iter().map(String::as_str)),
        None => QueryFrontier::with_default_seeds(),
    };

    Ok(CrawlDriver::new(transport, decoder, frontier)
        .with_retry_policy(RetryPolicy::from(&config.retry))
        .with_query_delay(Duration::from_millis(config.crawl.query_delay_ms)))
}
