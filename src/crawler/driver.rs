//! Crawl driver - step-by-step orchestration of the prefix search
//!
//! One step:
//! 1. Advance the frontier cursor
//! 2. Fetch the query (with retries)
//! 3. Decode the body
//! 4. Merge records into the store
//! 5. Expand the frontier if the answer was truncated, fail if it broke the cap
//! 6. Recompute completion against the post-expansion frontier

use crate::crawler::progress::{Progress, ProgressSink, TracingSink};
use crate::crawler::retry::{RetryError, RetryPolicy};
use crate::crawler::transport::Transport;
use crate::query::QueryFrontier;
use crate::symbols::{Decoder, SymbolRecord, SymbolStore};
use crate::SweepError;
use std::cmp::Ordering;
use std::time::Duration;

/// Most results the API returns for a single query
pub const RESULT_CAP: usize = 10;

/// Drives a crawl over a single transport and decoder
///
/// The driver is the single owner of the frontier and the store, so steps are
/// strictly sequential.
pub struct CrawlDriver<T, D> {
    transport: T,
    decoder: D,
    retry: RetryPolicy,
    frontier: QueryFrontier,
    store: SymbolStore,
    sink: Box<dyn ProgressSink>,
    query_delay: Duration,
    done: bool,
    steps: u64,
}

impl<T: Transport, D: Decoder> CrawlDriver<T, D> {
    /// Creates a driver over `frontier` with the default retry policy
    pub fn new(transport: T, decoder: D, frontier: QueryFrontier) -> Self {
        Self {
            transport,
            decoder,
            retry: RetryPolicy::default(),
            frontier,
            store: SymbolStore::new(),
            sink: Box::new(TracingSink),
            query_delay: Duration::ZERO,
            done: false,
            steps: 0,
        }
    }

    /// Replaces the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replaces the progress sink
    pub fn with_sink(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Sets the pause between successive queries in [`Self::run`]
    pub fn with_query_delay(mut self, delay: Duration) -> Self {
        self.query_delay = delay;
        self
    }

    /// Processes the next query
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<SymbolRecord>)` - Records decoded for this query
    /// * `Err(SweepError)` - A fatal error; the crawl cannot continue
    pub async fn step(&mut self) -> Result<Vec<SymbolRecord>, SweepError> {
        let query = self
            .frontier
            .advance()
            .cloned()
            .ok_or(SweepError::EmptyFrontier)?;
        self.steps += 1;
        tracing::debug!("Query '{}' ({} of {})", query, self.position(), self.frontier.len());

        let transport = &self.transport;
        let query_ref = &query;
        let body = self
            .retry
            .execute(self.sink.as_ref(), move || transport.fetch(query_ref))
            .await
            .map_err(|err| match err {
                RetryError::Exhausted { retries, source } => SweepError::ExhaustedRetries {
                    query: query.to_string(),
                    retries,
                    source,
                },
                RetryError::Permanent(source) => SweepError::Transport {
                    query: query.to_string(),
                    source,
                },
            })?;

        let decoded = self
            .decoder
            .decode(&body)
            .map_err(|source| SweepError::Decode {
                query: query.to_string(),
                source,
            })?;

        self.store.merge(decoded.records.iter().cloned());

        match decoded.count.cmp(&RESULT_CAP) {
            Ordering::Equal => {
                let added = self.frontier.expand_current();
                tracing::trace!(
                    "Query '{}' hit the result cap, added {} deeper queries",
                    query,
                    added
                );
            }
            Ordering::Greater => {
                return Err(SweepError::UnexpectedResultCount {
                    query: query.to_string(),
                    count: decoded.count,
                    body: body.to_string(),
                });
            }
            Ordering::Less => {}
        }

        // Must follow expansion: growth on this step pushes the end of the pass out
        self.done = self.frontier.is_pass_complete();

        Ok(decoded.records)
    }

    /// Runs steps until a full pass completes without expansion
    pub async fn run(&mut self) -> Result<(), SweepError> {
        tracing::info!(
            "Starting sweep over {} seed queries",
            self.frontier.len()
        );

        while !self.done {
            self.step().await?;
            self.sink.update(&self.progress());

            if !self.done && !self.query_delay.is_zero() {
                tokio::time::sleep(self.query_delay).await;
            }
        }

        tracing::info!(
            "Sweep complete: {} symbols from {} queries in {} steps",
            self.store.count(),
            self.frontier.len(),
            self.steps
        );
        Ok(())
    }

    /// Snapshot of the crawl for display
    pub fn progress(&self) -> Progress {
        Progress {
            symbols: self.store.count(),
            processed: self.position(),
            total: self.frontier.len(),
            current: self.frontier.current().map(ToString::to_string),
        }
    }

    /// Returns true once a full pass completed without growth
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Number of steps taken so far, across all passes
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// The query frontier
    pub fn frontier(&self) -> &QueryFrontier {
        &self.frontier
    }

    /// The symbols collected so far
    pub fn store(&self) -> &SymbolStore {
        &self.store
    }

    /// Consumes the driver, returning the collected symbols
    pub fn into_store(self) -> SymbolStore {
        self.store
    }

    fn position(&self) -> usize {
        self.frontier.cursor().map_or(0, |idx| idx + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::transport::TransportError;
    use crate::query::{Query, GENERAL_SEARCH_CHARACTERS};
    use crate::symbols::YahooDecoder;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    /// Answers each query from a fixed universe of tickers, like the real API
    /// would: prefix match, sorted, truncated to the cap
    struct UniverseTransport {
        tickers: Vec<String>,
        visited: Arc<Mutex<Vec<String>>>,
    }

    impl UniverseTransport {
        fn new(tickers: Vec<String>) -> Self {
            let mut tickers = tickers;
            tickers.sort();
            Self {
                tickers,
                visited: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl Transport for UniverseTransport {
        async fn fetch(&self, query: &Query) -> Result<Value, TransportError> {
            self.visited.lock().unwrap().push(query.to_string());
            let items: Vec<Value> = self
                .tickers
                .iter()
                .filter(|t| t.to_lowercase().starts_with(query.as_str()))
                .take(RESULT_CAP)
                .map(|t| json!({"symbol": t, "name": format!("{} Corp", t), "exch": "NMS"}))
                .collect();
            Ok(json!({"data": {"items": items}}))
        }
    }

    /// Returns a fixed number of items for every query, failing transiently first
    struct FixedTransport {
        count: usize,
        failures_before_success: usize,
        calls: Mutex<usize>,
    }

    impl FixedTransport {
        fn new(count: usize) -> Self {
            Self {
                count,
                failures_before_success: 0,
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl Transport for FixedTransport {
        async fn fetch(&self, query: &Query) -> Result<Value, TransportError> {
            let call = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls
            };
            if call <= self.failures_before_success {
                return Err(TransportError::HttpStatus {
                    url: query.to_string(),
                    status: 503,
                });
            }
            let items: Vec<Value> = (0..self.count)
                .map(|i| json!({"symbol": format!("{}{}", query, i)}))
                .collect();
            Ok(json!({"data": {"items": items}}))
        }
    }

    #[async_trait]
    impl<T: Transport> Transport for Arc<T> {
        async fn fetch(&self, query: &Query) -> Result<Value, TransportError> {
            self.as_ref().fetch(query).await
        }
    }

    fn universe() -> Vec<String> {
        let mut tickers = Vec::new();
        for letter in ['a', 'b', 'm'] {
            for n in 0..40 {
                tickers.push(format!("{}{}", letter.to_ascii_uppercase(), n));
            }
        }
        tickers.extend(["BRK.A", "BRK.B", "EURUSD=X", "X"].map(String::from));
        tickers
    }

    #[tokio::test]
    async fn test_terminates_after_one_pass_without_truncation() {
        let transport = Arc::new(FixedTransport::new(3));
        let mut driver = CrawlDriver::new(
            transport.clone(),
            YahooDecoder::default(),
            QueryFrontier::with_default_seeds(),
        );

        for step in 1..=26 {
            driver.step().await.unwrap();
            assert_eq!(driver.is_done(), step == 26, "step {}", step);
        }
        assert_eq!(driver.frontier().len(), 26);
        assert_eq!(driver.store().count(), 26 * 3);
        assert_eq!(transport.calls(), 26);
    }

    #[tokio::test]
    async fn test_truncated_query_expands_frontier() {
        let transport = FixedTransport::new(RESULT_CAP);
        let mut driver = CrawlDriver::new(
            transport,
            YahooDecoder::default(),
            QueryFrontier::new(["a", "b", "ab"]),
        );

        driver.step().await.unwrap();

        let frontier = driver.frontier();
        assert_eq!(frontier.len(), 3 + GENERAL_SEARCH_CHARACTERS.len() - 1);
        for c in GENERAL_SEARCH_CHARACTERS.chars() {
            assert!(frontier.contains(&format!("a{}", c)));
        }
        let unique: HashSet<&Query> = frontier.queries().iter().collect();
        assert_eq!(unique.len(), frontier.len());
        assert!(!driver.is_done());
    }

    #[tokio::test]
    async fn test_expansion_on_last_query_postpones_completion() {
        let mut driver = CrawlDriver::new(
            FixedTransport::new(RESULT_CAP),
            YahooDecoder::default(),
            QueryFrontier::new(["a"]),
        );

        driver.step().await.unwrap();
        assert!(!driver.is_done());
        assert_eq!(driver.frontier().len(), 1 + GENERAL_SEARCH_CHARACTERS.len());
    }

    #[tokio::test]
    async fn test_count_over_cap_is_fatal_and_not_retried() {
        let transport = Arc::new(FixedTransport::new(RESULT_CAP + 1));
        let mut driver = CrawlDriver::new(
            transport.clone(),
            YahooDecoder::default(),
            QueryFrontier::with_default_seeds(),
        );

        let err = driver.step().await.unwrap_err();
        match err {
            SweepError::UnexpectedResultCount { query, count, body } => {
                assert_eq!(query, "a");
                assert_eq!(count, 11);
                assert!(body.contains("a10"));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failures_are_retried() {
        let transport = Arc::new(FixedTransport {
            count: 2,
            failures_before_success: 3,
            calls: Mutex::new(0),
        });
        let mut driver = CrawlDriver::new(
            transport.clone(),
            YahooDecoder::default(),
            QueryFrontier::new(["q"]),
        );

        let start = tokio::time::Instant::now();
        let records = driver.step().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(transport.calls(), 4);
        assert_eq!(start.elapsed().as_secs(), 155);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_abort() {
        let transport = Arc::new(FixedTransport {
            count: 2,
            failures_before_success: usize::MAX,
            calls: Mutex::new(0),
        });
        let mut driver = CrawlDriver::new(
            transport.clone(),
            YahooDecoder::default(),
            QueryFrontier::new(["q"]),
        );

        let err = driver.run().await.unwrap_err();
        assert!(matches!(
            err,
            SweepError::ExhaustedRetries { ref query, retries: 5, .. } if query == "q"
        ));
        assert_eq!(transport.calls(), 6);
    }

    #[tokio::test]
    async fn test_decode_error_propagates() {
        struct Garbage;

        #[async_trait]
        impl Transport for Garbage {
            async fn fetch(&self, _query: &Query) -> Result<Value, TransportError> {
                Ok(json!({"unexpected": true}))
            }
        }

        let mut driver =
            CrawlDriver::new(Garbage, YahooDecoder::default(), QueryFrontier::new(["a"]));
        let err = driver.step().await.unwrap_err();
        assert!(matches!(err, SweepError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_empty_frontier() {
        let mut driver = CrawlDriver::new(
            FixedTransport::new(1),
            YahooDecoder::default(),
            QueryFrontier::new(Vec::<Query>::new()),
        );
        assert!(matches!(
            driver.step().await,
            Err(SweepError::EmptyFrontier)
        ));
    }

    #[tokio::test]
    async fn test_progress_snapshot() {
        let mut driver = CrawlDriver::new(
            FixedTransport::new(2),
            YahooDecoder::default(),
            QueryFrontier::with_default_seeds(),
        );
        assert_eq!(driver.progress().processed, 0);
        assert_eq!(driver.progress().current, None);

        driver.step().await.unwrap();
        driver.step().await.unwrap();

        let progress = driver.progress();
        assert_eq!(progress.symbols, 4);
        assert_eq!(progress.processed, 2);
        assert_eq!(progress.total, 26);
        assert_eq!(progress.current.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_run_finds_every_symbol() {
        let tickers = universe();
        let mut driver = CrawlDriver::new(
            UniverseTransport::new(tickers.clone()),
            YahooDecoder::default(),
            QueryFrontier::with_default_seeds(),
        );

        driver.run().await.unwrap();

        assert!(driver.is_done());
        let found: HashSet<String> = driver.store().all().map(|r| r.ticker.clone()).collect();
        let expected: HashSet<String> = tickers.into_iter().collect();
        assert_eq!(found, expected);
    }

    #[tokio::test]
    async fn test_runs_are_deterministic() {
        async fn sweep() -> (Vec<String>, Vec<Query>, Vec<SymbolRecord>) {
            let transport = UniverseTransport::new(universe());
            let visited = transport.visited.clone();
            let mut driver = CrawlDriver::new(
                transport,
                YahooDecoder::default(),
                QueryFrontier::with_default_seeds(),
            );
            driver.run().await.unwrap();

            let order = visited.lock().unwrap().clone();
            let frontier = driver.frontier().queries().to_vec();
            (order, frontier, driver.into_store().sorted())
        }

        let (order_a, frontier_a, symbols_a) = sweep().await;
        let (order_b, frontier_b, symbols_b) = sweep().await;

        assert_eq!(order_a, order_b);
        assert_eq!(frontier_a, frontier_b);
        assert_eq!(symbols_a, symbols_b);
        assert!(frontier_a.len() > 26);
    }
}
