//! Integration tests for the sweep
//!
//! These tests use wiremock to stand in for the search endpoint and drive the
//! real HTTP transport through complete sweeps.

use serde_json::{json, Value};
use std::collections::HashSet;
use ticker_sweep::config::{Config, ExportFormat};
use ticker_sweep::crawler::build_driver;
use ticker_sweep::output::{exporter_for, select_symbols};
use ticker_sweep::symbols::SymbolKind;
use ticker_sweep::SweepError;
use wiremock::matchers::{header, method, path_regex, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Answers like the real endpoint: prefix match, sorted, at most ten items
struct UniverseResponder {
    items: Vec<Value>,
}

impl UniverseResponder {
    fn new() -> Self {
        let mut items = Vec::new();
        for n in 0..25 {
            items.push(json!({
                "symbol": format!("A{}", n), "name": format!("Alpha {}", n),
                "exch": "NMS", "type": "S", "exchDisp": "NASDAQ", "typeDisp": "Equity"
            }));
        }
        for n in 0..12 {
            items.push(json!({
                "symbol": format!("Z{}.L", n), "name": format!("Zulu {}", n),
                "exch": "LSE", "type": "E", "exchDisp": "London", "typeDisp": "ETF"
            }));
        }
        items.push(json!({
            "symbol": "GBPUSD=X", "name": "GBP/USD", "exch": "CCY", "type": "C"
        }));
        items.sort_by(|a, b| a["symbol"].as_str().cmp(&b["symbol"].as_str()));
        Self { items }
    }

    fn tickers(&self) -> HashSet<String> {
        self.items
            .iter()
            .filter_map(|item| item["symbol"].as_str().map(String::from))
            .collect()
    }
}

impl Respond for UniverseResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let term = search_term(request);
        let items: Vec<&Value> = self
            .items
            .iter()
            .filter(|item| {
                item["symbol"]
                    .as_str()
                    .map(|s| s.to_lowercase().starts_with(&term))
                    .unwrap_or(false)
            })
            .take(10)
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({"data": {"items": items}}))
    }
}

/// Extracts the decoded search term from the request path
fn search_term(request: &Request) -> String {
    request
        .url
        .path()
        .split(";searchTerm=")
        .nth(1)
        .unwrap_or("")
        .replace("%3D", "=")
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(mock_server: &MockServer) -> Config {
    let mut config = Config::default();
    config.client.endpoint = format!("{}/search", mock_server.address());
    config.client.user_agent = "TestSweep".to_string();
    config.client.insecure = true;
    config.retry.max_retries = 2;
    config.retry.unit_ms = 1;
    config
}

fn items(count: usize) -> Value {
    let items: Vec<Value> = (0..count)
        .map(|i| json!({"symbol": format!("S{}", i), "name": "x", "exch": "NMS"}))
        .collect();
    json!({"data": {"items": items}})
}

#[tokio::test]
async fn test_full_sweep_finds_every_symbol() {
    let mock_server = MockServer::start().await;
    let responder = UniverseResponder::new();
    let expected = responder.tickers();

    Mock::given(method("GET"))
        .and(path_regex(r"^/search;searchTerm=[a-z0-9.%=D]+$"))
        .and(query_param("device", "console"))
        .and(query_param("returnMeta", "true"))
        .and(header("user-agent", "TestSweep"))
        .respond_with(responder)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let mut driver = build_driver(&config).expect("Failed to build driver");
    driver.run().await.expect("Sweep failed");

    assert!(driver.is_done());
    let found: HashSet<String> = driver.store().all().map(|s| s.ticker.clone()).collect();
    assert_eq!(found, expected);

    // "a" and "z" are truncated; deeper queries resolve them
    assert!(driver.frontier().contains("a1"));
    assert!(driver.frontier().contains("z1"));
    assert!(!driver.frontier().contains("g1"));
}

#[tokio::test]
async fn test_kind_filter_still_expands_on_raw_count() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(UniverseResponder::new())
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server);
    config.crawl.kind = SymbolKind::Etf;
    let mut driver = build_driver(&config).expect("Failed to build driver");
    driver.run().await.expect("Sweep failed");

    assert_eq!(driver.store().count(), 12);
    assert!(driver.store().all().all(|s| s.type_code == "E"));
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(items(3)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server);
    config.crawl.seeds = Some(vec!["q".to_string()]);
    let mut driver = build_driver(&config).expect("Failed to build driver");

    let records = driver.step().await.expect("Step failed");
    assert_eq!(records.len(), 3);
    assert!(driver.is_done());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_exhausted_retries_abort_the_sweep() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server);
    config.crawl.seeds = Some(vec!["q".to_string()]);
    let mut driver = build_driver(&config).expect("Failed to build driver");

    let err = driver.run().await.unwrap_err();
    match err {
        SweepError::ExhaustedRetries { query, retries, .. } => {
            assert_eq!(query, "q");
            assert_eq!(retries, 2);
        }
        other => panic!("Expected ExhaustedRetries, got {}", other),
    }

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_result_count_over_cap_is_fatal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(items(11)))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let mut driver = build_driver(&config).expect("Failed to build driver");

    let err = driver.run().await.unwrap_err();
    assert!(matches!(
        err,
        SweepError::UnexpectedResultCount { ref query, count: 11, .. } if query == "a"
    ));
    assert!(err.to_string().contains("S10"));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_non_json_body_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let mut driver = build_driver(&config).expect("Failed to build driver");

    let err = driver.step().await.unwrap_err();
    assert!(matches!(err, SweepError::Transport { .. }));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_sweep_then_export_csv() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(UniverseResponder::new())
        .mount(&mock_server)
        .await;

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("lse.csv");

    let mut config = create_test_config(&mock_server);
    config.output.format = ExportFormat::Csv;
    config.output.exchange = Some("lse".to_string());

    let mut driver = build_driver(&config).expect("Failed to build driver");
    driver.run().await.expect("Sweep failed");

    let symbols = select_symbols(driver.store(), config.output.exchange.as_deref());
    exporter_for(config.output.format, &path, None)
        .export(&symbols)
        .await
        .expect("Export failed");

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "Ticker,Name,Exchange");
    assert_eq!(lines.len(), 13);
    assert_eq!(lines[1], "Z0.L,Zulu 0,LSE");
}
