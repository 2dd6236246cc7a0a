use crate::symbols::SymbolKind;
use serde::Deserialize;
use std::time::Duration;

/// Default search-assist endpoint, without scheme
pub const DEFAULT_ENDPOINT: &str = "finance.yahoo.com/_finance_doubledown/api/resource/searchassist";

/// Default user agent sent with every request
pub const DEFAULT_USER_AGENT: &str = "yahoo-ticker-symbol-downloader";

/// Main configuration structure for Ticker-Sweep
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub retry: RetryConfig,
    pub crawl: CrawlConfig,
    pub output: OutputConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClientConfig {
    /// Host and path of the search endpoint, without scheme
    pub endpoint: String,

    /// User agent header value
    pub user_agent: String,

    /// Use plain http instead of https
    pub insecure: bool,

    /// Connection timeout (seconds)
    pub connect_timeout_secs: u64,

    /// Read timeout (seconds)
    pub read_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            insecure: false,
            connect_timeout_secs: 12,
            read_timeout_secs: 12,
        }
    }
}

impl ClientConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

/// Retry/backoff configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Retries after the first failed attempt
    pub max_retries: u32,

    /// Exponential base; retry `k` sleeps `base^k` units
    pub base: u64,

    /// Length of one backoff unit (milliseconds)
    pub unit_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base: 5,
            unit_ms: 1000,
        }
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// Which instrument kind to collect
    pub kind: SymbolKind,

    /// Seed queries replacing the single letters a-z
    pub seeds: Option<Vec<String>>,

    /// Pause between successive queries (milliseconds)
    pub query_delay_ms: u64,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Destination file; defaults to `<kind>.<format extension>`
    pub path: Option<String>,

    /// Export format
    pub format: ExportFormat,

    /// Only export symbols listed on this exchange
    pub exchange: Option<String>,
}

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Sqlite,
}

impl ExportFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Sqlite => "db",
        }
    }
}

impl Config {
    /// Resolves the output path, falling back to `<kind>.<extension>`
    pub fn output_path(&self) -> String {
        match &self.output.path {
            Some(path) => path.clone(),
            None => format!(
                "{}.{}",
                self.crawl.kind.as_str(),
                self.output.format.extension()
            ),
        }
    }
}
