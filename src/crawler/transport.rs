//! HTTP transport for the search endpoint
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the long-lived HTTP client with the fixed user agent and timeouts
//! - Shaping the request URL (scheme, search term, auxiliary parameters)
//! - Classifying failures as transient (status, network) or permanent (body)

use crate::config::ClientConfig;
use crate::crawler::retry::Transient;
use crate::query::Query;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use url::{form_urlencoded, Url};

/// Errors raised by a single fetch
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP status {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Network error for {url}: {source}")]
    Network {
        url: String,
        source: reqwest::Error,
    },

    #[error("Response from {url} is not valid JSON: {source}")]
    Body {
        url: String,
        source: serde_json::Error,
    },

    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl Transient for TransportError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::HttpStatus { .. } | Self::Network { .. })
    }
}

/// Issues one request per query and returns the decoded JSON body
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches the raw response for `query`
    async fn fetch(&self, query: &Query) -> Result<Value, TransportError>;
}

/// Builds the HTTP client shared by every request of a run
///
/// # Arguments
///
/// * `config` - The client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ClientConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(&config.user_agent)
        .connect_timeout(config.connect_timeout())
        .read_timeout(config.read_timeout())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the request URL for `query`
///
/// URL format: `{scheme}://{endpoint};searchTerm={term}?device=console&returnMeta=true`
///
/// # Example
///
/// ```
/// use ticker_sweep::crawler::request_url;
/// use ticker_sweep::query::Query;
///
/// let url = request_url("example.com/search", &Query::new("eurusd=x"), false).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://example.com/search;searchTerm=eurusd%3Dx?device=console&returnMeta=true"
/// );
/// ```
pub fn request_url(endpoint: &str, query: &Query, insecure: bool) -> Result<Url, url::ParseError> {
    let scheme = if insecure { "http" } else { "https" };

    // Queries never contain whitespace, so form encoding matches path encoding
    let term: String = form_urlencoded::byte_serialize(query.as_str().as_bytes()).collect();

    let mut url = Url::parse(&format!("{}://{};searchTerm={}", scheme, endpoint, term))?;
    url.query_pairs_mut()
        .append_pair("device", "console")
        .append_pair("returnMeta", "true");
    Ok(url)
}

/// Transport backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    insecure: bool,
}

impl HttpTransport {
    /// Creates a transport with a fresh client built from `config`
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a transport reusing an existing client
    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            insecure: config.insecure,
        }
    }

    /// Returns true if requests go over plain http
    pub fn is_insecure(&self) -> bool {
        self.insecure
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, query: &Query) -> Result<Value, TransportError> {
        let url = request_url(&self.endpoint, query, self.insecure)?;
        let url_str = url.to_string();
        tracing::trace!("GET {}", url_str);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| TransportError::Network {
                url: url_str.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                url: url_str,
                status: status.as_u16(),
            });
        }

        // A body cut short mid-stream is a network failure, not a schema one
        let bytes = response
            .bytes()
            .await
            .map_err(|source| TransportError::Network {
                url: url_str.clone(),
                source,
            })?;

        serde_json::from_slice(&bytes).map_err(|source| TransportError::Body {
            url: url_str,
            source,
        })
    }
}
