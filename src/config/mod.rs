//! Configuration module for Ticker-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a default, so a crawl can run without any file at all.
//!
//! # Example
//!
//! ```no_run
//! use ticker_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Backoff base: {}", config.retry.base);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    ClientConfig, Config, CrawlConfig, ExportFormat, OutputConfig, RetryConfig, DEFAULT_ENDPOINT,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, hash_content, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
