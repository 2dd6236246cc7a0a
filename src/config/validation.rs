use crate::config::types::{ClientConfig, Config, CrawlConfig, OutputConfig, RetryConfig};
use crate::query::alphabet::is_searchable;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_client_config(&config.client)?;
    validate_retry_config(&config.retry)?;
    validate_crawl_config(&config.crawl)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.endpoint.is_empty() {
        return Err(ConfigError::Validation("endpoint cannot be empty".to_string()));
    }

    // The scheme is chosen at request time from the insecure flag
    if config.endpoint.contains("://") {
        return Err(ConfigError::InvalidUrl(format!(
            "endpoint must not include a scheme, got '{}'",
            config.endpoint
        )));
    }

    Url::parse(&format!("https://{}", config.endpoint))
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint: {}", e)))?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 || config.read_timeout_secs == 0 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got connect={}s read={}s",
            config.connect_timeout_secs, config.read_timeout_secs
        )));
    }

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.base < 2 {
        return Err(ConfigError::Validation(format!(
            "retry base must be >= 2, got {}",
            config.base
        )));
    }

    // 5^10 seconds is already well beyond any sensible wait
    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

/// Validates crawl configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    let Some(seeds) = &config.seeds else {
        return Ok(());
    };

    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "seeds must contain at least one query".to_string(),
        ));
    }

    for seed in seeds {
        if seed.is_empty() || seed.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "seed '{}' must be non-empty and contain no whitespace",
                seed
            )));
        }

        if !is_searchable(seed) {
            tracing::warn!(
                "Seed '{}' has characters outside the search alphabet; its expansions may never narrow",
                seed
            );
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if matches!(config.path.as_deref(), Some("")) {
        return Err(ConfigError::Validation("output path cannot be empty".to_string()));
    }

    if matches!(config.exchange.as_deref(), Some(e) if e.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "exchange filter cannot be empty".to_string(),
        ));
    }

    Ok(())
}
