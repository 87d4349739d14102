use crate::config::types::{
    Config, CrawlerConfig, ExtractorConfig, GeocoderConfig, OutputConfig,
};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_extractor_config(&config.extractor)?;
    validate_geocoder_config(&config.geocoder)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.max_concurrent_crawls < 1 || config.max_concurrent_crawls > 200 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_crawls must be between 1 and 200, got {}",
            config.max_concurrent_crawls
        )));
    }

    if config.request_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_ms must be >= 100ms, got {}ms",
            config.request_timeout_ms
        )));
    }

    if config.scheme != "https" && config.scheme != "http" {
        return Err(ConfigError::Validation(format!(
            "scheme must be \"https\" or \"http\", got '{}'",
            config.scheme
        )));
    }

    Ok(())
}

/// Validates extractor configuration
fn validate_extractor_config(config: &ExtractorConfig) -> ConfigResult<()> {
    if config.max_text_length == 0 {
        return Err(ConfigError::Validation(
            "max_text_length must be >= 1".to_string(),
        ));
    }

    if config.road_types.is_empty() {
        return Err(ConfigError::Validation(
            "road_types cannot be empty".to_string(),
        ));
    }

    // Tokens are spliced into a regex alternation
    for token in &config.road_types {
        if token.is_empty() || !token.chars().all(|c| c.is_alphanumeric()) {
            return Err(ConfigError::InvalidPattern(format!(
                "road type '{}' must be a non-empty alphanumeric word",
                token
            )));
        }
    }

    Ok(())
}

/// Validates geocoder configuration
fn validate_geocoder_config(config: &GeocoderConfig) -> ConfigResult<()> {
    let url = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid geocoder endpoint: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Geocoder endpoint must be HTTP(S), got '{}'",
            config.endpoint
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "geocoder user_agent cannot be empty".to_string(),
        ));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "geocoder max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if let Some(timeout) = config.timeout_ms {
        if timeout < 100 {
            return Err(ConfigError::Validation(format!(
                "geocoder timeout_ms must be >= 100ms, got {}ms",
                timeout
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if matches!(config.csv_path.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "csv_path cannot be empty when set".to_string(),
        ));
    }

    Ok(())
}
