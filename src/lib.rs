//! Address Scout: contact address discovery for company domains
//!
//! This crate crawls each domain's home page for "about"/"contact" pages,
//! fetches them, extracts street and postal-code candidates with regex
//! heuristics, geocodes both, and reconciles them into one address record
//! per domain.

pub mod address;
pub mod config;
pub mod crawler;
pub mod geocode;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Address Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Invalid stage transition for {domain}: {from:?} -> {to:?}")]
    InvalidTransition {
        domain: String,
        from: state::DomainStage,
        to: state::DomainStage,
    },

    #[error("Input error in {path}: {message}")]
    Input { path: String, message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Link normalization rejections and URL errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Empty href")]
    EmptyHref,

    #[error("mailto link: {0}")]
    MailtoLink(String),

    #[error("Not an about/contact link: {0}")]
    NotContactLink(String),

    #[error("Link points to another host: {0}")]
    ForeignHost(String),

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Address Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use address::{reconcile, Address, AddressExtractor, AddressRecord};
pub use config::Config;
pub use pipeline::{run, Pipeline, RunReport};
pub use state::DomainStage;
pub use url::{normalize_domain, normalize_link};
