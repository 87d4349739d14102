//! Configuration module for Address Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so an empty file is a valid configuration.
//!
//! # Example
//!
//! ```no_run
//! use address_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawling {} domains at a time", config.crawler.max_concurrent_crawls);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, ExtractorConfig, GeocoderConfig, OutputConfig, UserAgentsConfig,
    DEFAULT_GEOCODER_ENDPOINT, DEFAULT_ROAD_TYPES,
};

// Re-export parser functions
pub use parser::{hash_config, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
