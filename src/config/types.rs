use serde::Deserialize;

/// Road-type tokens that terminate a street address match
pub const DEFAULT_ROAD_TYPES: &[&str] = &[
    "road",
    "rd",
    "way",
    "street",
    "st",
    "str",
    "avenue",
    "ave",
    "boulevard",
    "blvd",
    "lane",
    "ln",
    "drive",
    "dr",
    "terrace",
    "ter",
    "place",
    "pl",
    "court",
    "ct",
];

/// Public Nominatim search endpoint
pub const DEFAULT_GEOCODER_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// Main configuration structure for Address Scout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default, rename = "user-agents")]
    pub user_agents: UserAgentsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of domains crawled at the same time
    #[serde(rename = "max-concurrent-crawls", default = "default_max_concurrent_crawls")]
    pub max_concurrent_crawls: usize,

    /// Timeout for every page fetch (milliseconds)
    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Maximum redirect hops followed per fetch
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Scheme used to reach domains ("https" unless targeting a plain HTTP server)
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Drop pages whose body looks like an error page
    #[serde(rename = "skip-error-pages", default)]
    pub skip_error_pages: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_crawls: default_max_concurrent_crawls(),
            request_timeout_ms: default_request_timeout_ms(),
            max_redirects: default_max_redirects(),
            scheme: default_scheme(),
            skip_error_pages: false,
        }
    }
}

/// Address extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    /// Text nodes longer than this are not considered address-shaped
    #[serde(rename = "max-text-length", default = "default_max_text_length")]
    pub max_text_length: usize,

    /// Road-type vocabulary for the street pattern
    #[serde(rename = "road-types", default = "default_road_types")]
    pub road_types: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_text_length: default_max_text_length(),
            road_types: default_road_types(),
        }
    }
}

/// Geocoding service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeocoderConfig {
    /// Search endpoint of a Nominatim-compatible service
    #[serde(default = "default_geocoder_endpoint")]
    pub endpoint: String,

    /// User agent identifying this application to the geocoder
    #[serde(rename = "user-agent", default = "default_geocoder_user_agent")]
    pub user_agent: String,

    /// Retries after the first failed attempt
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between retries (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Minimum time between two requests across the whole run (milliseconds)
    #[serde(rename = "min-interval-ms", default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// Per-attempt timeout (milliseconds); falls back to the crawler request timeout
    #[serde(rename = "timeout-ms", default)]
    pub timeout_ms: Option<u64>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_geocoder_endpoint(),
            user_agent: default_geocoder_user_agent(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            min_interval_ms: default_min_interval_ms(),
            timeout_ms: None,
        }
    }
}

/// User-agent pool configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserAgentsConfig {
    /// Inline user-agent strings
    #[serde(default)]
    pub agents: Vec<String>,

    /// Newline-delimited file of user-agent strings
    #[serde(default)]
    pub path: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite result database
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,

    /// Optional CSV mirror of the result table
    #[serde(rename = "csv-path", default)]
    pub csv_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            csv_path: None,
        }
    }
}

fn default_max_concurrent_crawls() -> usize {
    20
}

fn default_request_timeout_ms() -> u64 {
    2000
}

fn default_max_redirects() -> usize {
    10
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_max_text_length() -> usize {
    100
}

fn default_road_types() -> Vec<String> {
    DEFAULT_ROAD_TYPES.iter().map(|s| s.to_string()).collect()
}

fn default_geocoder_endpoint() -> String {
    DEFAULT_GEOCODER_ENDPOINT.to_string()
}

fn default_geocoder_user_agent() -> String {
    format!("address-scout/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_min_interval_ms() -> u64 {
    1000
}

fn default_database_path() -> String {
    "output/addresses.db".to_string()
}
