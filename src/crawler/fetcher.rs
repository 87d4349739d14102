//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made while crawling a site:
//! - Building the shared HTTP client (timeout, redirects, TLS policy)
//! - GET requests with a per-request user agent, with or without a 2xx gate
//! - Error classification into `FetchError`

use crate::config::CrawlerConfig;
use reqwest::header::USER_AGENT;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    /// Final HTTP status code
    pub status_code: u16,

    /// Page body content
    pub body: String,
}

/// Reasons a single fetch produced no page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status_code} from {url}")]
    HttpStatus { url: String, status_code: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Failed to read body of {url}: {message}")]
    Body { url: String, message: String },

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

impl FetchError {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::HttpStatus { url, .. }
            | Self::Timeout { url }
            | Self::Network { url, .. }
            | Self::Body { url, .. }
            | Self::InvalidUrl { url, .. } => url,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

/// Builds the HTTP client shared by all crawl tasks
///
/// Certificate verification is disabled; broken chains are common on the
/// sites being crawled.
///
/// # Example
///
/// ```
/// use address_scout::config::CrawlerConfig;
/// use address_scout::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_millis(config.request_timeout_ms);

    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .redirect(Policy::limited(config.max_redirects))
        .danger_accept_invalid_certs(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with the given user agent, whatever the final status
///
/// Redirects are followed by the client. Only transport failures (network,
/// timeout, unreadable body) are errors; the status is left to the caller.
pub async fn fetch_response(
    client: &Client,
    url: &Url,
    user_agent: &str,
) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url.clone())
        .header(USER_AGENT, user_agent)
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

    let status_code = response.status().as_u16();
    let final_url = response.url().clone();

    let body = response.text().await.map_err(|e| {
        if e.is_timeout() {
            FetchError::Timeout {
                url: final_url.to_string(),
            }
        } else {
            FetchError::Body {
                url: final_url.to_string(),
                message: e.to_string(),
            }
        }
    })?;

    Ok(FetchedPage {
        final_url,
        status_code,
        body,
    })
}

/// Fetches a URL, treating any non-2xx final status as an error
pub async fn fetch_page(
    client: &Client,
    url: &Url,
    user_agent: &str,
) -> Result<FetchedPage, FetchError> {
    let page = fetch_response(client, url, user_agent).await?;

    if !(200..300).contains(&page.status_code) {
        return Err(FetchError::HttpStatus {
            url: page.final_url.to_string(),
            status_code: page.status_code,
        });
    }

    Ok(page)
}
