//! Crawler module for fetching a domain's home and contact pages
//!
//! This module contains the crawl side of the pipeline:
//! - HTTP fetching with timeout, redirect, and TLS policy
//! - Anchor extraction and the error-page heuristic
//! - The per-domain site crawler
//! - User-agent rotation

mod fetcher;
mod parser;
mod site;
mod user_agent;

pub use fetcher::{build_http_client, fetch_page, fetch_response, FetchError, FetchedPage};
pub use parser::{extract_hrefs, looks_like_error_page};
pub use site::{PageFetch, SiteCrawler};
pub use user_agent::{FixedUserAgent, RandomUserAgents, UserAgentSource, DEFAULT_USER_AGENT};
