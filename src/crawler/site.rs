//! Site crawler - one hop from a domain's home page to its contact pages
//!
//! For a single domain this module:
//! - Fetches the home page (following redirects)
//! - Adopts the redirect target's host as the effective domain
//! - Collects same-site about/contact links from the home page
//! - Fetches each link and keeps the HTTP 200 responses

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{build_http_client, fetch_page, fetch_response, FetchError, FetchedPage};
use crate::crawler::parser::{extract_hrefs, looks_like_error_page};
use crate::url::{collect_contact_links, extract_domain};
use reqwest::Client;
use url::Url;

/// A page retrieved while crawling a domain
#[derive(Debug, Clone)]
pub struct PageFetch {
    /// The input domain this page was crawled for
    pub domain: String,

    /// Effective domain after following the home page redirect
    pub host: String,

    /// Final URL of the page
    pub url: Url,

    /// Raw page body
    pub body: String,
}

/// Crawls a domain's home page and its about/contact pages
#[derive(Debug, Clone)]
pub struct SiteCrawler {
    client: Client,
    scheme: String,
    skip_error_pages: bool,
}

impl SiteCrawler {
    /// Creates a crawler with its own HTTP client
    pub fn new(config: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, config))
    }

    /// Creates a crawler around an existing client
    pub fn with_client(client: Client, config: &CrawlerConfig) -> Self {
        Self {
            client,
            scheme: config.scheme.clone(),
            skip_error_pages: config.skip_error_pages,
        }
    }

    /// Crawls one domain
    ///
    /// # Algorithm
    ///
    /// 1. Fetch `scheme://domain`; any status is accepted
    /// 2. If the final URL's host differs, use it to resolve relative links
    /// 3. Record the home page as the first page, subject to the error-page
    ///    policy
    /// 4. Normalize every anchor href into the unique set of contact links
    /// 5. Fetch each link; keep HTTP 200 responses, drop any failure
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<PageFetch>)` - Pages in fetch order, home page first
    /// * `Err(FetchError)` - The home page request itself failed (network,
    ///   timeout, unreadable body)
    pub async fn crawl(&self, domain: &str, user_agent: &str) -> Result<Vec<PageFetch>, FetchError> {
        let home_str = format!("{}://{}", self.scheme, domain);
        let home_url = Url::parse(&home_str).map_err(|e| FetchError::InvalidUrl {
            url: home_str.clone(),
            message: e.to_string(),
        })?;

        tracing::info!("Crawling website: {}", domain);
        let home = fetch_response(&self.client, &home_url, user_agent).await?;
        if home.status_code != 200 {
            tracing::debug!("{} home page returned HTTP {}", domain, home.status_code);
        }

        let host = match extract_domain(&home.final_url) {
            Some(host) if host != domain => {
                tracing::debug!("{} redirected to {}", domain, host);
                host
            }
            _ => domain.to_string(),
        };

        let mut pages = Vec::new();

        let hrefs = extract_hrefs(&home.body);
        let links = collect_contact_links(&self.scheme, &host, hrefs.iter().map(String::as_str));
        tracing::debug!(
            "{}: {} anchors, {} contact/about links",
            domain,
            hrefs.len(),
            links.len()
        );

        let home_final = home.final_url.clone();
        self.record(&mut pages, domain, &host, home);

        for link in links {
            if link == home_final {
                continue;
            }

            match fetch_page(&self.client, &link, user_agent).await {
                Ok(page) if page.status_code == 200 => {
                    tracing::debug!("Fetched {}", page.final_url);
                    self.record(&mut pages, domain, &host, page);
                }
                Ok(page) => {
                    tracing::debug!("Skipping {}: HTTP {}", page.final_url, page.status_code);
                }
                Err(e) => {
                    tracing::debug!("Skipping {}: {}", link, e);
                }
            }
        }

        Ok(pages)
    }

    /// Appends a fetched page unless the error-page policy drops it
    fn record(&self, pages: &mut Vec<PageFetch>, domain: &str, host: &str, page: FetchedPage) {
        if looks_like_error_page(&page.body) {
            if self.skip_error_pages {
                tracing::debug!("Dropping {}: looks like an error page", page.final_url);
                return;
            }
            tracing::trace!("{} looks like an error page, keeping it", page.final_url);
        }

        pages.push(PageFetch {
            domain: domain.to_string(),
            host: host.to_string(),
            url: page.final_url,
            body: page.body,
        });
    }
}
