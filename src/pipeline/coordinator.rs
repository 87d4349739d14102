//! Pipeline coordinator
//!
//! Runs the two phases of a run:
//! - Crawl: every domain is crawled in its own task, at most `cap` at once
//! - Extract: after all crawls have finished, each domain's pages are
//!   scanned and geocoded in their own task, under the same cap
//!
//! Task results flow back through the join handles and are merged in input
//! order once each phase is complete.

use crate::address::{AddressExtractor, AddressRecord};
use crate::config::Config;
use crate::crawler::{FetchError, PageFetch, SiteCrawler, UserAgentSource};
use crate::geocode::{Geocoder, NominatimClient, RateLimitedGeocoder};
use crate::output::RunStatistics;
use crate::pipeline::resolve::resolve_domain;
use crate::pipeline::slots::TaskSlots;
use crate::state::{DomainProgress, DomainStage};
use crate::ScoutError;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    /// At most one record per domain, in input order
    pub records: Vec<AddressRecord>,

    /// Final stage of every unique input domain, in input order
    pub domains: Vec<DomainProgress>,

    pub stats: RunStatistics,
}

/// Crawl phase result for one domain
struct CrawledDomain {
    index: usize,
    progress: DomainProgress,
    pages: Vec<PageFetch>,
}

/// Extraction phase result for one domain
struct ResolvedDomain {
    index: usize,
    progress: DomainProgress,
    page_count: usize,
    record: Option<AddressRecord>,
}

/// The domain pipeline
///
/// Holds the immutable settings of a run. Cloning is cheap; all heavy parts
/// are shared.
#[derive(Clone)]
pub struct Pipeline {
    crawler: SiteCrawler,
    extractor: Arc<AddressExtractor>,
    geocoder: Arc<RateLimitedGeocoder>,
    user_agents: Arc<dyn UserAgentSource>,
    max_concurrent: usize,
}

impl Pipeline {
    /// Creates a pipeline geocoding through the configured Nominatim endpoint
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration
    /// * `user_agents` - Source of the user agent for each crawl
    pub fn new(config: &Config, user_agents: Arc<dyn UserAgentSource>) -> Result<Self, ScoutError> {
        let backend = NominatimClient::new(&config.geocoder, geocode_timeout(config))?;
        Self::with_geocoder(config, Arc::new(backend), user_agents)
    }

    /// Creates a pipeline around any geocoding backend
    pub fn with_geocoder(
        config: &Config,
        geocoder: Arc<dyn Geocoder>,
        user_agents: Arc<dyn UserAgentSource>,
    ) -> Result<Self, ScoutError> {
        let crawler = SiteCrawler::new(&config.crawler)?;
        let extractor = AddressExtractor::new(&config.extractor)?;
        let geocoder = RateLimitedGeocoder::new(geocoder, &config.geocoder, geocode_timeout(config));

        Ok(Self {
            crawler,
            extractor: Arc::new(extractor),
            geocoder: Arc::new(geocoder),
            user_agents,
            max_concurrent: config.crawler.max_concurrent_crawls.max(1),
        })
    }

    /// Runs the pipeline over a list of domains
    ///
    /// Duplicate and blank entries are dropped. Failures of individual
    /// domains never abort the run; they only mean no record for that domain.
    pub async fn run(&self, domains: &[String]) -> RunReport {
        let started = Instant::now();
        let geocode_requests_before = self.geocoder.request_count();
        let domains = unique_domains(domains);

        tracing::info!(
            "Starting run over {} domains (max {} concurrent crawls)",
            domains.len(),
            self.max_concurrent
        );

        let crawl_slots = TaskSlots::new(self.max_concurrent);
        let crawled = self.crawl_all(&crawl_slots, &domains).await;

        let domains_crawled = crawled.iter().filter(|c| !c.pages.is_empty()).count();
        tracing::info!(
            "Crawl phase complete: {} of {} domains returned pages",
            domains_crawled,
            domains.len()
        );

        let resolved = self.extract_all(crawled).await;

        let mut stats = RunStatistics {
            domains_in: domains.len(),
            domains_crawled,
            peak_concurrent_crawls: crawl_slots.peak(),
            ..RunStatistics::default()
        };
        let mut records = Vec::new();
        let mut progress = Vec::with_capacity(resolved.len());

        for domain in resolved {
            stats.pages_fetched += domain.page_count;
            if domain.progress.stage() == DomainStage::Unresolved {
                stats.unresolved += 1;
            }
            if let Some(record) = domain.record {
                records.push(record);
            }
            progress.push(domain.progress);
        }

        stats.addresses_out = records.len();
        stats.geocode_requests = self.geocoder.request_count() - geocode_requests_before;
        stats.elapsed = started.elapsed();

        tracing::info!(
            "Run complete: {} addresses from {} domains in {:.1}s",
            stats.addresses_out,
            stats.domains_in,
            stats.elapsed.as_secs_f64()
        );

        RunReport {
            records,
            domains: progress,
            stats,
        }
    }

    /// Crawls every domain, at most `max_concurrent` at a time
    async fn crawl_all(&self, slots: &TaskSlots, domains: &[String]) -> Vec<CrawledDomain> {
        let mut tasks = JoinSet::new();

        for (index, domain) in domains.iter().enumerate() {
            let Some(slot) = slots.acquire().await else {
                tracing::error!("Crawl slots closed, skipping {}", domain);
                continue;
            };

            let crawler = self.crawler.clone();
            let user_agent = self.user_agents.next();
            let domain = domain.clone();

            tasks.spawn(async move {
                let _slot = slot;
                let mut progress = DomainProgress::new(domain.clone());
                advance(&mut progress, DomainStage::Crawling);

                let pages = match crawler.crawl(&domain, &user_agent).await {
                    Ok(pages) => pages,
                    Err(e) => {
                        tracing::warn!("{}", crawl_failure(&domain, &e));
                        Vec::new()
                    }
                };

                let stage = if pages.is_empty() {
                    DomainStage::CrawledEmpty
                } else {
                    DomainStage::CrawledWithPages
                };
                advance(&mut progress, stage);
                tracing::info!("Crawled {}: {} pages", domain, pages.len());

                CrawledDomain {
                    index,
                    progress,
                    pages,
                }
            });
        }

        let mut crawled = Vec::with_capacity(domains.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(domain) => crawled.push(domain),
                Err(e) => tracing::error!("Crawl task failed: {}", e),
            }
        }

        crawled.sort_by_key(|c| c.index);
        crawled
    }

    /// Resolves each crawled domain's pages, at most `max_concurrent` at a time
    async fn extract_all(&self, crawled: Vec<CrawledDomain>) -> Vec<ResolvedDomain> {
        let slots = TaskSlots::new(self.max_concurrent);
        let mut resolved = Vec::with_capacity(crawled.len());
        let mut tasks = JoinSet::new();

        for CrawledDomain {
            index,
            mut progress,
            pages,
        } in crawled
        {
            if pages.is_empty() {
                resolved.push(ResolvedDomain {
                    index,
                    progress,
                    page_count: 0,
                    record: None,
                });
                continue;
            }

            let Some(slot) = slots.acquire().await else {
                tracing::error!("Extraction slots closed, skipping {}", progress.domain());
                continue;
            };

            let extractor = self.extractor.clone();
            let geocoder = self.geocoder.clone();

            tasks.spawn(async move {
                let _slot = slot;
                advance(&mut progress, DomainStage::Extracting);

                let domain = progress.domain().to_string();
                let record = resolve_domain(&extractor, &geocoder, &domain, &pages).await;

                let stage = if record.is_some() {
                    DomainStage::Resolved
                } else {
                    DomainStage::Unresolved
                };
                advance(&mut progress, stage);

                ResolvedDomain {
                    index,
                    progress,
                    page_count: pages.len(),
                    record,
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(domain) => resolved.push(domain),
                Err(e) => tracing::error!("Extraction task failed: {}", e),
            }
        }

        resolved.sort_by_key(|r| r.index);
        resolved
    }
}

/// Per-attempt geocoding timeout: the geocoder's own, else the request timeout
fn geocode_timeout(config: &Config) -> Duration {
    Duration::from_millis(
        config
            .geocoder
            .timeout_ms
            .unwrap_or(config.crawler.request_timeout_ms),
    )
}

/// Log line for a crawl that produced no pages
fn crawl_failure(domain: &str, error: &FetchError) -> String {
    if error.is_timeout() {
        format!("Timed out crawling {} at {}", domain, error.url())
    } else {
        format!("Failed to crawl {}: {}", domain, error)
    }
}

/// Applies a stage transition, logging an illegal one instead of failing
fn advance(progress: &mut DomainProgress, next: DomainStage) {
    if let Err(e) = progress.advance(next) {
        tracing::error!("{}", e);
    }
}

/// Trims entries and drops blanks and repeats, keeping first-seen order
fn unique_domains(domains: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(domains.len());

    for domain in domains {
        let domain = domain.trim();
        if domain.is_empty() {
            continue;
        }
        if seen.insert(domain.to_string()) {
            unique.push(domain.to_string());
        } else {
            tracing::debug!("Skipping duplicate domain {}", domain);
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::FixedUserAgent;
    use crate::geocode::{GeocodeError, GeocodeResult};
    use async_trait::async_trait;

    struct NoMatches;

    #[async_trait]
    impl Geocoder for NoMatches {
        async fn geocode(&self, _query: &str) -> Result<Option<GeocodeResult>, GeocodeError> {
            Ok(None)
        }
    }

    fn pipeline() -> Pipeline {
        Pipeline::with_geocoder(
            &Config::default(),
            Arc::new(NoMatches),
            Arc::new(FixedUserAgent("test-agent".to_string())),
        )
        .unwrap()
    }

    #[test]
    fn test_unique_domains() {
        let input = vec![
            "a.com".to_string(),
            " b.com ".to_string(),
            "a.com".to_string(),
            "".to_string(),
            "b.com".to_string(),
        ];
        assert_eq!(unique_domains(&input), vec!["a.com", "b.com"]);
    }

    #[test]
    fn test_geocode_timeout_falls_back_to_request_timeout() {
        let mut config = Config::default();
        config.crawler.request_timeout_ms = 1500;
        assert_eq!(geocode_timeout(&config), Duration::from_millis(1500));

        config.geocoder.timeout_ms = Some(4000);
        assert_eq!(geocode_timeout(&config), Duration::from_millis(4000));
    }

    #[test]
    fn test_crawl_failure_names_timed_out_url() {
        let timeout = FetchError::Timeout {
            url: "https://slow.example/".to_string(),
        };
        assert_eq!(
            crawl_failure("slow.example", &timeout),
            "Timed out crawling slow.example at https://slow.example/"
        );

        let network = FetchError::Network {
            url: "https://down.example/".to_string(),
            message: "connection refused".to_string(),
        };
        let message = crawl_failure("down.example", &network);
        assert!(message.starts_with("Failed to crawl down.example: "));
        assert!(message.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let report = pipeline().run(&[]).await;
        assert!(report.records.is_empty());
        assert!(report.domains.is_empty());
        assert_eq!(report.stats.domains_in, 0);
        assert_eq!(report.stats.peak_concurrent_crawls, 0);
    }
}
