//! Retry, timeout, and request-interval policy around a `Geocoder`

use crate::config::GeocoderConfig;
use crate::geocode::{GeocodeResult, Geocoder};
use governor::{Quota, RateLimiter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

type DirectRateLimiter = RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Wraps a geocoder with the lookup policy shared by the whole run
///
/// - Up to `max_retries` retries after a failed attempt
/// - Each attempt bounded by its own timeout
/// - At least `min_interval` between the start of any two requests, across
///   all domains and tasks
/// - Failures are logged and surfaced as `None`
pub struct RateLimitedGeocoder {
    inner: Arc<dyn Geocoder>,
    max_retries: u32,
    retry_delay: Duration,
    timeout: Duration,
    /// None when no minimum interval is configured
    limiter: Option<DirectRateLimiter>,
    requests: AtomicU64,
}

impl RateLimitedGeocoder {
    /// Creates the wrapper
    ///
    /// # Arguments
    ///
    /// * `inner` - The backend performing single requests
    /// * `config` - Retry and interval settings
    /// * `default_timeout` - Used when the config sets no geocoder timeout
    pub fn new(inner: Arc<dyn Geocoder>, config: &GeocoderConfig, default_timeout: Duration) -> Self {
        Self {
            inner,
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            timeout: config
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(default_timeout),
            limiter: Quota::with_period(Duration::from_millis(config.min_interval_ms))
                .map(RateLimiter::direct),
            requests: AtomicU64::new(0),
        }
    }

    /// Looks up a query; any failure after the last retry yields None
    pub async fn lookup(&self, query: &str) -> Option<GeocodeResult> {
        for attempt in 0..=self.max_retries {
            self.wait_for_slot().await;
            self.requests.fetch_add(1, Ordering::Relaxed);

            match tokio::time::timeout(self.timeout, self.inner.geocode(query)).await {
                Ok(Ok(result)) => {
                    if result.is_none() {
                        tracing::debug!("No geocoding match for {:?}", query);
                    }
                    return result;
                }
                Ok(Err(e)) => {
                    tracing::debug!("Geocoding attempt {} failed: {}", attempt + 1, e);
                }
                Err(_) => {
                    tracing::debug!(
                        "Geocoding attempt {} for {:?} timed out after {:?}",
                        attempt + 1,
                        query,
                        self.timeout
                    );
                }
            }

            if attempt < self.max_retries && !self.retry_delay.is_zero() {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        tracing::warn!(
            "Giving up geocoding {:?} after {} attempts",
            query,
            self.max_retries + 1
        );
        None
    }

    /// Total requests sent to the backend so far, retries included
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// Waits until the shared quota admits one more request
    async fn wait_for_slot(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}
