//! Per-domain address resolution
//!
//! Walks a domain's pages in fetch order and stops at the first page whose
//! candidates reconcile into an address.

use crate::address::{reconcile, AddressExtractor, AddressRecord};
use crate::crawler::PageFetch;
use crate::geocode::{GeocodeResult, RateLimitedGeocoder};
use std::collections::HashSet;

/// Resolves one domain's pages to at most one address record
///
/// # Arguments
///
/// * `extractor` - Compiled address patterns
/// * `geocoder` - Shared, rate-limited geocoder
/// * `domain` - The input domain, used for the record
/// * `pages` - Pages in fetch order, home page first
///
/// # Returns
///
/// * `Some(AddressRecord)` - From the first page that resolved
/// * `None` - No page resolved
pub async fn resolve_domain(
    extractor: &AddressExtractor,
    geocoder: &RateLimitedGeocoder,
    domain: &str,
    pages: &[PageFetch],
) -> Option<AddressRecord> {
    let mut submitted = SubmittedQueries::default();

    for page in pages {
        tracing::debug!("Parsing address from {}", page.url);

        let candidates = match extractor.extract(&page.body) {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::debug!("{}: {}", page.url, e);
                continue;
            }
        };

        let street = match candidates.street {
            Some(street) if submitted.streets.insert(street.clone()) => {
                lookup(geocoder, &street).await
            }
            _ => None,
        };
        let zip = match candidates.postal_code {
            Some(zip) if submitted.zips.insert(zip.clone()) => lookup(geocoder, &zip).await,
            _ => None,
        };

        if let Some(address) = reconcile(street.as_ref(), zip.as_ref()) {
            tracing::info!("Resolved address for {} from {}", domain, page.url);
            return Some(AddressRecord {
                domain: domain.to_string(),
                source_url: page.url.to_string(),
                address,
            });
        }
    }

    tracing::info!("No address found for {} in {} pages", domain, pages.len());
    None
}

/// Query strings already sent to the geocoder for the current domain
#[derive(Debug, Default)]
struct SubmittedQueries {
    streets: HashSet<String>,
    zips: HashSet<String>,
}

async fn lookup(geocoder: &RateLimitedGeocoder, query: &str) -> Option<GeocodeResult> {
    tracing::debug!("Geocoding {:?}", query);
    geocoder.lookup(query).await
}
