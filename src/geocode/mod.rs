//! Geocoding module
//!
//! Resolves free-text street addresses and postal codes into structured
//! address fields through an external lookup service:
//! - `Geocoder`: the lookup seam (one request, errors surfaced)
//! - `NominatimClient`: the OpenStreetMap Nominatim backend
//! - `RateLimitedGeocoder`: retries, per-attempt timeout, and a global
//!   minimum interval between requests; failures become "no result"

mod limiter;
mod nominatim;

pub use limiter::RateLimitedGeocoder;
pub use nominatim::{parse_place, NominatimClient};

use crate::address::Address;
use async_trait::async_trait;
use thiserror::Error;

/// A geocoding hit for one query
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    /// The text that was looked up
    pub query: String,

    /// Human-readable label of the match, if the service returned one
    pub display_name: Option<String>,

    /// Structured address details; None when the service returned none
    pub address: Option<Address>,

    /// The raw service payload
    pub raw: serde_json::Value,
}

/// Errors from a single geocoding request
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoding request for {query:?} failed: {message}")]
    Request { query: String, message: String },

    #[error("Geocoding request for {query:?} timed out")]
    Timeout { query: String },

    #[error("Geocoder returned HTTP {status_code} for {query:?}")]
    Status { query: String, status_code: u16 },

    #[error("Failed to decode geocoder response for {query:?}: {message}")]
    Decode { query: String, message: String },
}

/// A free-text geocoding backend
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Looks up one query
    ///
    /// # Returns
    ///
    /// * `Ok(Some(result))` - The service found a match
    /// * `Ok(None)` - The service found nothing
    /// * `Err(GeocodeError)` - The request itself failed
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeResult>, GeocodeError>;
}
