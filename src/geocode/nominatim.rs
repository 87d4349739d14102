//! Nominatim (OpenStreetMap) search backend

use crate::address::Address;
use crate::config::GeocoderConfig;
use crate::geocode::{GeocodeError, GeocodeResult, Geocoder};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Keys Nominatim uses for the locality, most specific last
const CITY_KEYS: &[&str] = &["city", "town", "village", "municipality"];

/// Client for the Nominatim `/search` endpoint
#[derive(Debug, Clone)]
pub struct NominatimClient {
    client: Client,
    endpoint: String,
    user_agent: String,
}

impl NominatimClient {
    /// Creates a client from the geocoder configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Endpoint and identifying user agent
    /// * `timeout` - Request timeout of the underlying HTTP client
    pub fn new(config: &GeocoderConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            user_agent: config.user_agent.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<Option<GeocodeResult>, GeocodeError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(USER_AGENT, &self.user_agent)
            .query(&[
                ("q", query),
                ("format", "jsonv2"),
                ("addressdetails", "1"),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodeError::Timeout {
                        query: query.to_string(),
                    }
                } else {
                    GeocodeError::Request {
                        query: query.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status {
                query: query.to_string(),
                status_code: status.as_u16(),
            });
        }

        let places: Vec<Value> = response.json().await.map_err(|e| GeocodeError::Decode {
            query: query.to_string(),
            message: e.to_string(),
        })?;

        Ok(places.into_iter().next().map(|place| parse_place(query, place)))
    }
}

/// Converts one Nominatim place object into a `GeocodeResult`
///
/// The `address` object is mapped as: `country`, `state` (region), the first
/// of `city`/`town`/`village`/`municipality`, `postcode`, `road`,
/// `house_number`.
pub fn parse_place(query: &str, place: Value) -> GeocodeResult {
    let display_name = place
        .get("display_name")
        .and_then(Value::as_str)
        .map(str::to_string);

    let address = place.get("address").and_then(Value::as_object).map(|details| {
        let field = |key: &str| {
            details
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Address {
            country: field("country"),
            region: field("state"),
            city: CITY_KEYS.iter().find_map(|&key| field(key)),
            postcode: field("postcode"),
            road: field("road"),
            house_number: field("house_number"),
        }
    });

    GeocodeResult {
        query: query.to_string(),
        display_name,
        address,
        raw: place,
    }
}
