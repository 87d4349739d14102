//! Integration tests for the Nominatim client and the lookup policy
//!
//! A wiremock server stands in for the Nominatim `/search` endpoint.

use address_scout::config::GeocoderConfig;
use address_scout::geocode::{GeocodeError, Geocoder, NominatimClient, RateLimitedGeocoder};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_config(server: &MockServer) -> GeocoderConfig {
    GeocoderConfig {
        endpoint: format!("{}/search", server.uri()),
        user_agent: "address-scout-tests".to_string(),
        max_retries: 2,
        retry_delay_ms: 0,
        min_interval_ms: 0,
        timeout_ms: Some(500),
    }
}

fn create_client(server: &MockServer) -> NominatimClient {
    NominatimClient::new(&create_test_config(server), Duration::from_millis(500))
        .expect("Failed to build client")
}

#[tokio::test]
async fn test_search_request_shape_and_parsing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "1600 Pennsylvania Avenue"))
        .and(query_param("format", "jsonv2"))
        .and(query_param("addressdetails", "1"))
        .and(query_param("limit", "1"))
        .and(header("user-agent", "address-scout-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "display_name": "White House, 1600, Pennsylvania Avenue Northwest, Washington, District of Columbia, 20500, United States",
            "address": {
                "house_number": "1600",
                "road": "Pennsylvania Avenue Northwest",
                "city": "Washington",
                "state": "District of Columbia",
                "postcode": "20500",
                "country": "United States"
            }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let result = create_client(&server)
        .geocode("1600 Pennsylvania Avenue")
        .await
        .expect("Request failed")
        .expect("Expected a match");

    let address = result.address.expect("Expected address details");
    assert_eq!(result.query, "1600 Pennsylvania Avenue");
    assert_eq!(address.road.as_deref(), Some("Pennsylvania Avenue Northwest"));
    assert_eq!(address.region.as_deref(), Some("District of Columbia"));
    assert_eq!(address.postcode.as_deref(), Some("20500"));
}

#[tokio::test]
async fn test_empty_result_is_no_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = create_client(&server).geocode("00000").await;
    assert!(matches!(result, Ok(None)));
}

#[tokio::test]
async fn test_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = create_client(&server).geocode("62704").await;
    assert!(matches!(
        result,
        Err(GeocodeError::Status {
            status_code: 503,
            ..
        })
    ));
}

#[tokio::test]
async fn test_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&server)
        .await;

    let result = create_client(&server).geocode("62704").await;
    assert!(matches!(result, Err(GeocodeError::Decode { .. })));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = NominatimClient::new(&create_test_config(&server), Duration::from_millis(200))
        .expect("Failed to build client");
    let result = client.geocode("62704").await;
    assert!(matches!(result, Err(GeocodeError::Timeout { .. })));
}

#[tokio::test]
async fn test_lookup_retries_transient_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "address": { "postcode": "62704", "country": "United States" }
        }])))
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let geocoder =
        RateLimitedGeocoder::new(Arc::new(create_client(&server)), &config, Duration::from_secs(1));

    let result = geocoder.lookup("62704").await.expect("Expected a match");
    assert_eq!(
        result.address.and_then(|a| a.postcode).as_deref(),
        Some("62704")
    );
    assert_eq!(geocoder.request_count(), 2);
}

#[tokio::test]
async fn test_lookup_gives_up_after_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let config = create_test_config(&server);
    let geocoder =
        RateLimitedGeocoder::new(Arc::new(create_client(&server)), &config, Duration::from_secs(1));

    assert!(geocoder.lookup("62704").await.is_none());
    assert_eq!(geocoder.request_count(), 3);
}

#[tokio::test]
async fn test_lookup_respects_min_interval() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mut config = create_test_config(&server);
    config.min_interval_ms = 100;
    let geocoder =
        RateLimitedGeocoder::new(Arc::new(create_client(&server)), &config, Duration::from_secs(1));

    let start = std::time::Instant::now();
    for query in ["10001", "62704", "94105"] {
        assert!(geocoder.lookup(query).await.is_none());
    }

    assert!(start.elapsed() >= Duration::from_millis(190));
}
