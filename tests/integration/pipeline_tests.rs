//! Integration tests for the domain pipeline
//!
//! Each test site is a wiremock server addressed as `127.0.0.1:<port>`, and
//! the geocoding service is a wiremock server speaking the Nominatim search
//! format.

use address_scout::config::Config;
use address_scout::crawler::FixedUserAgent;
use address_scout::output::{write_csv, RunMetadata, SqliteWriter};
use address_scout::{DomainStage, Pipeline};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTACT_PAGE: &str = r#"<html><body>
    <h1>Contact us</h1>
    <p>123 Main Street, Springfield, IL 62704</p>
    </body></html>"#;

/// Returns the `host:port` of a mock server
fn domain_of(server: &MockServer) -> String {
    server.uri().trim_start_matches("http://").to_string()
}

/// Creates a test configuration pointing at the mock geocoder
fn create_test_config(geocoder: &MockServer) -> Config {
    let mut config = Config::default();
    config.crawler.scheme = "http".to_string();
    config.crawler.request_timeout_ms = 500;
    config.crawler.max_concurrent_crawls = 4;
    config.geocoder.endpoint = format!("{}/search", geocoder.uri());
    config.geocoder.max_retries = 1;
    config.geocoder.retry_delay_ms = 0;
    config.geocoder.min_interval_ms = 0;
    config
}

fn create_pipeline(config: &Config) -> Pipeline {
    Pipeline::new(config, Arc::new(FixedUserAgent("TestBot/1.0".to_string())))
        .expect("Failed to build pipeline")
}

/// Serves a home page linking to `/contact-us`, which carries the address
async fn mount_company_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
            <a href="/products">Products</a>
            <a href="/contact-us">Contact</a>
            <a href="mailto:contact@example.com">Mail us</a>
            </body></html>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact-us"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CONTACT_PAGE))
        .mount(server)
        .await;
}

/// Answers the street and ZIP queries of `CONTACT_PAGE`; everything else misses
async fn mount_geocoder(server: &MockServer, zip_status: u16) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "123 Main Street"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "display_name": "123, Main Street, Springfield, Illinois, 62701, United States",
            "address": {
                "house_number": "123",
                "road": "Main Street",
                "city": "Springfield",
                "state": "Illinois",
                "postcode": "62701",
                "country": "United States"
            }
        }])))
        .mount(server)
        .await;

    let zip_response = if zip_status == 200 {
        ResponseTemplate::new(200).set_body_json(json!([{
            "display_name": "Springfield, Illinois, 62704, United States",
            "address": {
                "city": "Springfield",
                "state": "Illinois",
                "postcode": "62704",
                "country": "United States"
            }
        }]))
    } else {
        ResponseTemplate::new(zip_status)
    };

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "62704"))
        .respond_with(zip_response)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_resolves_one_site_and_skips_slow_one() {
    let geocoder = MockServer::start().await;
    mount_geocoder(&geocoder, 200).await;

    let site_a = MockServer::start().await;
    mount_company_site(&site_a).await;

    let site_b = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(CONTACT_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&site_b)
        .await;

    let config = create_test_config(&geocoder);
    let domains = vec![domain_of(&site_a), domain_of(&site_b)];
    let report = create_pipeline(&config).run(&domains).await;

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.domain, domains[0]);
    assert!(record.source_url.ends_with("/contact-us"));
    assert_eq!(record.address.road.as_deref(), Some("Main Street"));
    assert_eq!(record.address.postcode.as_deref(), Some("62704"));
    assert_eq!(record.address.city.as_deref(), Some("Springfield"));
    assert_eq!(record.address.region.as_deref(), Some("Illinois"));
    assert_eq!(record.address.country.as_deref(), Some("United States"));

    assert_eq!(report.domains[0].stage(), DomainStage::Resolved);
    assert_eq!(report.domains[1].stage(), DomainStage::CrawledEmpty);

    assert_eq!(report.stats.domains_in, 2);
    assert_eq!(report.stats.domains_crawled, 1);
    assert_eq!(report.stats.pages_fetched, 2);
    assert_eq!(report.stats.addresses_out, 1);
    assert_eq!(report.stats.unresolved, 0);
    assert_eq!(report.stats.geocode_requests, 2);
}

#[tokio::test]
async fn test_connection_refused_does_not_stop_other_domains() {
    let geocoder = MockServer::start().await;
    mount_geocoder(&geocoder, 200).await;

    let site = MockServer::start().await;
    mount_company_site(&site).await;

    let config = create_test_config(&geocoder);
    let domains = vec!["127.0.0.1:1".to_string(), domain_of(&site)];
    let report = create_pipeline(&config).run(&domains).await;

    assert_eq!(report.domains[0].stage(), DomainStage::CrawledEmpty);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].domain, domains[1]);
}

#[tokio::test]
async fn test_zip_failure_uses_street_result() {
    let geocoder = MockServer::start().await;
    mount_geocoder(&geocoder, 500).await;

    let site = MockServer::start().await;
    mount_company_site(&site).await;

    let config = create_test_config(&geocoder);
    let report = create_pipeline(&config).run(&[domain_of(&site)]).await;

    assert_eq!(report.records.len(), 1);
    let address = &report.records[0].address;
    assert_eq!(address.road.as_deref(), Some("Main Street"));
    assert_eq!(address.postcode.as_deref(), Some("62701"));
    assert_eq!(address.house_number.as_deref(), Some("123"));

    // One street request, two ZIP attempts (one retry)
    assert_eq!(report.stats.geocode_requests, 3);
}

#[tokio::test]
async fn test_redirected_home_page_resolves_links_on_target() {
    let geocoder = MockServer::start().await;
    mount_geocoder(&geocoder, 200).await;

    let target = MockServer::start().await;
    mount_company_site(&target).await;

    let origin = MockServer::start().await;
    let location = format!("{}/", target.uri());
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", location.as_str()))
        .mount(&origin)
        .await;

    let config = create_test_config(&geocoder);
    let report = create_pipeline(&config).run(&[domain_of(&origin)]).await;

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.domain, domain_of(&origin));
    assert!(record.source_url.starts_with(&target.uri()));
}

#[tokio::test]
async fn test_error_status_home_page_is_still_crawled() {
    let geocoder = MockServer::start().await;
    mount_geocoder(&geocoder, 200).await;

    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(r#"<a href="/contact-us">Contact</a>"#),
        )
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/contact-us"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CONTACT_PAGE))
        .mount(&site)
        .await;

    let config = create_test_config(&geocoder);
    let report = create_pipeline(&config).run(&[domain_of(&site)]).await;

    assert_eq!(report.domains[0].stage(), DomainStage::Resolved);
    assert_eq!(report.stats.pages_fetched, 2);
    assert_eq!(report.records.len(), 1);
    assert!(report.records[0].source_url.ends_with("/contact-us"));
    assert_eq!(report.records[0].address.road.as_deref(), Some("Main Street"));
}

#[tokio::test]
async fn test_unresolved_domain_produces_no_record() {
    let geocoder = MockServer::start().await;
    mount_geocoder(&geocoder, 200).await;

    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<a href="/about">About</a><p>We sell things.</p>"#),
        )
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .mount(&site)
        .await;

    let config = create_test_config(&geocoder);
    let report = create_pipeline(&config).run(&[domain_of(&site)]).await;

    assert!(report.records.is_empty());
    assert_eq!(report.domains[0].stage(), DomainStage::Unresolved);
    assert_eq!(report.stats.pages_fetched, 1);
    assert_eq!(report.stats.unresolved, 1);
    assert_eq!(report.stats.geocode_requests, 0);
}

#[tokio::test]
async fn test_concurrency_cap_is_respected() {
    let geocoder = MockServer::start().await;
    mount_geocoder(&geocoder, 200).await;

    let mut sites = Vec::new();
    for _ in 0..6 {
        let site = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("<p>Hello</p>")
                    .set_delay(Duration::from_millis(150)),
            )
            .mount(&site)
            .await;
        sites.push(site);
    }

    let mut config = create_test_config(&geocoder);
    config.crawler.max_concurrent_crawls = 2;

    let domains: Vec<String> = sites.iter().map(domain_of).collect();
    let report = create_pipeline(&config).run(&domains).await;

    assert!(report.stats.peak_concurrent_crawls >= 1);
    assert!(report.stats.peak_concurrent_crawls <= 2);
    assert_eq!(report.stats.domains_crawled, 6);
    assert!(report
        .domains
        .iter()
        .all(|d| d.stage() == DomainStage::Unresolved));
}

#[tokio::test]
async fn test_at_most_one_record_per_domain() {
    let geocoder = MockServer::start().await;
    mount_geocoder(&geocoder, 200).await;

    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<a href="/about">About</a><a href="/contact">Contact</a>{}"#,
            CONTACT_PAGE
        )))
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CONTACT_PAGE))
        .mount(&site)
        .await;

    let config = create_test_config(&geocoder);
    let domain = domain_of(&site);
    let domains = vec![domain.clone(), domain.clone(), domain.clone()];
    let report = create_pipeline(&config).run(&domains).await;

    assert_eq!(report.stats.domains_in, 1);
    assert_eq!(report.records.len(), 1);
    // Home page resolved, the contact pages were never geocoded
    assert!(!report.records[0].source_url.contains("contact"));
    assert_eq!(report.stats.pages_fetched, 3);
    assert_eq!(report.stats.geocode_requests, 2);
}

#[tokio::test]
async fn test_results_written_to_database_and_csv() {
    let geocoder = MockServer::start().await;
    mount_geocoder(&geocoder, 200).await;

    let site = MockServer::start().await;
    mount_company_site(&site).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("addresses.db");
    let csv_path = dir.path().join("addresses.csv");

    let config = create_test_config(&geocoder);
    let started_at = Utc::now();
    let report = create_pipeline(&config).run(&[domain_of(&site)]).await;

    let mut writer = SqliteWriter::open(&db_path).expect("Failed to open database");
    let run_id = writer
        .write_run(
            &RunMetadata {
                started_at,
                finished_at: Utc::now(),
                config_hash: "test".to_string(),
                domains_in: report.stats.domains_in,
            },
            &report.records,
        )
        .expect("Failed to write run");
    write_csv(&csv_path, &report.records).expect("Failed to write CSV");

    assert_eq!(writer.load_addresses(run_id).unwrap(), report.records);

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[1].starts_with(&domain_of(&site)));
    assert!(rows[1].contains("Main Street"));
}
