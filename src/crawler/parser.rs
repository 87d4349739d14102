//! HTML parser for link discovery
//!
//! This module handles parsing a home page to collect raw anchor hrefs, and
//! the error-page heuristic applied to fetched bodies.

use scraper::{Html, Selector};

/// Body markers of a soft error page
const ERROR_PAGE_MARKERS: &[&str] = &["404", "error", "not found"];

/// Extracts the raw href of every `<a>` tag in the document
///
/// Hrefs are returned as written in the page (trimmed), in document order.
/// Links carrying a `download` attribute are skipped.
///
/// # Example
///
/// ```
/// use address_scout::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/contact">Contact</a><a href="/about"></a></body></html>"#;
/// assert_eq!(extract_hrefs(html), vec!["/contact", "/about"]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut hrefs = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                let href = href.trim();
                if !href.is_empty() {
                    hrefs.push(href.to_string());
                }
            }
        }
    }

    hrefs
}

/// Returns true if the body contains any soft-error marker
///
/// A page passes only when it contains none of `404`, `error`, or
/// `not found` (case-insensitive). The check is coarse: plenty of healthy
/// pages mention "error" in inline scripts.
pub fn looks_like_error_page(body: &str) -> bool {
    let lower = body.to_lowercase();
    ERROR_PAGE_MARKERS.iter().any(|marker| lower.contains(marker))
}
