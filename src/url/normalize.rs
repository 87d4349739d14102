use crate::url::domain::{extract_domain, same_site};
use crate::{UrlError, UrlResult};
use std::collections::BTreeSet;
use url::Url;

/// Substrings that mark an href as a contact/about page candidate
const CONTACT_MARKERS: &[&str] = &["about", "contact"];

/// Turns a raw anchor href into an absolute contact/about page URL
///
/// # Rules (applied in order)
///
/// 1. Reject empty hrefs and `mailto:` links
/// 2. Accept only hrefs containing `about` or `contact` (case-insensitive).
///    This is a substring heuristic, so `/aboutique` matches as well.
/// 3. Absolute `http(s)://` hrefs are used verbatim, provided they point at
///    the same site (a leading `www.` is ignored). Protocol-relative hrefs
///    (`//host/path`) get the scheme prefixed and follow the same rule.
/// 4. Hrefs starting with `/` become `scheme://domain` + href
/// 5. Anything else becomes `scheme://domain/` + href
///
/// The fragment is dropped so `/contact#form` and `/contact` collapse.
///
/// # Arguments
///
/// * `scheme` - Scheme for relative links (`https` in production)
/// * `domain` - The (possibly redirect-resolved) domain of the page
/// * `href` - The raw href attribute value
///
/// # Examples
///
/// ```
/// use address_scout::url::normalize_link;
///
/// let url = normalize_link("https", "example.com", "/contact-us").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/contact-us");
///
/// let url = normalize_link("https", "example.com", "about.html").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about.html");
///
/// assert!(normalize_link("https", "example.com", "mailto:contact@example.com").is_err());
/// assert!(normalize_link("https", "example.com", "/pricing").is_err());
/// ```
pub fn normalize_link(scheme: &str, domain: &str, href: &str) -> UrlResult<Url> {
    let href = href.trim();
    if href.is_empty() {
        return Err(UrlError::EmptyHref);
    }

    let lower = href.to_lowercase();
    if lower.starts_with("mailto:") {
        return Err(UrlError::MailtoLink(href.to_string()));
    }

    if !CONTACT_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return Err(UrlError::NotContactLink(href.to_string()));
    }

    let (candidate, needs_host_check) = if lower.starts_with("http://") || lower.starts_with("https://")
    {
        (href.to_string(), true)
    } else if href.starts_with("//") {
        (format!("{}:{}", scheme, href), true)
    } else if href.starts_with('/') {
        (format!("{}://{}{}", scheme, domain, href), false)
    } else {
        (format!("{}://{}/{}", scheme, domain, href), false)
    };

    let mut url = Url::parse(&candidate).map_err(|e| UrlError::Parse(format!("{}: {}", candidate, e)))?;

    let host = extract_domain(&url).ok_or(UrlError::MissingDomain)?;
    if needs_host_check && !same_site(&host, domain) {
        return Err(UrlError::ForeignHost(url.to_string()));
    }

    url.set_fragment(None);
    Ok(url)
}

/// Normalizes a batch of hrefs into the unique set of contact/about URLs
///
/// Rejected hrefs are logged at trace level and skipped.
pub fn collect_contact_links<'a, I>(scheme: &str, domain: &str, hrefs: I) -> BTreeSet<Url>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut links = BTreeSet::new();

    for href in hrefs {
        match normalize_link(scheme, domain, href) {
            Ok(url) => {
                links.insert(url);
            }
            Err(e) => tracing::trace!("Skipping href {:?} on {}: {}", href, domain, e),
        }
    }

    links
}
