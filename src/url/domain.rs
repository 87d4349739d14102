use url::Url;

/// Extracts the domain (host plus any non-default port) from a URL
///
/// The port is kept so that a site served on a non-standard port resolves
/// relative links against the same origin.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use address_scout::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_domain(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Normalizes a raw domain entry from an input list
///
/// Trims whitespace, lowercases, and strips an optional scheme, path, and
/// trailing dot. Returns None for blank entries or entries without a host.
///
/// # Examples
///
/// ```
/// use address_scout::url::normalize_domain;
///
/// assert_eq!(normalize_domain("  Example.COM "), Some("example.com".to_string()));
/// assert_eq!(normalize_domain("https://example.com/about"), Some("example.com".to_string()));
/// assert_eq!(normalize_domain(""), None);
/// ```
pub fn normalize_domain(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&with_scheme).ok()?;
    let domain = extract_domain(&url)?;
    let domain = domain.trim_end_matches('.').to_string();

    if domain.is_empty() {
        None
    } else {
        Some(domain)
    }
}

/// Returns true when two domains name the same site, ignoring a `www.` prefix
pub fn same_site(a: &str, b: &str) -> bool {
    strip_www(&a.to_lowercase()) == strip_www(&b.to_lowercase())
}

fn strip_www(domain: &str) -> &str {
    domain.strip_prefix("www.").unwrap_or(domain)
}
