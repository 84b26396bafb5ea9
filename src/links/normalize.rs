//! URL normalization and crawlability checks shared by the classifier and
//! the crawl orchestrator.

use url::Url;

/// Path suffixes that never lead to a crawlable HTML page
const SKIP_EXTENSIONS: &[&str] = &[
    ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".svg", ".ico", ".css", ".js", ".xml", ".txt",
    ".zip", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".mp4", ".mp3", ".avi", ".woff",
    ".woff2", ".ttf", ".eot", ".json", ".rss",
];

/// Normalize a (possibly relative) href against a base URL.
///
/// The result has the shape `scheme://host[:port]/path[?query]`: the fragment
/// is dropped and a single trailing slash is removed from non-root paths.
/// Returns `None` for anything that cannot be resolved to a URL with a host.
///
/// # Examples
///
/// ```
/// use harvester::links::normalize_url;
///
/// assert_eq!(
///     normalize_url("/about", "https://example.com/page").as_deref(),
///     Some("https://example.com/about")
/// );
/// ```
pub fn normalize_url(href: &str, base: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let resolved = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(base).ok()?.join(href).ok()?,
        Err(_) => return None,
    };

    let authority = authority(&resolved)?;
    let mut path = resolved.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }

    let mut normalized = format!("{}://{}{}", resolved.scheme(), authority, path);
    if let Some(query) = resolved.query().filter(|q| !q.is_empty()) {
        normalized.push('?');
        normalized.push_str(query);
    }
    Some(normalized)
}

/// Host plus explicit port, the unit used for same-domain comparisons
pub fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Host of an absolute URL string, `None` if it does not parse
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok().as_ref().and_then(authority)
}

/// Whether a normalized URL may enter the crawl frontier for `base_host`
pub fn is_crawlable_url(url: &str, base_host: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    if authority(&parsed).as_deref() != Some(base_host) {
        return false;
    }

    let path = parsed.path().to_lowercase();
    !SKIP_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_href_resolves_against_base() {
        assert_eq!(
            normalize_url("/about", "https://example.com/page").as_deref(),
            Some("https://example.com/about")
        );
        assert_eq!(
            normalize_url("team", "https://example.com/company/").as_deref(),
            Some("https://example.com/company/team")
        );
    }

    #[test]
    fn test_fragment_dropped_and_query_kept() {
        assert_eq!(
            normalize_url("/docs/?page=2#intro", "https://example.com").as_deref(),
            Some("https://example.com/docs?page=2")
        );
    }

    #[test]
    fn test_root_slash_is_kept() {
        assert_eq!(
            normalize_url("https://example.com/", "https://other.org").as_deref(),
            Some("https://example.com/")
        );
        assert_eq!(
            normalize_url("https://example.com/blog/", "https://other.org").as_deref(),
            Some("https://example.com/blog")
        );
    }

    #[test]
    fn test_port_is_preserved() {
        assert_eq!(
            normalize_url("/a", "http://localhost:8080/x").as_deref(),
            Some("http://localhost:8080/a")
        );
    }

    #[test]
    fn test_malformed_input_yields_none() {
        assert!(normalize_url("", "https://example.com").is_none());
        assert!(normalize_url("mailto:team@example.com", "https://example.com").is_none());
        assert!(normalize_url("/about", "not a url").is_none());
        assert!(normalize_url("http://", "https://example.com").is_none());
    }

    #[test]
    fn test_crawlable_urls() {
        assert!(is_crawlable_url("https://example.com/about", "example.com"));
        assert!(!is_crawlable_url("https://other.com/about", "example.com"));
        assert!(!is_crawlable_url("https://example.com/report.PDF", "example.com"));
        assert!(!is_crawlable_url("ftp://example.com/file", "example.com"));
        assert!(!is_crawlable_url("garbage", "example.com"));
    }
}
