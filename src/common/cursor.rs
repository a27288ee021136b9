//! Pagination cursor normalization
//!
//! v3 list responses carry fully-qualified `next` links. Requests are always
//! issued against the configured base URL, so only the request URI is kept.

use url::{ParseError, Url};

/// Reduce a pagination href to its request URI (path plus query)
///
/// Returns None for an empty href, which ends traversal. Relative hrefs,
/// including scheme-relative ones (`//host/path`), lose any host as well.
pub fn request_uri(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let parsed = match Url::parse(href) {
        Err(ParseError::RelativeUrlWithoutBase) => {
            Url::parse(RELATIVE_BASE).and_then(|base| base.join(href))
        }
        other => other,
    };

    match parsed {
        Ok(url) => Some(path_and_query(&url)),
        Err(e) => {
            tracing::warn!(href, error = %e, "Unparseable pagination link, using as-is");
            Some(href.to_string())
        }
    }
}

/// Placeholder origin used only to resolve relative links
const RELATIVE_BASE: &str = "http://localhost/";

fn path_and_query(url: &Url) -> String {
    let mut uri = url.path().to_string();
    if uri.is_empty() {
        uri.push('/');
    }
    if let Some(query) = url.query() {
        uri.push('?');
        uri.push_str(query);
    }
    uri
}
