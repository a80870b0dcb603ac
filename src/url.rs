//! URL parsing and stringification.
//!
//! [`parse_url`] splits a URL into its parts following the grammar
//!
//! ```text
//! [scheme ":"] ["//" authority] path ["?" query] ["#" fragment]
//! ```
//!
//! where the scheme stops at the first `:`, `/`, `?` or `#`, the authority
//! at the first `/`, `?` or `#`, the path at the first `?` or `#`, and the
//! query at the first `#`. [`stringify_url`] goes the other way.
//!
//! # Example
//!
//! ```
//! use page_navigator::url::{parse_url, stringify_url, UrlParts};
//! use page_navigator::Query;
//!
//! let url = parse_url("https://example.com:8080/pages/detail?id=7#top");
//! assert_eq!(url.hostname, "example.com");
//! assert_eq!(url.port, "8080");
//! assert_eq!(url.pathname, "/pages/detail");
//! assert_eq!(url.query.get("id"), Some("7"));
//!
//! let s = stringify_url(&UrlParts {
//!     path: Some("/pages/detail?id=7".into()),
//!     query: Some(Query::new().with("tab", "info")),
//!     ..UrlParts::default()
//! });
//! assert_eq!(s, "/pages/detail?id=7&tab=info");
//! ```

use crate::params::Query;
use std::fmt;

/// How the query part is returned by [`parse_url_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Return the raw query string instead of a decomposed [`Query`].
    pub query_string: bool,
}

/// Query part of a parsed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlQuery {
    /// Decomposed key/value pairs.
    Parsed(Query),
    /// Raw text between `?` and `#`.
    Raw(String),
}

impl UrlQuery {
    /// View as a decomposed query, parsing the raw form if needed.
    pub fn to_query(&self) -> Query {
        match self {
            UrlQuery::Parsed(query) => query.clone(),
            UrlQuery::Raw(raw) => Query::from_query_string(raw),
        }
    }
}

/// A URL split into its structured parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    /// Scheme without the trailing `:` (e.g. `"https"`).
    pub protocol: String,
    /// Whether an `//authority` section was present.
    pub slashes: bool,
    /// Authority, including any port.
    pub host: String,
    /// Authority up to the first `:`.
    pub hostname: String,
    /// Text after the first `:` in the authority.
    pub port: String,
    /// Path, `/` when absent.
    pub pathname: String,
    /// `pathname` followed by `search`.
    pub path: String,
    /// Query including the leading `?`, or empty.
    pub search: String,
    /// Decomposed query parameters.
    pub query: Query,
    /// Fragment without the leading `#`.
    pub hash: String,
}

/// A [`Url`] whose query was kept in the form requested by [`ParseOptions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// All other parts.
    pub url: Url,
    /// The query in the requested form.
    pub query: UrlQuery,
}

/// Partial URL description accepted by [`stringify_url`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    pub protocol: Option<String>,
    pub slashes: bool,
    pub host: Option<String>,
    /// Baseline path (may carry its own query and fragment).
    pub path: Option<String>,
    /// Overrides the pathname recovered from `path`.
    pub pathname: Option<String>,
    /// Merged over the query recovered from `path`.
    pub query: Option<Query>,
    /// Overrides the fragment recovered from `path`.
    pub hash: Option<String>,
}

impl From<&Url> for UrlParts {
    fn from(url: &Url) -> Self {
        Self {
            protocol: Some(url.protocol.clone()),
            slashes: url.slashes,
            host: Some(url.host.clone()),
            path: Some(url.path.clone()),
            pathname: Some(url.pathname.clone()),
            query: Some(url.query.clone()),
            hash: Some(url.hash.clone()),
        }
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify_url(&UrlParts::from(self)))
    }
}

/// Parse a URL, decomposing its query.
pub fn parse_url(input: &str) -> Url {
    let (protocol, rest) = split_scheme(input);

    let (slashes, host, rest) = match rest.strip_prefix("//") {
        Some(after) => {
            let end = after.find(['/', '?', '#']).unwrap_or(after.len());
            (true, &after[..end], &after[end..])
        }
        None => (false, "", rest),
    };

    let path_end = rest.find(['?', '#']).unwrap_or(rest.len());
    let (raw_path, rest) = rest.split_at(path_end);

    let (search, raw_query, rest) = match rest.strip_prefix('?') {
        Some(after) => {
            let end = after.find('#').unwrap_or(after.len());
            (&rest[..=end], &after[..end], &after[end..])
        }
        None => ("", "", rest),
    };

    let hash = rest.strip_prefix('#').unwrap_or("");

    let (hostname, port) = host.split_once(':').unwrap_or((host, ""));
    let pathname = if raw_path.is_empty() { "/" } else { raw_path };

    Url {
        protocol: protocol.to_string(),
        slashes,
        host: host.to_string(),
        hostname: hostname.to_string(),
        // Only the segment between the first and second ':' counts as port.
        port: port.split(':').next().unwrap_or("").to_string(),
        pathname: pathname.to_string(),
        path: format!("{}{}", pathname, search),
        search: search.to_string(),
        query: Query::from_query_string(raw_query),
        hash: hash.to_string(),
    }
}

/// Parse a URL, keeping the query in the form requested by `options`.
pub fn parse_url_with(input: &str, options: ParseOptions) -> ParsedUrl {
    let url = parse_url(input);
    let query = if options.query_string {
        UrlQuery::Raw(url.search.strip_prefix('?').unwrap_or("").to_string())
    } else {
        UrlQuery::Parsed(url.query.clone())
    };
    ParsedUrl { url, query }
}

/// Serialize URL parts back into a string.
///
/// `parts.path` is parsed first to recover a baseline pathname, query and
/// fragment; the explicit `pathname` and `hash` replace the baseline when
/// non-empty and `query` is merged over it.
pub fn stringify_url(parts: &UrlParts) -> String {
    let baseline = parse_url(parts.path.as_deref().unwrap_or(""));

    let pathname = non_empty(parts.pathname.as_deref()).unwrap_or(baseline.pathname.as_str());
    let hash = non_empty(parts.hash.as_deref()).unwrap_or(baseline.hash.as_str());
    let mut query = baseline.query.clone();
    if let Some(extra) = &parts.query {
        query.merge(extra);
    }

    let mut out = String::new();
    if let Some(protocol) = non_empty(parts.protocol.as_deref()) {
        out.push_str(protocol);
        out.push(':');
    }
    if parts.slashes {
        out.push_str("//");
    }
    if let Some(host) = &parts.host {
        out.push_str(host);
    }
    out.push_str(pathname);
    if !query.is_empty() {
        out.push('?');
        out.push_str(&query.to_query_string());
    }
    if !hash.is_empty() {
        out.push('#');
        out.push_str(hash);
    }
    out
}

fn split_scheme(input: &str) -> (&str, &str) {
    match input.find([':', '/', '?', '#']) {
        Some(idx) if idx > 0 && input.as_bytes()[idx] == b':' => (&input[..idx], &input[idx + 1..]),
        _ => ("", input),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ============================================================================
// Tests
// ============================================================================
