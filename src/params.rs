//! Query strings and route metadata.
//!
//! This module provides two small map types used throughout the router:
//!
//! - [`Query`] holds the query parameters parsed from the `?key=value&...` portion
//!   of a URL. Keys keep the order of their first occurrence; a repeated key
//!   overwrites the earlier value. Values are kept verbatim (no
//!   percent-decoding).
//! - [`RouteMeta`] holds free-form metadata attached to a
//!   [`RouteRecord`](crate::RouteRecord), with typed access via
//!   [`get_as`](RouteMeta::get_as).
//!
//! # Example
//!
//! ```
//! use page_navigator::{Query, RouteMeta};
//!
//! let query = Query::from_query_string("page=1&sort=name&page=2");
//! assert_eq!(query.get("page"), Some("2"));
//! assert_eq!(query.to_query_string(), "page=2&sort=name");
//!
//! let meta = RouteMeta::new().with("title", "Home").with("auth", "true");
//! assert_eq!(meta.get_as::<bool>("auth"), Some(true));
//! ```

use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Query
// ============================================================================

/// Ordered query parameters.
///
/// Backed by a `Vec` so that serialization is deterministic and follows the
/// order in which keys were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Create empty query parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (without the leading `?`).
    ///
    /// Pairs are split on `&`, then on the first `=`. A pair without `=` gets
    /// an empty value, pairs with an empty key are dropped, and a repeated key
    /// overwrites the earlier value in place.
    ///
    /// ```
    /// use page_navigator::Query;
    ///
    /// let query = Query::from_query_string("a=1&=skipped&flag&b=x=y");
    /// assert_eq!(query.get("a"), Some("1"));
    /// assert_eq!(query.get("flag"), Some(""));
    /// assert_eq!(query.get("b"), Some("x=y"));
    /// assert_eq!(query.len(), 3);
    /// ```
    pub fn from_query_string(query: &str) -> Self {
        let mut parsed = Self::new();

        for pair in query.split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key.is_empty() {
                continue;
            }
            parsed.insert(key, value);
        }

        parsed
    }

    /// Get the value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get a value parsed as type `T`.
    ///
    /// Returns `None` if the key is missing or the value cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get(key)?.parse().ok()
    }

    /// Insert or overwrite a value. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Merge `other` over `self`: its values win, new keys are appended.
    pub fn merge(&mut self, other: &Query) {
        for (key, value) in other.iter() {
            self.insert(key, value);
        }
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Iterate over `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Serialize as `key=value` pairs joined by `&`, without encoding.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

impl<K, V> FromIterator<(K, V)> for Query
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = Self::new();
        for (key, value) in iter {
            query.insert(key, value);
        }
        query
    }
}

// ============================================================================
// RouteMeta
// ============================================================================

/// Metadata attached to a route record.
///
/// Values are stored as strings; use [`get_as`](Self::get_as) for typed
/// access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMeta {
    values: HashMap<String, String>,
}

impl RouteMeta {
    /// Create empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Insert or overwrite a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Get a value and parse it as a specific type.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.values.get(key)?.parse().ok()
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Return `true` if there is no metadata.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
