//! Route records and the route table.
//!
//! Routes are identified by their exact path string. There are no parameter
//! segments and no trailing-slash normalization: `/a` and `/a/` are two
//! different routes.

use crate::params::RouteMeta;
use crate::{info_log, NavigationError};
use std::sync::Arc;

/// A registered route.
///
/// # Example
///
/// ```
/// use page_navigator::RouteRecord;
///
/// let route = RouteRecord::new("/pages/profile").meta("title", "Profile");
/// assert_eq!(route.path, "/pages/profile");
/// assert_eq!(route.meta.get("title"), Some("Profile"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    /// Exact path used for lookup.
    pub path: String,
    /// Metadata copied onto every route resolved against this record.
    pub meta: RouteMeta,
}

impl RouteRecord {
    /// Create a record with empty metadata.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            meta: RouteMeta::new(),
        }
    }

    /// Add a metadata entry.
    #[must_use]
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key, value);
        self
    }

    /// Replace all metadata.
    #[must_use]
    pub fn with_meta(mut self, meta: RouteMeta) -> Self {
        self.meta = meta;
        self
    }
}

impl From<&str> for RouteRecord {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for RouteRecord {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

/// Ordered set of route records, unique by path.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    records: Vec<Arc<RouteRecord>>,
}

impl RouteTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record unless its path is already registered.
    pub fn insert(&mut self, record: RouteRecord) -> Result<(), NavigationError> {
        if self.contains(&record.path) {
            return Err(NavigationError::DuplicateRoute { path: record.path });
        }
        info_log!("Registered route '{}'", record.path);
        self.records.push(Arc::new(record));
        Ok(())
    }

    /// Remove the record registered under `path`.
    pub fn remove(&mut self, path: &str) -> Result<Arc<RouteRecord>, NavigationError> {
        let index = self
            .records
            .iter()
            .position(|r| r.path == path)
            .ok_or_else(|| NavigationError::RouteNotRegistered {
                path: path.to_string(),
            })?;
        info_log!("Removed route '{}'", path);
        Ok(self.records.remove(index))
    }

    /// Find a record by exact path.
    pub fn find_by_path(&self, path: &str) -> Option<&Arc<RouteRecord>> {
        self.records.iter().find(|r| r.path == path)
    }

    /// Return `true` if `path` is registered.
    pub fn contains(&self, path: &str) -> bool {
        self.find_by_path(path).is_some()
    }

    /// Iterate over records in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteRecord> {
        self.records.iter().map(AsRef::as_ref)
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Return `true` if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
