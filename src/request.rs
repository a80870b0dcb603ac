//! Navigation requests.
//!
//! A [`NavigateRequest`] is a tagged union keyed by [`OpenType`]: forward
//! kinds carry a [`Location`], the backward kind carries [`BackOptions`].
//! Both share [`NavigateOptions`] for the engine override, pass-through
//! extras, and the internal silent/guard-originated flags.
//!
//! # Example
//!
//! ```
//! use page_navigator::{Location, NavigateRequest, OpenType};
//!
//! let request = NavigateRequest::NavigateTo(Location::new("/detail").query("id", "7"));
//! assert_eq!(request.open_type(), OpenType::NavigateTo);
//! assert_eq!(request.target(), "/detail");
//! ```

use crate::engine::NavigationEngine;
use crate::params::Query;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Caller options passed through to the engine untouched.
pub type Extras = BTreeMap<String, String>;

/// The kind of transition a navigation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenType {
    /// Push a page.
    NavigateTo,
    /// Replace the current page.
    RedirectTo,
    /// Replace the whole stack.
    ReLaunch,
    /// Switch to a tab-bar page.
    SwitchTab,
    /// Pop pages.
    NavigateBack,
}

impl OpenType {
    /// Name of the engine method this kind maps to.
    pub const fn as_str(self) -> &'static str {
        match self {
            OpenType::NavigateTo => "navigateTo",
            OpenType::RedirectTo => "redirectTo",
            OpenType::ReLaunch => "reLaunch",
            OpenType::SwitchTab => "switchTab",
            OpenType::NavigateBack => "navigateBack",
        }
    }
}

impl fmt::Display for OpenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options shared by every navigation kind.
#[derive(Clone)]
pub struct NavigateOptions {
    /// Engine to use instead of the router's default for this call.
    pub engine: Option<Arc<dyn NavigationEngine>>,
    /// Passed through to the engine.
    pub extras: Extras,
    pub(crate) is_navigate: bool,
    pub(crate) before_each: bool,
}

impl NavigateOptions {
    /// Whether the engine will be called once guards approve.
    pub fn is_navigate(&self) -> bool {
        self.is_navigate
    }

    /// Whether this request was produced by a guard redirect.
    pub fn before_each(&self) -> bool {
        self.before_each
    }
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self {
            engine: None,
            extras: Extras::new(),
            is_navigate: true,
            before_each: false,
        }
    }
}

impl fmt::Debug for NavigateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigateOptions")
            .field("engine", &self.engine.as_ref().map(|e| e.name()))
            .field("extras", &self.extras)
            .field("is_navigate", &self.is_navigate)
            .field("before_each", &self.before_each)
            .finish()
    }
}

/// Target of a forward navigation.
#[derive(Debug, Clone, Default)]
pub struct Location {
    /// Path, optionally with its own `?query` and `#hash`.
    pub path: String,
    /// Merged over any query embedded in `path`.
    pub query: Query,
    pub options: NavigateOptions,
}

impl Location {
    /// Create a location for `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Add a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key, value);
        self
    }

    /// Replace the query.
    #[must_use]
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Add an engine pass-through option.
    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.extras.insert(key.into(), value.into());
        self
    }

    /// Use `engine` for this navigation only.
    #[must_use]
    pub fn engine(mut self, engine: Arc<dyn NavigationEngine>) -> Self {
        self.options.engine = Some(engine);
        self
    }

    pub(crate) fn silent(mut self) -> Self {
        self.options.is_navigate = false;
        self
    }
}

impl From<&str> for Location {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for Location {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

/// Options for a backward navigation.
#[derive(Debug, Clone)]
pub struct BackOptions {
    /// Number of entries to pop.
    pub delta: usize,
    pub options: NavigateOptions,
}

impl BackOptions {
    /// Go back `delta` pages.
    pub fn new(delta: usize) -> Self {
        Self {
            delta,
            options: NavigateOptions::default(),
        }
    }

    /// Add an engine pass-through option.
    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.extras.insert(key.into(), value.into());
        self
    }

    /// Use `engine` for this navigation only.
    #[must_use]
    pub fn engine(mut self, engine: Arc<dyn NavigationEngine>) -> Self {
        self.options.engine = Some(engine);
        self
    }

    pub(crate) fn silent(mut self) -> Self {
        self.options.is_navigate = false;
        self
    }
}

impl Default for BackOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

/// A navigation request, tagged by kind.
#[derive(Debug, Clone)]
pub enum NavigateRequest {
    NavigateTo(Location),
    RedirectTo(Location),
    ReLaunch(Location),
    SwitchTab(Location),
    NavigateBack(BackOptions),
}

impl NavigateRequest {
    /// The kind of transition.
    pub fn open_type(&self) -> OpenType {
        match self {
            NavigateRequest::NavigateTo(_) => OpenType::NavigateTo,
            NavigateRequest::RedirectTo(_) => OpenType::RedirectTo,
            NavigateRequest::ReLaunch(_) => OpenType::ReLaunch,
            NavigateRequest::SwitchTab(_) => OpenType::SwitchTab,
            NavigateRequest::NavigateBack(_) => OpenType::NavigateBack,
        }
    }

    /// Shared options.
    pub fn options(&self) -> &NavigateOptions {
        match self {
            NavigateRequest::NavigateTo(loc)
            | NavigateRequest::RedirectTo(loc)
            | NavigateRequest::ReLaunch(loc)
            | NavigateRequest::SwitchTab(loc) => &loc.options,
            NavigateRequest::NavigateBack(back) => &back.options,
        }
    }

    fn options_mut(&mut self) -> &mut NavigateOptions {
        match self {
            NavigateRequest::NavigateTo(loc)
            | NavigateRequest::RedirectTo(loc)
            | NavigateRequest::ReLaunch(loc)
            | NavigateRequest::SwitchTab(loc) => &mut loc.options,
            NavigateRequest::NavigateBack(back) => &mut back.options,
        }
    }

    /// Forward location, if any.
    pub fn location(&self) -> Option<&Location> {
        match self {
            NavigateRequest::NavigateTo(loc)
            | NavigateRequest::RedirectTo(loc)
            | NavigateRequest::ReLaunch(loc)
            | NavigateRequest::SwitchTab(loc) => Some(loc),
            NavigateRequest::NavigateBack(_) => None,
        }
    }

    /// Human-readable target for logs.
    pub fn target(&self) -> String {
        match self {
            NavigateRequest::NavigateBack(back) => format!("back({})", back.delta),
            other => other.location().map(|l| l.path.clone()).unwrap_or_default(),
        }
    }

    /// Tag as produced by a guard redirect.
    pub(crate) fn from_guard(mut self) -> Self {
        self.options_mut().before_each = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_builder() {
        let loc = Location::new("/a").query("x", "1").extra("animation", "fade");
        assert_eq!(loc.path, "/a");
        assert_eq!(loc.query.get("x"), Some("1"));
        assert_eq!(loc.options.extras.get("animation").map(String::as_str), Some("fade"));
        assert!(loc.options.is_navigate());
        assert!(!loc.options.before_each());
    }

    #[test]
    fn test_back_options_default_delta() {
        assert_eq!(BackOptions::default().delta, 1);
        let request = NavigateRequest::NavigateBack(BackOptions::new(3));
        assert_eq!(request.open_type(), OpenType::NavigateBack);
        assert_eq!(request.target(), "back(3)");
        assert!(request.location().is_none());
    }

    #[test]
    fn test_from_guard_sets_flag() {
        let request = NavigateRequest::RedirectTo(Location::new("/login")).from_guard();
        assert!(request.options().before_each());
        assert_eq!(request.open_type().as_str(), "redirectTo");
    }

    #[test]
    fn test_silent() {
        let loc = Location::new("/a").silent();
        assert!(!loc.options.is_navigate());
        assert!(!BackOptions::default().silent().options.is_navigate());
    }
}
