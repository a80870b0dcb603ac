//! Navigation stack state

use crate::params::{Query, RouteMeta};
use crate::request::OpenType;

/// A route resolved for a navigation and placed on the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Pathname plus query (`/detail?id=7`).
    pub full_path: String,
    /// Pathname only; the route-table key.
    pub path: String,
    /// Fragment without `#`.
    pub hash: String,
    pub query: Query,
    /// Copied from the matching [`RouteRecord`](crate::RouteRecord).
    pub meta: RouteMeta,
    /// How this entry got onto the stack.
    pub open_type: OpenType,
    /// Set when a guard redirect produced this entry. Cleared by the tab
    /// activation shortcut.
    pub before_each: bool,
}

/// Emitted to subscribers whenever the current route changes.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteChangeEvent {
    /// Route before the change.
    pub from: Option<ResolvedRoute>,
    /// Route after the change.
    pub to: Option<ResolvedRoute>,
    /// Kind of navigation that caused it.
    pub open_type: OpenType,
    /// Stack length after the change.
    pub depth: usize,
}

/// Copy of the stack taken before a tentative mutation.
#[derive(Debug, Clone)]
pub(crate) struct StackSnapshot {
    entries: Vec<ResolvedRoute>,
    current: Option<ResolvedRoute>,
    from: Option<ResolvedRoute>,
}

/// The navigable history: an ordered list of resolved routes plus the
/// current/previous pointers.
///
/// `current` is the top entry after forward navigations. During a backward
/// navigation it is the entry that becomes the top once `delta` entries have
/// been popped, which is `None` when the stack runs empty.
#[derive(Debug, Clone, Default)]
pub struct NavigationStack {
    entries: Vec<ResolvedRoute>,
    current: Option<ResolvedRoute>,
    from: Option<ResolvedRoute>,
}

impl NavigationStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// The route currently shown.
    pub fn current(&self) -> Option<&ResolvedRoute> {
        self.current.as_ref()
    }

    /// The route shown before the last transition.
    pub fn from(&self) -> Option<&ResolvedRoute> {
        self.from.as_ref()
    }

    /// All entries, bottom first.
    pub fn entries(&self) -> &[ResolvedRoute] {
        &self.entries
    }

    /// Top entry.
    pub fn top(&self) -> Option<&ResolvedRoute> {
        self.entries.last()
    }

    /// Mutable top entry (for clearing `before_each`).
    pub(crate) fn top_mut(&mut self) -> Option<&mut ResolvedRoute> {
        self.entries.last_mut()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` if the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Push a route; the previous top becomes `from`.
    pub fn push(&mut self, route: ResolvedRoute) {
        self.from = self.entries.last().cloned();
        self.entries.push(route.clone());
        self.current = Some(route);
    }

    /// Replace the whole stack with `route`; `from` is cleared.
    pub fn relaunch(&mut self, route: ResolvedRoute) {
        self.from = None;
        self.entries = vec![route.clone()];
        self.current = Some(route);
    }

    /// Pop `delta` entries (at least one, at most all).
    ///
    /// The previous current route becomes `from`; the new top becomes
    /// current. Returns the popped entries, top last.
    pub fn pop(&mut self, delta: usize) -> Vec<ResolvedRoute> {
        let count = delta.max(1).min(self.entries.len());
        let popped = self.entries.split_off(self.entries.len() - count);
        self.from = self.current.take();
        self.current = self.entries.last().cloned();
        popped
    }

    pub(crate) fn snapshot(&self) -> StackSnapshot {
        StackSnapshot {
            entries: self.entries.clone(),
            current: self.current.clone(),
            from: self.from.clone(),
        }
    }

    pub(crate) fn restore(&mut self, snapshot: StackSnapshot) {
        self.entries = snapshot.entries;
        self.current = snapshot.current;
        self.from = snapshot.from;
    }
}
