//! The navigation state machine.
//!
//! [`Router`] owns the route table, the navigation stack and the guard
//! registries. Every navigation goes through the same pipeline:
//!
//! 1. resolve the target (forward kinds only) and look it up in the table;
//! 2. tentatively mutate the stack;
//! 3. run the before-guard queue;
//! 4. roll back, redirect, stop silently, or commit through the
//!    [`NavigationEngine`];
//! 5. run the after-guard queue on commit.
//!
//! # Example
//!
//! ```
//! use page_navigator::{guard_fn, EngineOptions, NavigationEngine, ResolvedRoute, Router, RouterOptions};
//! use std::sync::Arc;
//!
//! struct NullEngine;
//!
//! impl NavigationEngine for NullEngine {
//!     fn navigate_to(&self, _: EngineOptions) {}
//!     fn redirect_to(&self, _: EngineOptions) {}
//!     fn re_launch(&self, _: EngineOptions) {}
//!     fn switch_tab(&self, _: EngineOptions) {}
//!     fn navigate_back(&self, _: EngineOptions) {}
//! }
//!
//! let mut router = Router::new(RouterOptions::new(Arc::new(NullEngine)).routes(["/a", "/b"]));
//! router.before_each(guard_fn(|to: &ResolvedRoute, _: Option<&ResolvedRoute>| to.path != "/b"));
//!
//! pollster::block_on(async {
//!     assert!(router.navigate_to("/a").await.is_success());
//!     assert!(router.navigate_to("/b").await.is_blocked());
//! });
//! assert_eq!(router.current_route().map(|r| r.path.as_str()), Some("/a"));
//! ```

#[cfg(feature = "cache")]
use crate::cache::{CacheStats, RouteCache};
use crate::engine::{EngineOptions, NavigationEngine};
use crate::error::{NavigationError, NavigationResult};
use crate::guards::{GuardOrigin, NavigationGuard, NextValue};
use crate::pipeline::{build_queue, run_queue};
use crate::request::{BackOptions, Location, NavigateRequest, OpenType};
use crate::route::{RouteRecord, RouteTable};
use crate::state::{NavigationStack, ResolvedRoute, RouteChangeEvent};
use crate::url::{parse_url, stringify_url, UrlParts};
use crate::{debug_log, error_log, info_log, trace_log, warn_log};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Default bound on chained guard redirects.
pub const MAX_REDIRECT_DEPTH: usize = 5;

type Listener = Arc<dyn Fn(&RouteChangeEvent) + Send + Sync>;

type NavigateFuture<'a> = Pin<Box<dyn Future<Output = NavigationResult> + Send + 'a>>;

/// Handle returned by [`Router::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// ============================================================================
// RouterOptions
// ============================================================================

/// Configuration for [`Router::new`].
pub struct RouterOptions {
    engine: Arc<dyn NavigationEngine>,
    routes: Vec<RouteRecord>,
    max_redirect_depth: usize,
    #[cfg(feature = "cache")]
    cache_capacity: usize,
}

impl RouterOptions {
    /// Start from the engine that performs the actual screen transitions.
    pub fn new(engine: Arc<dyn NavigationEngine>) -> Self {
        Self {
            engine,
            routes: Vec::new(),
            max_redirect_depth: MAX_REDIRECT_DEPTH,
            #[cfg(feature = "cache")]
            cache_capacity: RouteCache::DEFAULT_CAPACITY,
        }
    }

    /// Routes registered on construction, in order.
    #[must_use]
    pub fn routes<I, R>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<RouteRecord>,
    {
        self.routes.extend(routes.into_iter().map(Into::into));
        self
    }

    /// How many guard redirects may chain before the navigation is dropped.
    #[must_use]
    pub fn max_redirect_depth(mut self, depth: usize) -> Self {
        self.max_redirect_depth = depth;
        self
    }

    /// Capacity of the pathname lookup cache.
    #[cfg(feature = "cache")]
    #[must_use]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

impl fmt::Debug for RouterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterOptions")
            .field("engine", &self.engine.name())
            .field("routes", &self.routes)
            .field("max_redirect_depth", &self.max_redirect_depth)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Router
// ============================================================================

/// Page-stack router.
///
/// Navigation methods take `&mut self`, so one navigation runs at a time.
pub struct Router {
    routes: RouteTable,
    stack: NavigationStack,
    before_guards: Vec<Arc<dyn NavigationGuard>>,
    after_guards: Vec<Arc<dyn NavigationGuard>>,
    engine: Arc<dyn NavigationEngine>,
    #[cfg(feature = "cache")]
    cache: RouteCache,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_listener_id: u64,
    max_redirect_depth: usize,
    pub(crate) launched: bool,
    pub(crate) hot_launched: bool,
    /// Host unload echoes still owed for pages closed by `navigate_back`.
    pub(crate) pending_unloads: usize,
}

impl Router {
    /// Create a router and register the configured routes.
    pub fn new(options: RouterOptions) -> Self {
        let mut router = Self {
            routes: RouteTable::new(),
            stack: NavigationStack::new(),
            before_guards: Vec::new(),
            after_guards: Vec::new(),
            engine: options.engine,
            #[cfg(feature = "cache")]
            cache: RouteCache::with_capacity(options.cache_capacity),
            listeners: Vec::new(),
            next_listener_id: 0,
            max_redirect_depth: options.max_redirect_depth,
            launched: false,
            hot_launched: false,
            pending_unloads: 0,
        };
        for record in options.routes {
            // Duplicates are already logged.
            let _ = router.add_route(record);
        }
        router
    }

    // ========================================================================
    // Route table
    // ========================================================================

    /// Register a route. A duplicate path is logged and leaves the table
    /// unchanged.
    pub fn add_route(&mut self, record: impl Into<RouteRecord>) -> Result<(), NavigationError> {
        if let Err(err) = self.routes.insert(record.into()) {
            warn_log!("{}", err);
            return Err(err);
        }
        #[cfg(feature = "cache")]
        self.cache.clear();
        Ok(())
    }

    /// Unregister a route. An unknown path is logged and leaves the table
    /// unchanged.
    pub fn remove_route(&mut self, path: &str) -> Result<Arc<RouteRecord>, NavigationError> {
        let removed = match self.routes.remove(path) {
            Ok(removed) => removed,
            Err(err) => {
                warn_log!("{}", err);
                return Err(err);
            }
        };
        #[cfg(feature = "cache")]
        self.cache.clear();
        Ok(removed)
    }

    /// The route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    fn lookup(&mut self, pathname: &str) -> Option<Arc<RouteRecord>> {
        #[cfg(feature = "cache")]
        if let Some(record) = self.cache.get(pathname) {
            return Some(record);
        }

        let record = Arc::clone(self.routes.find_by_path(pathname)?);
        #[cfg(feature = "cache")]
        self.cache.insert(pathname.to_string(), Arc::clone(&record));
        Some(record)
    }

    /// Lookup cache statistics.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> &CacheStats {
        self.cache.stats()
    }

    // ========================================================================
    // Guards
    // ========================================================================

    /// Register a guard that runs before every navigation commits.
    ///
    /// Guards run in registration order, one at a time.
    pub fn before_each(&mut self, guard: impl NavigationGuard) {
        debug_log!("Registered before guard '{}'", guard.name());
        self.before_guards.push(Arc::new(guard));
    }

    /// Register a guard that runs after a navigation has been handed to the
    /// engine. Its outcome is only logged.
    pub fn after_each(&mut self, guard: impl NavigationGuard) {
        debug_log!("Registered after guard '{}'", guard.name());
        self.after_guards.push(Arc::new(guard));
    }

    // ========================================================================
    // State
    // ========================================================================

    /// The route currently shown.
    pub fn current_route(&self) -> Option<&ResolvedRoute> {
        self.stack.current()
    }

    /// The route shown before the last transition.
    pub fn previous_route(&self) -> Option<&ResolvedRoute> {
        self.stack.from()
    }

    /// The whole stack, bottom first.
    pub fn matched(&self) -> &[ResolvedRoute] {
        self.stack.entries()
    }

    pub(crate) fn stack_mut(&mut self) -> &mut NavigationStack {
        &mut self.stack
    }

    /// Call `listener` whenever the current route or the stack depth changes.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&RouteChangeEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify_if_changed(
        &self,
        previous: Option<&ResolvedRoute>,
        previous_depth: usize,
        open_type: OpenType,
    ) {
        let current = self.stack.current();
        if current == previous && self.stack.len() == previous_depth {
            return;
        }
        let event = RouteChangeEvent {
            from: self.stack.from().cloned(),
            to: current.cloned(),
            open_type,
            depth: self.stack.len(),
        };
        for (_, listener) in &self.listeners {
            listener(&event);
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Push a page.
    pub async fn navigate_to(&mut self, location: impl Into<Location>) -> NavigationResult {
        self.navigate(NavigateRequest::NavigateTo(location.into()))
            .await
    }

    /// Replace the current page.
    pub async fn redirect_to(&mut self, location: impl Into<Location>) -> NavigationResult {
        self.navigate(NavigateRequest::RedirectTo(location.into()))
            .await
    }

    /// Replace the whole stack with one page.
    pub async fn re_launch(&mut self, location: impl Into<Location>) -> NavigationResult {
        self.navigate(NavigateRequest::ReLaunch(location.into()))
            .await
    }

    /// Switch to a tab-bar page.
    pub async fn switch_tab(&mut self, location: impl Into<Location>) -> NavigationResult {
        self.navigate(NavigateRequest::SwitchTab(location.into()))
            .await
    }

    /// Pop `options.delta` pages.
    ///
    /// Once the engine has been asked to go back, the host's
    /// [`page_unload`](Self::page_unload) for each closed page is treated as
    /// an echo of this call and does not pop again.
    pub async fn navigate_back(&mut self, options: BackOptions) -> NavigationResult {
        self.navigate(NavigateRequest::NavigateBack(options)).await
    }

    /// Run a navigation request through the pipeline.
    ///
    /// Never returns `Err`: every outcome, failures included, is reported in
    /// the returned [`NavigationResult`] and logged.
    pub async fn navigate(&mut self, request: NavigateRequest) -> NavigationResult {
        self.navigate_inner(request, 0).await
    }

    fn navigate_inner(&mut self, request: NavigateRequest, depth: usize) -> NavigateFuture<'_> {
        Box::pin(async move {
            let open_type = request.open_type();

            if depth > self.max_redirect_depth {
                let err = NavigationError::RedirectLoop {
                    depth,
                    path: request.target(),
                };
                error_log!("{}", err);
                return NavigationResult::Error(err);
            }

            info_log!(
                "Navigation {}: '{}' → '{}'",
                open_type,
                self.stack.current().map_or("", |r| r.full_path.as_str()),
                request.target()
            );

            let snapshot = self.stack.snapshot();
            let previous = self.stack.current().cloned();
            let previous_depth = self.stack.len();
            let mut popped = 0;

            // Tentative mutation.
            match &request {
                NavigateRequest::NavigateBack(back) => {
                    popped = self.stack.pop(back.delta).len();
                }
                _ => {
                    let Some(route) = self.resolve(&request) else {
                        let path = request.target();
                        warn_log!("{}", NavigationError::RouteNotFound { path: path.clone() });
                        return NavigationResult::NotFound { path };
                    };
                    if open_type == OpenType::ReLaunch {
                        self.stack.relaunch(route);
                    } else {
                        self.stack.push(route);
                    }
                }
            }

            let to = self.stack.current().cloned();
            let from = self.stack.from().cloned();

            let outcome = match &to {
                Some(to) => {
                    let units = build_queue(&self.before_guards, to, from.as_ref());
                    debug_log!("Running {} before guards for '{}'", units.len(), to.full_path);
                    run_queue(units).await
                }
                None => {
                    trace_log!("Stack is empty after {}, skipping guards", open_type);
                    Ok(NextValue::Continue)
                }
            };

            match outcome {
                Err(err) if err.is_aborted() => {
                    warn_log!("Navigation to '{}' blocked: {}", request.target(), err);
                    self.stack.restore(snapshot);
                    NavigationResult::Blocked {
                        reason: err.to_string(),
                    }
                }
                Err(err) => {
                    warn_log!("Navigation to '{}' failed: {}", request.target(), err);
                    self.notify_if_changed(previous.as_ref(), previous_depth, open_type);
                    NavigationResult::Error(err)
                }
                Ok(NextValue::Redirect(redirect)) => {
                    debug_log!(
                        "Guard redirecting '{}' → {} '{}'",
                        request.target(),
                        redirect.open_type(),
                        redirect.target()
                    );
                    self.stack.restore(snapshot);
                    self.navigate_inner((*redirect).from_guard(), depth + 1).await
                }
                Ok(NextValue::Path(path)) => {
                    debug_log!("Guard redirecting '{}' → '{}'", request.target(), path);
                    self.stack.restore(snapshot);
                    let redirect = NavigateRequest::NavigateTo(Location::new(path)).from_guard();
                    self.navigate_inner(redirect, depth + 1).await
                }
                Ok(NextValue::Callback(callback)) => {
                    debug_log!("Guard took over navigation to '{}'", request.target());
                    self.stack.restore(snapshot);
                    callback(GuardOrigin { before_each: true });
                    NavigationResult::Handled
                }
                Ok(_) if !request.options().is_navigate() => {
                    debug_log!("Silent {} to '{}' recorded", open_type, request.target());
                    self.notify_if_changed(previous.as_ref(), previous_depth, open_type);
                    NavigationResult::Silent {
                        path: to.map(|r| r.full_path).unwrap_or_default(),
                    }
                }
                Ok(_) => {
                    self.commit(&request, to.as_ref());
                    if open_type == OpenType::NavigateBack {
                        self.pending_unloads += popped;
                    }
                    self.notify_if_changed(previous.as_ref(), previous_depth, open_type);
                    if let Some(to) = &to {
                        self.run_after_guards(to, from.as_ref()).await;
                    }
                    NavigationResult::Success {
                        path: to.map(|r| r.full_path).unwrap_or_default(),
                    }
                }
            }
        })
    }

    /// Normalize a forward request and build its route.
    fn resolve(&mut self, request: &NavigateRequest) -> Option<ResolvedRoute> {
        let location = request.location()?;
        let normalized = stringify_url(&UrlParts {
            path: Some(location.path.clone()),
            query: Some(location.query.clone()),
            ..UrlParts::default()
        });
        let url = parse_url(&normalized);
        let record = self.lookup(&url.pathname)?;

        Some(ResolvedRoute {
            full_path: url.path,
            path: url.pathname,
            hash: url.hash,
            query: url.query,
            meta: record.meta.clone(),
            open_type: request.open_type(),
            before_each: location.options.before_each(),
        })
    }

    /// Hand the transition to the engine.
    fn commit(&self, request: &NavigateRequest, to: Option<&ResolvedRoute>) {
        let options = request.options();
        let engine = options
            .engine
            .clone()
            .unwrap_or_else(|| Arc::clone(&self.engine));

        let mut engine_options = EngineOptions {
            extras: options.extras.clone(),
            ..EngineOptions::default()
        };
        match request {
            NavigateRequest::NavigateBack(back) => engine_options.delta = Some(back.delta.max(1)),
            _ => engine_options.url = to.map(|r| r.full_path.clone()),
        }

        info_log!(
            "Navigation complete: {} '{}' via {} (stack depth: {})",
            request.open_type(),
            request.target(),
            engine.name(),
            self.stack.len()
        );
        engine.dispatch(request.open_type(), engine_options);
    }

    async fn run_after_guards(&self, to: &ResolvedRoute, from: Option<&ResolvedRoute>) {
        if self.after_guards.is_empty() {
            return;
        }
        let units = build_queue(&self.after_guards, to, from);
        debug_log!("Running {} after guards for '{}'", units.len(), to.full_path);
        if let Err(err) = run_queue(units).await {
            warn_log!("After guard for '{}' failed: {}", to.full_path, err);
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes.len())
            .field("stack", &self.stack)
            .field("before_guards", &self.before_guards.len())
            .field("after_guards", &self.after_guards.len())
            .field("engine", &self.engine.name())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guards::{guard_fn, next_guard_fn, Next};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(OpenType, EngineOptions)>>,
    }

    impl Recorder {
        fn record(&self, open_type: OpenType, options: EngineOptions) {
            self.calls.lock().unwrap().push((open_type, options));
        }

        fn kinds(&self) -> Vec<OpenType> {
            self.calls.lock().unwrap().iter().map(|(k, _)| *k).collect()
        }
    }

    impl NavigationEngine for Recorder {
        fn navigate_to(&self, options: EngineOptions) {
            self.record(OpenType::NavigateTo, options);
        }
        fn redirect_to(&self, options: EngineOptions) {
            self.record(OpenType::RedirectTo, options);
        }
        fn re_launch(&self, options: EngineOptions) {
            self.record(OpenType::ReLaunch, options);
        }
        fn switch_tab(&self, options: EngineOptions) {
            self.record(OpenType::SwitchTab, options);
        }
        fn navigate_back(&self, options: EngineOptions) {
            self.record(OpenType::NavigateBack, options);
        }
    }

    fn router(routes: &[&str]) -> (Router, Arc<Recorder>) {
        let engine = Arc::new(Recorder::default());
        let router = Router::new(
            RouterOptions::new(Arc::clone(&engine) as Arc<dyn NavigationEngine>)
                .routes(routes.iter().copied()),
        );
        (router, engine)
    }

    #[test]
    fn test_duplicate_routes_from_options_are_skipped() {
        let (router, _) = router(&["/a", "/a", "/b"]);
        assert_eq!(router.routes().len(), 2);
    }

    #[test]
    fn test_remove_unknown_route() {
        let (mut router, _) = router(&["/a"]);
        assert!(matches!(
            router.remove_route("/nope"),
            Err(NavigationError::RouteNotRegistered { .. })
        ));
        assert!(router.remove_route("/a").is_ok());
        assert!(router.routes().is_empty());
    }

    #[test]
    fn test_forward_url_includes_query() {
        let (mut router, engine) = router(&["/detail"]);
        let result = pollster::block_on(
            router.navigate_to(Location::new("/detail?id=7").query("tab", "info")),
        );

        assert_eq!(
            result,
            NavigationResult::Success {
                path: "/detail?id=7&tab=info".to_string()
            }
        );
        let current = router.current_route().unwrap();
        assert_eq!(current.path, "/detail");
        assert_eq!(current.query.get("tab"), Some("info"));

        let calls = engine.calls.lock().unwrap();
        assert_eq!(calls[0].1.url.as_deref(), Some("/detail?id=7&tab=info"));
    }

    #[test]
    fn test_back_on_empty_stack_commits_without_guards() {
        let (mut router, engine) = router(&["/a"]);
        router.before_each(guard_fn(|_: &ResolvedRoute, _: Option<&ResolvedRoute>| false));

        let result = pollster::block_on(router.navigate_back(BackOptions::default()));
        assert!(result.is_success());
        assert_eq!(engine.kinds(), vec![OpenType::NavigateBack]);
    }

    #[test]
    fn test_redirect_loop_is_bounded() {
        let engine = Arc::new(Recorder::default());
        let mut router = Router::new(
            RouterOptions::new(Arc::clone(&engine) as Arc<dyn NavigationEngine>)
                .routes(["/a", "/b"])
                .max_redirect_depth(3),
        );
        router.before_each(guard_fn(|to: &ResolvedRoute, _: Option<&ResolvedRoute>| {
            if to.path == "/a" {
                "/b"
            } else {
                "/a"
            }
        }));

        let result = pollster::block_on(router.navigate_to("/a"));
        assert!(matches!(
            result,
            NavigationResult::Error(NavigationError::RedirectLoop { depth: 4, .. })
        ));
        assert!(router.matched().is_empty());
        assert!(engine.kinds().is_empty());
    }

    #[test]
    fn test_guard_failure_keeps_tentative_state() {
        let (mut router, engine) = router(&["/a"]);
        router.before_each(
            next_guard_fn(|_, _, _next: Next| async { Ok::<_, NavigationError>(None) })
                .named("forgetful"),
        );

        let result = pollster::block_on(router.navigate_to("/a"));
        assert!(matches!(
            result,
            NavigationResult::Error(NavigationError::NextNotCalled { .. })
        ));
        assert_eq!(router.matched().len(), 1);
        assert!(engine.kinds().is_empty());
    }

    #[test]
    fn test_subscribers_see_committed_changes_only() {
        let (mut router, _) = router(&["/a", "/b"]);
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let id = router.subscribe(move |event| {
            sink.lock()
                .unwrap()
                .push(event.to.as_ref().map(|r| r.path.clone()));
        });
        router.before_each(guard_fn(|to: &ResolvedRoute, _: Option<&ResolvedRoute>| {
            to.path != "/b"
        }));

        pollster::block_on(async {
            router.navigate_to("/a").await;
            router.navigate_to("/b").await;
        });
        assert_eq!(*events.lock().unwrap(), vec![Some("/a".to_string())]);

        assert!(router.unsubscribe(id));
        assert!(!router.unsubscribe(id));
    }

    #[cfg(feature = "cache")]
    #[test]
    fn test_lookup_uses_cache() {
        let (mut router, _) = router(&["/a"]);
        pollster::block_on(async {
            router.navigate_to("/a").await;
            router.navigate_to("/a").await;
        });
        assert_eq!(router.cache_stats().misses, 1);
        assert_eq!(router.cache_stats().hits, 1);
    }
}
