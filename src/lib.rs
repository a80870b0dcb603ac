//! Page-stack navigation for hosts that own the actual screen transitions.
//!
//! A [`Router`] keeps a route table and a stack of [`ResolvedRoute`]s,
//! runs registered guards one at a time before each navigation commits,
//! and hands approved transitions to a [`NavigationEngine`] supplied by the
//! host. Nothing here renders.
//!
//! # Modules
//!
//! - [`url`]: URL parsing and stringification.
//! - [`route`]: route records and the exact-path route table.
//! - [`guards`] and [`pipeline`]: guard definitions and their sequential
//!   execution.
//! - [`router`]: the navigation state machine.
//! - [`lifecycle`]: hooks the host calls on launch, tab show and page unload.
//!
//! # Example
//!
//! ```
//! use page_navigator::{
//!     guard_fn, BackOptions, EngineOptions, NavigationEngine, NextValue, ResolvedRoute,
//!     RouteRecord, Router, RouterOptions,
//! };
//! use std::sync::Arc;
//!
//! struct LogEngine;
//!
//! impl NavigationEngine for LogEngine {
//!     fn navigate_to(&self, options: EngineOptions) {
//!         println!("open {:?}", options.url);
//!     }
//!     fn redirect_to(&self, options: EngineOptions) {
//!         println!("replace {:?}", options.url);
//!     }
//!     fn re_launch(&self, options: EngineOptions) {
//!         println!("relaunch {:?}", options.url);
//!     }
//!     fn switch_tab(&self, options: EngineOptions) {
//!         println!("tab {:?}", options.url);
//!     }
//!     fn navigate_back(&self, options: EngineOptions) {
//!         println!("back {:?}", options.delta);
//!     }
//! }
//!
//! let mut router = Router::new(RouterOptions::new(Arc::new(LogEngine)).routes([
//!     RouteRecord::new("/home"),
//!     RouteRecord::new("/detail").meta("auth", "required"),
//!     RouteRecord::new("/login"),
//! ]));
//! router.before_each(guard_fn(|to: &ResolvedRoute, _: Option<&ResolvedRoute>| {
//!     if to.meta.contains("auth") {
//!         NextValue::from("/login")
//!     } else {
//!         NextValue::Continue
//!     }
//! }));
//!
//! pollster::block_on(async {
//!     router.navigate_to("/home").await;
//!     // Redirected to /login by the guard.
//!     router.navigate_to("/detail?id=7").await;
//!     assert_eq!(router.current_route().map(|r| r.path.as_str()), Some("/login"));
//!     router.navigate_back(BackOptions::default()).await;
//! });
//! assert_eq!(router.current_route().map(|r| r.path.as_str()), Some("/home"));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
pub mod logging;

#[cfg(feature = "cache")]
pub mod cache;
pub mod engine;
pub mod error;
pub mod guards;
pub mod lifecycle;
pub mod params;
pub mod pipeline;
pub mod request;
pub mod route;
pub mod router;
pub mod state;
pub mod url;

#[cfg(feature = "cache")]
pub use cache::{CacheStats, RouteCache};
pub use engine::{EngineOptions, NavigationEngine};
pub use error::{NavigationError, NavigationResult};
pub use guards::{
    async_guard_fn, guard_fn, next_guard_fn, GuardFuture, GuardOrigin, NavigationGuard, Next,
    NextCallback, NextValue,
};
pub use lifecycle::{HostLifecycle, LaunchOptions, LifecycleFuture, TabPage};
pub use params::{Query, RouteMeta};
pub use pipeline::{guard_to_unit, run_queue};
pub use request::{BackOptions, Extras, Location, NavigateOptions, NavigateRequest, OpenType};
pub use route::{RouteRecord, RouteTable};
pub use router::{Router, RouterOptions, SubscriptionId, MAX_REDIRECT_DEPTH};
pub use state::{NavigationStack, ResolvedRoute, RouteChangeEvent};
pub use url::{parse_url, parse_url_with, stringify_url, ParseOptions, Url, UrlParts};
