//! Host application lifecycle hooks.
//!
//! The host calls these at key points of the application's life so the
//! router's stack stays in sync with pages the host opened or closed on its
//! own:
//!
//! - [`on_launch`](HostLifecycle::on_launch): cold start, records the entry
//!   page (once);
//! - [`on_hot_launch`](HostLifecycle::on_hot_launch): the app came back to the
//!   foreground (once per [`on_unload`](HostLifecycle::on_unload));
//! - [`on_tab_show`](HostLifecycle::on_tab_show): a tab-bar page was shown;
//! - [`on_page_unload`](HostLifecycle::on_page_unload): the host closed a page.
//!
//! All navigations issued here are silent: the stack is updated and guards
//! run, but the engine is never called, since the host already performed the
//! transition.

use crate::error::NavigationResult;
use crate::params::Query;
use crate::request::{BackOptions, Location, NavigateRequest};
use crate::router::Router;
use crate::{debug_log, trace_log};
use std::future::Future;
use std::pin::Pin;

/// Future returned by lifecycle hooks. Resolves to `None` when the hook had
/// nothing to do.
pub type LifecycleFuture<'a> =
    Pin<Box<dyn Future<Output = Option<NavigationResult>> + Send + 'a>>;

/// Entry page reported by the host on launch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Page path, with or without a leading `/`.
    pub path: String,
    pub query: Query,
}

impl LaunchOptions {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Query::new(),
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }
}

/// Tab-bar page reported by the host when it is shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabPage {
    /// Page path, with or without a leading `/`.
    pub route: String,
    /// Query the page was opened with.
    pub options: Query,
}

impl TabPage {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            options: Query::new(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: Query) -> Self {
        self.options = options;
        self
    }
}

/// Hooks the host application calls into.
pub trait HostLifecycle {
    /// Cold start. Only the first call has an effect; it also counts as the
    /// first hot launch.
    fn on_launch(&mut self, options: LaunchOptions) -> LifecycleFuture<'_>;

    /// Back to the foreground. Only the first call after launch or after
    /// [`on_unload`](Self::on_unload) has an effect.
    fn on_hot_launch(&mut self, options: LaunchOptions) -> LifecycleFuture<'_>;

    /// The app went to the background.
    fn on_unload(&mut self);

    /// A tab-bar page was shown.
    fn on_tab_show(&mut self, page: TabPage) -> LifecycleFuture<'_>;

    /// The host closed the top page.
    fn on_page_unload(&mut self) -> LifecycleFuture<'_>;
}

fn page_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

impl Router {
    /// Record the entry page of a cold start as a silent relaunch.
    pub async fn launch(&mut self, options: LaunchOptions) -> Option<NavigationResult> {
        if self.launched {
            trace_log!("Launch already handled");
            return None;
        }
        self.launched = true;
        self.hot_launched = true;
        Some(self.relaunch_silently(options).await)
    }

    /// Record the page shown when the app returns to the foreground.
    pub async fn hot_launch(&mut self, options: LaunchOptions) -> Option<NavigationResult> {
        if self.hot_launched {
            trace_log!("Hot launch already handled");
            return None;
        }
        self.hot_launched = true;
        Some(self.relaunch_silently(options).await)
    }

    /// Allow the next [`hot_launch`](Self::hot_launch) to run.
    pub fn unload(&mut self) {
        self.hot_launched = false;
    }

    /// Reconcile the stack with a tab page the host just showed.
    ///
    /// Nothing is recorded when the top entry came from a guard redirect or
    /// already is that page; the redirect marker is cleared either way.
    pub async fn tab_item_show(&mut self, page: TabPage) -> Option<NavigationResult> {
        let path = page_path(&page.route);

        if let Some(top) = self.stack_mut().top_mut() {
            if top.before_each || top.path == path {
                debug_log!("Tab '{}' already on top", path);
                top.before_each = false;
                return None;
            }
        }

        let location = Location::new(path).with_query(page.options).silent();
        Some(self.navigate(NavigateRequest::SwitchTab(location)).await)
    }

    /// Pop the page the host just closed, unless the router closed it.
    pub async fn page_unload(&mut self) -> Option<NavigationResult> {
        if self.pending_unloads > 0 {
            self.pending_unloads -= 1;
            trace_log!(
                "Page unload follows navigate_back, nothing to pop ({} left)",
                self.pending_unloads
            );
            return None;
        }
        Some(
            self.navigate(NavigateRequest::NavigateBack(BackOptions::default().silent()))
                .await,
        )
    }

    async fn relaunch_silently(&mut self, options: LaunchOptions) -> NavigationResult {
        let location = Location::new(page_path(&options.path))
            .with_query(options.query)
            .silent();
        self.navigate(NavigateRequest::ReLaunch(location)).await
    }
}

impl HostLifecycle for Router {
    fn on_launch(&mut self, options: LaunchOptions) -> LifecycleFuture<'_> {
        Box::pin(self.launch(options))
    }

    fn on_hot_launch(&mut self, options: LaunchOptions) -> LifecycleFuture<'_> {
        Box::pin(self.hot_launch(options))
    }

    fn on_unload(&mut self) {
        self.unload();
    }

    fn on_tab_show(&mut self, page: TabPage) -> LifecycleFuture<'_> {
        Box::pin(self.tab_item_show(page))
    }

    fn on_page_unload(&mut self) -> LifecycleFuture<'_> {
        Box::pin(self.page_unload())
    }
}

// ============================================================================
// Tests
// ============================================================================
