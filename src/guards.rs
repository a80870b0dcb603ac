//! Navigation guards.
//!
//! Guards are checked **before** a navigation commits (registered with
//! [`Router::before_each`](crate::Router::before_each)) and **after** it
//! commits (registered with [`Router::after_each`](crate::Router::after_each)).
//! A before-guard decides whether the navigation continues, is aborted, or is
//! redirected elsewhere.
//!
//! Every guard receives the destination route, the route being left, and a
//! [`Next`] handle. The value a guard settles on is a [`NextValue`]:
//!
//! | Value | Effect |
//! |-------|--------|
//! | [`Continue`](NextValue::Continue) | let the navigation proceed |
//! | [`Abort`](NextValue::Abort) | veto; the tentative stack change is rolled back |
//! | [`Redirect`](NextValue::Redirect) | roll back, then run the given request instead |
//! | [`Path`](NextValue::Path) | roll back, then `navigate_to` the path |
//! | [`Callback`](NextValue::Callback) | roll back, then hand control to the callback |
//!
//! # Calling `next` vs returning a value
//!
//! Guards built with [`guard_fn`] or [`async_guard_fn`] never see `next`:
//! their return value is used as if it had been passed to `next`.
//! Guards built with [`next_guard_fn`] (or a manual [`NavigationGuard`] impl
//! whose [`takes_next`](NavigationGuard::takes_next) is `true`) must either
//! call `next` or return a redirect-like value; the first `next` call wins.
//!
//! # Example
//!
//! ```
//! use page_navigator::{async_guard_fn, guard_fn, next_guard_fn, NavigationError, NextValue};
//!
//! // Veto navigation to anything under /admin.
//! let admin = guard_fn(|to, _from| !to.path.starts_with("/admin"));
//!
//! // Redirect to the login page after an async session check.
//! let session = async_guard_fn(|to, _from| async move {
//!     let logged_in = to.meta.get_as::<bool>("public").unwrap_or(false);
//!     Ok::<_, NavigationError>(if logged_in { NextValue::Continue } else { NextValue::from("/login") })
//! });
//!
//! // Classic three-argument form.
//! let audit = next_guard_fn(|_to, _from, next| async move {
//!     next.proceed();
//!     Ok::<_, NavigationError>(None)
//! });
//! # let _ = (admin, session, audit);
//! ```

use crate::request::NavigateRequest;
use crate::state::ResolvedRoute;
use crate::{trace_log, NavigationError};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};

/// Future returned by [`NavigationGuard::check`].
///
/// `Ok(None)` means the guard returned nothing.
pub type GuardFuture =
    Pin<Box<dyn Future<Output = Result<Option<NextValue>, NavigationError>> + Send>>;

/// Custom handler a guard can settle on instead of a redirect.
pub type NextCallback = Arc<dyn Fn(GuardOrigin) + Send + Sync>;

/// Marker passed to a [`NextCallback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardOrigin {
    /// Always `true`: the callback was reached through a guard.
    pub before_each: bool,
}

// ============================================================================
// NextValue
// ============================================================================

/// The value a guard resolves with.
#[derive(Clone)]
pub enum NextValue {
    /// Proceed (`next()` / `next(true)`).
    Continue,
    /// Veto (`next(false)`).
    Abort,
    /// Run a different navigation instead.
    Redirect(Box<NavigateRequest>),
    /// `navigate_to` this path instead.
    Path(String),
    /// Hand control to a custom handler.
    Callback(NextCallback),
}

impl NextValue {
    /// Create a [`Callback`](Self::Callback) value.
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(GuardOrigin) + Send + Sync + 'static,
    {
        Self::Callback(Arc::new(f))
    }

    /// Check if this value lets navigation continue unchanged.
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Check if this value vetoes navigation.
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::Abort)
    }

    /// Check if this value replaces the navigation (redirect, path or callback).
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_) | Self::Path(_) | Self::Callback(_))
    }
}

impl fmt::Debug for NextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextValue::Continue => f.write_str("Continue"),
            NextValue::Abort => f.write_str("Abort"),
            NextValue::Redirect(request) => f.debug_tuple("Redirect").field(request).finish(),
            NextValue::Path(path) => f.debug_tuple("Path").field(path).finish(),
            NextValue::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<()> for NextValue {
    fn from((): ()) -> Self {
        Self::Continue
    }
}

impl From<bool> for NextValue {
    fn from(allow: bool) -> Self {
        if allow {
            Self::Continue
        } else {
            Self::Abort
        }
    }
}

impl From<&str> for NextValue {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for NextValue {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<NavigateRequest> for NextValue {
    fn from(request: NavigateRequest) -> Self {
        Self::Redirect(Box::new(request))
    }
}

// ============================================================================
// Next
// ============================================================================

/// Handle a guard uses to settle its decision.
///
/// Cloning shares the slot; only the first call is kept.
#[derive(Clone, Default)]
pub struct Next {
    slot: Arc<Mutex<Option<NextValue>>>,
}

impl Next {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Settle with `value`. Ignored if `next` was already called.
    pub fn call(&self, value: impl Into<NextValue>) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(value.into());
        } else {
            trace_log!("next() called more than once; keeping the first value");
        }
    }

    /// Shorthand for `call(NextValue::Continue)`.
    pub fn proceed(&self) {
        self.call(NextValue::Continue);
    }

    /// Shorthand for `call(NextValue::Abort)`.
    pub fn abort(&self) {
        self.call(NextValue::Abort);
    }

    /// Shorthand for `call(NextValue::Path(path))`.
    pub fn redirect(&self, path: impl Into<String>) {
        self.call(NextValue::Path(path.into()));
    }

    /// Whether `next` has been called.
    pub fn is_called(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub(crate) fn take(&self) -> Option<NextValue> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("called", &self.is_called())
            .finish()
    }
}

// ============================================================================
// NavigationGuard trait
// ============================================================================

/// A callback allowed to inspect, veto or redirect a pending navigation.
///
/// # Example
///
/// ```
/// use page_navigator::{GuardFuture, NavigationGuard, Next, NextValue, ResolvedRoute};
///
/// struct RequireLogin {
///     logged_in: bool,
/// }
///
/// impl NavigationGuard for RequireLogin {
///     fn check(&self, to: ResolvedRoute, _from: Option<ResolvedRoute>, next: Next) -> GuardFuture {
///         let logged_in = self.logged_in;
///         Box::pin(async move {
///             if logged_in || to.path == "/login" {
///                 next.proceed();
///             } else {
///                 next.redirect("/login");
///             }
///             Ok(None)
///         })
///     }
///
///     fn name(&self) -> &'static str {
///         "RequireLogin"
///     }
/// }
/// ```
pub trait NavigationGuard: Send + Sync + 'static {
    /// Inspect the navigation from `from` to `to`.
    fn check(&self, to: ResolvedRoute, from: Option<ResolvedRoute>, next: Next) -> GuardFuture;

    /// Whether this guard settles through `next`.
    ///
    /// When `false`, the returned value is funneled through `next` instead
    /// (no value means continue).
    fn takes_next(&self) -> bool {
        true
    }

    /// Guard name for debugging and error messages.
    fn name(&self) -> &'static str {
        "NavigationGuard"
    }
}

// ============================================================================
// Closure helpers
// ============================================================================

/// Create a synchronous guard from a closure; its return value is the
/// decision.
///
/// ```
/// use page_navigator::guard_fn;
///
/// let guard = guard_fn(|to, _from| to.path != "/forbidden");
/// ```
pub const fn guard_fn<F, T>(f: F) -> FnGuard<F>
where
    F: Fn(&ResolvedRoute, Option<&ResolvedRoute>) -> T + Send + Sync + 'static,
    T: Into<NextValue>,
{
    FnGuard {
        f,
        name: "guard_fn",
    }
}

/// Guard created from a synchronous closure via [`guard_fn`].
pub struct FnGuard<F> {
    f: F,
    name: &'static str,
}

impl<F> FnGuard<F> {
    /// Set the name used in logs and errors.
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<F, T> NavigationGuard for FnGuard<F>
where
    F: Fn(&ResolvedRoute, Option<&ResolvedRoute>) -> T + Send + Sync + 'static,
    T: Into<NextValue>,
{
    fn check(&self, to: ResolvedRoute, from: Option<ResolvedRoute>, _next: Next) -> GuardFuture {
        let value = (self.f)(&to, from.as_ref()).into();
        Box::pin(std::future::ready(Ok(Some(value))))
    }

    fn takes_next(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Create an asynchronous guard from a closure; its resolved value is the
/// decision.
pub const fn async_guard_fn<F, Fut, T>(f: F) -> AsyncFnGuard<F>
where
    F: Fn(ResolvedRoute, Option<ResolvedRoute>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, NavigationError>> + Send + 'static,
    T: Into<NextValue>,
{
    AsyncFnGuard {
        f,
        name: "async_guard_fn",
    }
}

/// Guard created from an async closure via [`async_guard_fn`].
pub struct AsyncFnGuard<F> {
    f: F,
    name: &'static str,
}

impl<F> AsyncFnGuard<F> {
    /// Set the name used in logs and errors.
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<F, Fut, T> NavigationGuard for AsyncFnGuard<F>
where
    F: Fn(ResolvedRoute, Option<ResolvedRoute>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, NavigationError>> + Send + 'static,
    T: Into<NextValue>,
{
    fn check(&self, to: ResolvedRoute, from: Option<ResolvedRoute>, _next: Next) -> GuardFuture {
        let fut = (self.f)(to, from);
        Box::pin(async move { fut.await.map(|value| Some(value.into())) })
    }

    fn takes_next(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Create a guard that receives `next` and settles through it.
pub const fn next_guard_fn<F, Fut>(f: F) -> NextFnGuard<F>
where
    F: Fn(ResolvedRoute, Option<ResolvedRoute>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<NextValue>, NavigationError>> + Send + 'static,
{
    NextFnGuard {
        f,
        name: "next_guard_fn",
    }
}

/// Guard created from a closure via [`next_guard_fn`].
pub struct NextFnGuard<F> {
    f: F,
    name: &'static str,
}

impl<F> NextFnGuard<F> {
    /// Set the name used in logs and errors.
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<F, Fut> NavigationGuard for NextFnGuard<F>
where
    F: Fn(ResolvedRoute, Option<ResolvedRoute>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Option<NextValue>, NavigationError>> + Send + 'static,
{
    fn check(&self, to: ResolvedRoute, from: Option<ResolvedRoute>, next: Next) -> GuardFuture {
        Box::pin((self.f)(to, from, next))
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

// ============================================================================
// Tests
// ============================================================================
