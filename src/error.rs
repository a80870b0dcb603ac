//! Error handling for the router.
//!
//! Navigation never panics and never returns `Err` to its caller. Instead
//! every navigation call reports what happened through a value:
//!
//! - [`NavigationResult`] is the top-level outcome of a navigation
//!   (`Success`, `Silent`, `NotFound`, `Blocked`, `Handled`, `Error`).
//! - [`NavigationError`] is a detailed error variant (route not found, guard
//!   aborted, redirect loop, etc.). Guards also use it to report their own
//!   failures.
//!
//! Every failure is logged where it happens, so ignoring the returned value
//! is always safe.
//!
//! # Examples
//!
//! ```
//! use page_navigator::error::{NavigationError, NavigationResult};
//!
//! let result = NavigationResult::Success { path: "/home".into() };
//! assert!(result.is_success());
//!
//! let blocked = NavigationResult::Blocked {
//!     reason: "Not authenticated".into(),
//! };
//! assert!(blocked.is_blocked());
//!
//! let error = NavigationError::custom("backend offline");
//! assert_eq!(error.to_string(), "backend offline");
//! ```

use std::fmt;

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Outcome of a navigation attempt through the guard pipeline.
///
/// Every call to [`Router::navigate`](crate::Router::navigate) (and friends)
/// returns this enum.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationResult {
    /// Guards approved and the engine was asked to perform the transition.
    Success { path: String },
    /// Guards approved a silent navigation; the stack was updated but the
    /// engine was not called.
    Silent { path: String },
    /// No route is registered for the requested pathname.
    NotFound { path: String },
    /// A guard vetoed the navigation; the tentative stack change was rolled
    /// back.
    Blocked { reason: String },
    /// A guard handed navigation over to a callback.
    Handled,
    /// A guard failed, leaving the stack as the synchronous steps made it,
    /// or guard redirects chained past the configured depth.
    Error(NavigationError),
}

/// Detailed error variants that can occur during navigation.
///
/// Implements [`std::error::Error`] and [`Display`](std::fmt::Display) for
/// idiomatic error handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// No route registered for the pathname
    RouteNotFound { path: String },

    /// A route with this path is already registered
    DuplicateRoute { path: String },

    /// Tried to remove a path that is not registered
    RouteNotRegistered { path: String },

    /// A guard called `next(false)`
    GuardAborted { guard: String },

    /// A guard returned an error
    GuardFailed { guard: String, message: String },

    /// A guard that takes `next` finished without calling it or returning a value
    NextNotCalled { guard: String },

    /// Guard redirects exceeded the configured depth
    RedirectLoop { depth: usize, path: String },

    /// Custom error
    Custom { message: String },
}

impl NavigationError {
    /// Create a [`Custom`](Self::Custom) error, typically from inside a guard.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    /// Check if this is the explicit-veto outcome.
    pub fn is_aborted(&self) -> bool {
        matches!(self, NavigationError::GuardAborted { .. })
    }
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::RouteNotFound { path } => {
                write!(f, "Route not found: {}", path)
            }
            NavigationError::DuplicateRoute { path } => {
                write!(f, "Route already registered: {}", path)
            }
            NavigationError::RouteNotRegistered { path } => {
                write!(f, "Cannot remove unregistered route: {}", path)
            }
            NavigationError::GuardAborted { guard } => {
                write!(f, "Navigation aborted by guard '{}'", guard)
            }
            NavigationError::GuardFailed { guard, message } => {
                write!(f, "Guard '{}' failed: {}", guard, message)
            }
            NavigationError::NextNotCalled { guard } => {
                write!(f, "Guard '{}' finished without calling next", guard)
            }
            NavigationError::RedirectLoop { depth, path } => {
                write!(f, "Redirect loop detected (depth {}): target '{}'", depth, path)
            }
            NavigationError::Custom { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for NavigationError {}

impl NavigationResult {
    /// Check if navigation was committed through the engine
    pub fn is_success(&self) -> bool {
        matches!(self, NavigationResult::Success { .. })
    }

    /// Check if navigation completed without calling the engine
    pub fn is_silent(&self) -> bool {
        matches!(self, NavigationResult::Silent { .. })
    }

    /// Check if route was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, NavigationResult::NotFound { .. })
    }

    /// Check if navigation was blocked
    pub fn is_blocked(&self) -> bool {
        matches!(self, NavigationResult::Blocked { .. })
    }

    /// Check if there was an error
    pub fn is_error(&self) -> bool {
        matches!(self, NavigationResult::Error(_))
    }
}

// ============================================================================
// Tests
// ============================================================================
