//! Sequential guard execution.
//!
//! [`guard_to_unit`] wraps one guard into a deferred unit of work and
//! decides what it settled on; [`run_queue`] runs units strictly one after
//! another, stopping at the first failure.
//!
//! A unit's outcome follows these rules:
//!
//! 1. If the guard called `next`, the first value passed wins.
//! 2. Otherwise, a guard that does not take `next` is auto-advanced with its
//!    return value (nothing means continue).
//! 3. Otherwise, a guard that takes `next` passes its returned value through
//!    unchanged; returning nothing is a [`NextNotCalled`] failure.
//! 4. [`NextValue::Abort`] turns into a [`GuardAborted`] failure.
//!
//! [`NextNotCalled`]: NavigationError::NextNotCalled
//! [`GuardAborted`]: NavigationError::GuardAborted

use crate::guards::{NavigationGuard, Next, NextValue};
use crate::state::ResolvedRoute;
use crate::{debug_log, trace_log, NavigationError};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A started guard unit.
pub type GuardUnit = Pin<Box<dyn Future<Output = Result<NextValue, NavigationError>> + Send>>;

/// A guard unit that has not started yet.
pub type LazyUnit = Box<dyn FnOnce() -> GuardUnit + Send>;

/// Defer `guard` into a unit that checks the navigation `from` → `to`.
pub fn guard_to_unit(
    guard: Arc<dyn NavigationGuard>,
    to: ResolvedRoute,
    from: Option<ResolvedRoute>,
) -> LazyUnit {
    Box::new(move || {
        Box::pin(async move {
            let name = guard.name();
            let next = Next::new();

            let returned = guard
                .check(to, from, next.clone())
                .await
                .map_err(|err| {
                    if err.is_aborted() {
                        err
                    } else {
                        NavigationError::GuardFailed {
                            guard: name.to_string(),
                            message: err.to_string(),
                        }
                    }
                })?;

            let value = match (next.take(), returned) {
                (Some(value), _) => value,
                (None, returned) if !guard.takes_next() => returned.unwrap_or(NextValue::Continue),
                (None, Some(returned)) => returned,
                (None, None) => {
                    return Err(NavigationError::NextNotCalled {
                        guard: name.to_string(),
                    })
                }
            };

            trace_log!("Guard '{}' → {:?}", name, value);

            match value {
                NextValue::Abort => Err(NavigationError::GuardAborted {
                    guard: name.to_string(),
                }),
                other => Ok(other),
            }
        })
    })
}

/// Build one unit per guard, in registration order.
pub fn build_queue(
    guards: &[Arc<dyn NavigationGuard>],
    to: &ResolvedRoute,
    from: Option<&ResolvedRoute>,
) -> Vec<LazyUnit> {
    guards
        .iter()
        .map(|guard| guard_to_unit(Arc::clone(guard), to.clone(), from.cloned()))
        .collect()
}

/// Run units one after another.
///
/// Each unit starts only after the previous one settled. The first failure
/// skips the remaining units and becomes the result. On success the result
/// is the last unit's value ([`NextValue::Continue`] for an empty queue).
pub async fn run_queue(units: Vec<LazyUnit>) -> Result<NextValue, NavigationError> {
    let total = units.len();
    let mut last = NextValue::Continue;

    for (index, unit) in units.into_iter().enumerate() {
        match unit().await {
            Ok(value) => last = value,
            Err(err) => {
                debug_log!(
                    "Guard queue stopped at {}/{}: {}",
                    index + 1,
                    total,
                    err
                );
                return Err(err);
            }
        }
    }

    Ok(last)
}

// ============================================================================
// Tests
// ============================================================================
