//! Transition logging middleware.
//!
//! Emits one `tracing` event per transition and passes the candidate
//! through untouched. Installing a subscriber is left to the application.

use crate::core::Middleware;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

/// Middleware that logs `previous` and `next` under `label`, then returns
/// `next`.
///
/// Events are emitted at `DEBUG` with target `mindstore::transition`.
/// Place it last in the chain to log the effective value, or first to log
/// the raw proposal.
pub fn logger<T>(label: impl Into<String>) -> Middleware<T>
where
    T: Debug + Send + Sync + 'static,
{
    let label = label.into();
    let name = format!("logger:{label}");
    Middleware::new(move |previous: &Arc<T>, next: Arc<T>| {
        debug!(
            target: "mindstore::transition",
            label = %label,
            unchanged = Arc::ptr_eq(previous, &next),
            previous = ?previous,
            next = ?next,
            "transition"
        );
        next
    })
    .named(name)
}
