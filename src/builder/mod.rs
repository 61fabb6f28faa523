//! Builder API for ergonomic store construction.
//!
//! This module provides an explicit configuration record, a fluent builder
//! and small middleware factories for the most common interceptors.

pub mod config;
pub mod error;
pub mod store;

pub use config::StoreConfig;
pub use error::BuildError;
pub use store::StoreBuilder;

use crate::core::Middleware;
use std::sync::Arc;

/// Create a middleware that only lets a candidate through when `allow`
/// holds; otherwise it returns the previous value (a veto).
///
/// # Example
///
/// ```
/// use mindstore::builder::guard;
/// use mindstore::create_store;
///
/// let store = create_store(1u32, vec![guard(|prev: &u32, next: &u32| next > prev)]);
/// store.set(0u32).unwrap();
/// assert_eq!(*store.get(), 1);
/// store.set(2u32).unwrap();
/// assert_eq!(*store.get(), 2);
/// ```
pub fn guard<T, F>(allow: F) -> Middleware<T>
where
    T: Send + Sync + 'static,
    F: Fn(&T, &T) -> bool + Send + Sync + 'static,
{
    Middleware::new(move |previous: &Arc<T>, next: Arc<T>| {
        if allow(&**previous, &*next) {
            next
        } else {
            Arc::clone(previous)
        }
    })
    .named("guard")
}

/// Create a middleware that rewrites every candidate with `f`.
///
/// `f` runs even when the candidate is the previous value, so a `map`
/// placed after a veto can still change the outcome.
///
/// # Example
///
/// ```
/// use mindstore::builder::map;
/// use mindstore::create_store;
///
/// let store = create_store(0i32, vec![map(|_prev: &i32, next: &i32| (*next).clamp(0, 10))]);
/// store.set(42i32).unwrap();
/// assert_eq!(*store.get(), 10);
/// ```
pub fn map<T, F>(f: F) -> Middleware<T>
where
    T: Send + Sync + 'static,
    F: Fn(&T, &T) -> T + Send + Sync + 'static,
{
    Middleware::new(move |previous: &Arc<T>, next: Arc<T>| Arc::new(f(&**previous, &*next)))
        .named("map")
}
