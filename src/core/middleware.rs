//! Middleware: pure interceptors composed into the transition pipeline.
//!
//! A middleware receives the value the store held before the transition and
//! the value proposed so far, and returns the value to hand to the next
//! middleware. Returning `previous` unchanged is a veto.

use super::error::MiddlewareError;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

type ApplyFn<T> =
    dyn Fn(&Arc<T>, Arc<T>) -> Result<Arc<T>, MiddlewareError> + Send + Sync + 'static;

/// A single `(previous, proposed) -> effective` step.
///
/// Middleware must not mutate either argument; since values are shared
/// behind `Arc`, the only way to transform is to return a new `Arc`.
///
/// # Example
///
/// ```rust
/// use mindstore::core::Middleware;
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct Counter {
///     count: i64,
/// }
///
/// // Clamp negative counts back to zero.
/// let floor = Middleware::new(|_prev: &Arc<Counter>, next: Arc<Counter>| {
///     if next.count < 0 {
///         Arc::new(Counter { count: 0 })
///     } else {
///         next
///     }
/// })
/// .named("floor");
///
/// let prev = Arc::new(Counter { count: 0 });
/// let out = floor.apply(&prev, Arc::new(Counter { count: -1 })).unwrap();
/// assert_eq!(out.count, 0);
/// assert_eq!(floor.name(), "floor");
/// ```
pub struct Middleware<T> {
    name: Cow<'static, str>,
    apply: Arc<ApplyFn<T>>,
}

impl<T> Middleware<T> {
    /// Create a middleware from an infallible function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Arc<T>, Arc<T>) -> Arc<T> + Send + Sync + 'static,
    {
        Self::try_new(move |previous, proposed| Ok(f(previous, proposed)))
    }

    /// Create a middleware that may fail.
    ///
    /// A failure stops the pipeline: later middleware do not run and the
    /// store keeps its current value.
    pub fn try_new<F>(f: F) -> Self
    where
        F: Fn(&Arc<T>, Arc<T>) -> Result<Arc<T>, MiddlewareError> + Send + Sync + 'static,
    {
        Middleware {
            name: Cow::Borrowed("anonymous"),
            apply: Arc::new(f),
        }
    }

    /// Middleware that always returns `previous`.
    pub fn veto_all() -> Self {
        Self::new(|previous, _proposed| Arc::clone(previous)).named("veto_all")
    }

    /// Attach a name used in diagnostics and errors.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run this middleware once.
    pub fn apply(&self, previous: &Arc<T>, proposed: Arc<T>) -> Result<Arc<T>, MiddlewareError> {
        (self.apply)(previous, proposed)
    }
}

impl<T> Clone for Middleware<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            apply: Arc::clone(&self.apply),
        }
    }
}

impl<T> fmt::Debug for Middleware<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").field("name", &self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Counter {
        count: i64,
    }

    fn counter(count: i64) -> Arc<Counter> {
        Arc::new(Counter { count })
    }

    #[test]
    fn identity_middleware_passes_proposed_through() {
        let identity = Middleware::new(|_prev: &Arc<Counter>, next: Arc<Counter>| next);
        let prev = counter(0);
        let next = counter(1);

        let out = identity.apply(&prev, Arc::clone(&next)).unwrap();

        assert!(Arc::ptr_eq(&out, &next));
    }

    #[test]
    fn veto_all_returns_previous_reference() {
        let veto = Middleware::<Counter>::veto_all();
        let prev = counter(0);

        let out = veto.apply(&prev, counter(5)).unwrap();

        assert!(Arc::ptr_eq(&out, &prev));
        assert_eq!(veto.name(), "veto_all");
    }

    #[test]
    fn fallible_middleware_reports_error() {
        let strict = Middleware::try_new(|_prev: &Arc<Counter>, next: Arc<Counter>| {
            if next.count > 10 {
                Err(MiddlewareError::Rejected("too large".to_string()))
            } else {
                Ok(next)
            }
        });

        assert!(strict.apply(&counter(0), counter(3)).is_ok());
        let err = strict.apply(&counter(0), counter(11)).unwrap_err();
        assert!(matches!(err, MiddlewareError::Rejected(_)));
    }

    #[test]
    fn default_name_is_anonymous() {
        let m = Middleware::new(|_prev: &Arc<Counter>, next: Arc<Counter>| next);
        assert_eq!(m.name(), "anonymous");
    }

    #[test]
    fn clones_share_the_same_function() {
        let m = Middleware::new(|_prev: &Arc<Counter>, next: Arc<Counter>| {
            counter(next.count * 2)
        })
        .named("double");
        let cloned = m.clone();

        let out = cloned.apply(&counter(0), counter(4)).unwrap();

        assert_eq!(out.count, 8);
        assert_eq!(cloned.name(), "double");
    }
}
