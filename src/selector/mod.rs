//! Memoized projections of store values.
//!
//! A [`Selector`] pairs a pure projection `&T -> S` with a [`MemoCell`].
//! Reading through it re-runs the projection only when the store's value
//! reference changed since the last read. This is sound because the store
//! swaps in a new `Arc` on every effective change and keeps the same one
//! otherwise.
//!
//! # Boundary
//!
//! The memoizer prevents redundant projection EXECUTION, nothing more. If a
//! projection builds a new collection, every recomputation yields a new
//! output `Arc`, even when the contents are equal to the previous output.
//! Callers comparing outputs by reference across store changes will see a
//! new reference each time the input changed.

mod memo;

pub use memo::MemoCell;

use crate::store::Store;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A projection with its own memo cell.
///
/// Keep one `Selector` per call site (for example per component) and reuse
/// it across re-renders. Using one selector with several stores is correct
/// but alternating between them defeats the cache.
///
/// # Example
///
/// ```rust
/// use mindstore::{create_store, Selector};
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct Todos {
///     items: Vec<(String, bool)>,
/// }
///
/// let store = create_store(
///     Todos {
///         items: vec![("write docs".into(), true), ("ship".into(), false)],
///     },
///     Vec::new(),
/// );
/// let open = Selector::new(|t: &Todos| t.items.iter().filter(|(_, done)| !done).count());
///
/// let first = open.select(&store);
/// let second = store.select(&open);
/// assert_eq!(*first, 1);
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
pub struct Selector<T, S> {
    project: Box<dyn Fn(&T) -> S + Send + Sync>,
    cell: Mutex<MemoCell<T, S>>,
}

impl<T, S> Selector<T, S> {
    pub fn new<F>(project: F) -> Self
    where
        F: Fn(&T) -> S + Send + Sync + 'static,
    {
        Self {
            project: Box::new(project),
            cell: Mutex::new(MemoCell::new()),
        }
    }

    /// Project the store's current value, reusing the cached output when
    /// the value reference is unchanged.
    ///
    /// The projection runs without the cell locked, so it may read other
    /// selectors (or this one) freely.
    pub fn select(&self, store: &Store<T>) -> Arc<S>
    where
        T: Send + Sync + 'static,
    {
        let current = store.get();
        if let Some(output) = self.cell.lock().cached(&current) {
            trace!(store = %store.id(), "selector cache hit");
            return output;
        }

        trace!(store = %store.id(), "selector recomputing");
        let output = Arc::new((self.project)(&current));
        self.cell.lock().remember(current, Arc::clone(&output));
        output
    }

    /// Drop the cached input and output; the next read recomputes.
    pub fn invalidate(&self) {
        self.cell.lock().clear();
    }
}

impl<T, S> fmt::Debug for Selector<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector").finish_non_exhaustive()
    }
}

/// Free-function form of [`Selector::select`].
pub fn select<T, S>(store: &Store<T>, selector: &Selector<T, S>) -> Arc<S>
where
    T: Send + Sync + 'static,
{
    selector.select(store)
}
