//! Last-input / last-output cache keyed by reference identity.

use std::sync::Arc;

/// Cache for one (store, projection) pairing.
///
/// The cached output is valid iff the remembered input is the very `Arc`
/// the store holds now. Structural equality is never consulted.
pub struct MemoCell<T, S> {
    last_input: Option<Arc<T>>,
    last_output: Option<Arc<S>>,
}

impl<T, S> MemoCell<T, S> {
    pub fn new() -> Self {
        Self {
            last_input: None,
            last_output: None,
        }
    }

    /// Whether the cached output was computed from `current`.
    pub fn is_fresh(&self, current: &Arc<T>) -> bool {
        self.last_input
            .as_ref()
            .is_some_and(|input| Arc::ptr_eq(input, current))
    }

    /// The cached output, if it is valid for `current`.
    pub fn cached(&self, current: &Arc<T>) -> Option<Arc<S>> {
        if self.is_fresh(current) {
            self.last_output.clone()
        } else {
            None
        }
    }

    pub fn remember(&mut self, input: Arc<T>, output: Arc<S>) {
        self.last_input = Some(input);
        self.last_output = Some(output);
    }

    /// Return the cached output or compute, remember and return a new one.
    ///
    /// Entry point for binding layers that keep their own cells, one per
    /// (store, projection) pairing, instead of going through a
    /// [`Selector`](super::Selector). The projection runs while the caller
    /// holds `&mut self`; [`Selector`](super::Selector) uses
    /// [`cached`](Self::cached) and [`remember`](Self::remember) directly so
    /// its projection runs without its lock held.
    ///
    /// ```rust
    /// use mindstore::{create_store, MemoCell};
    /// use std::sync::Arc;
    ///
    /// let store = create_store(vec![3, 1, 2], Vec::new());
    /// let mut cell = MemoCell::new();
    ///
    /// let first = cell.get_or_compute(store.get(), |v: &Vec<i32>| v.iter().sum::<i32>());
    /// let second = cell.get_or_compute(store.get(), |_: &Vec<i32>| unreachable!());
    ///
    /// assert_eq!(*first, 6);
    /// assert!(Arc::ptr_eq(&first, &second));
    /// ```
    pub fn get_or_compute<F>(&mut self, current: Arc<T>, project: F) -> Arc<S>
    where
        F: FnOnce(&T) -> S,
    {
        if let Some(output) = self.cached(&current) {
            return output;
        }
        let output = Arc::new(project(&current));
        self.remember(current, Arc::clone(&output));
        output
    }

    pub fn clear(&mut self) {
        self.last_input = None;
        self.last_output = None;
    }
}

impl<T, S> Default for MemoCell<T, S> {
    fn default() -> Self {
        Self::new()
    }
}
