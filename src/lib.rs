//! Mindstore: a minimal state container with middleware and memoized selectors
//!
//! Mindstore follows the "pure core, imperative shell" philosophy. Transitions
//! are composed from pure middleware functions; the store is the thin shell
//! that owns the current value, applies the pipeline's result and notifies
//! subscribers.
//!
//! # Core Concepts
//!
//! - **Store**: holds one `Arc<T>`, replaced atomically on every change
//! - **Middleware**: `(previous, proposed) -> effective` interceptors, folded
//!   left to right; returning `previous` is a veto
//! - **Selectors**: projections cached by reference identity of their input
//!
//! Values are compared by reference (`Arc::ptr_eq`), never structurally. An
//! update whose pipeline ends on the store's current `Arc` notifies nobody,
//! and selectors reading that store keep their cached output.
//!
//! # Example
//!
//! ```rust
//! use mindstore::{create_store, Middleware, Selector};
//! use std::sync::Arc;
//!
//! #[derive(Debug)]
//! struct Counter {
//!     count: i64,
//! }
//!
//! let floor = Middleware::new(|_prev: &Arc<Counter>, next: Arc<Counter>| {
//!     if next.count < 0 {
//!         Arc::new(Counter { count: 0 })
//!     } else {
//!         next
//!     }
//! });
//!
//! let store = create_store(Counter { count: 0 }, vec![floor]);
//! let doubled = Selector::new(|c: &Counter| c.count * 2);
//!
//! store.update(|c| Counter { count: c.count + 2 }).unwrap();
//! store.update(|c| Counter { count: c.count - 5 }).unwrap();
//!
//! assert_eq!(store.get().count, 0);
//! assert_eq!(*store.select(&doubled), 0);
//! ```

pub mod builder;
pub mod core;
pub mod logging;
pub mod persist;
pub mod selector;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use builder::{StoreBuilder, StoreConfig};
pub use crate::core::{Middleware, MiddlewareError, Pipeline};
pub use selector::{select, MemoCell, Selector};
pub use store::{create_store, Outcome, Store, StoreError, StoreId, Subscription};
