//! The state container: read, atomic update and change notification.
//!
//! The store is the imperative shell around [`crate::core`]: it owns the
//! current value, resolves each proposal, runs it through the pipeline and
//! publishes the result.

mod container;
mod error;
mod id;
mod subscription;

pub use container::{Outcome, Store};
pub use error::StoreError;
pub use id::StoreId;
pub use subscription::Subscription;

use crate::core::Middleware;

/// Create a store holding `initial` with a fixed middleware chain.
///
/// ```rust
/// use mindstore::create_store;
///
/// let store = create_store(0u32, Vec::new());
/// store.set(5u32).unwrap();
/// assert_eq!(*store.get(), 5);
/// ```
pub fn create_store<T>(initial: T, middleware: Vec<Middleware<T>>) -> Store<T>
where
    T: Send + Sync + 'static,
{
    Store::new(initial, middleware)
}
