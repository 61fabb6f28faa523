//! Explicit store configuration.

use crate::core::Middleware;
use crate::store::Store;

/// Everything needed to create a store.
///
/// `middleware` defaults to an empty chain.
///
/// ```rust
/// use mindstore::builder::StoreConfig;
/// use mindstore::logging::logger;
///
/// let store = StoreConfig::new(0u8)
///     .with_middleware(logger("volume"))
///     .into_store();
/// assert_eq!(store.pipeline().len(), 1);
/// ```
pub struct StoreConfig<T> {
    pub initial_state: T,
    pub middleware: Vec<Middleware<T>>,
}

impl<T> StoreConfig<T> {
    pub fn new(initial_state: T) -> Self {
        Self {
            initial_state,
            middleware: Vec::new(),
        }
    }

    /// Append a middleware to the end of the chain.
    pub fn with_middleware(mut self, middleware: Middleware<T>) -> Self {
        self.middleware.push(middleware);
        self
    }
}

impl<T: Send + Sync + 'static> StoreConfig<T> {
    pub fn into_store(self) -> Store<T> {
        Store::new(self.initial_state, self.middleware)
    }
}

impl<T: Send + Sync + 'static> From<StoreConfig<T>> for Store<T> {
    fn from(config: StoreConfig<T>) -> Self {
        config.into_store()
    }
}

impl<T: Default> Default for StoreConfig<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
