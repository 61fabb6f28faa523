//! Builder for constructing stores.

use crate::builder::error::BuildError;
use crate::core::Middleware;
use crate::persist::{self, FileStorage, PersistError, PersistOptions};
use crate::store::Store;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

type Hydrator<T> = Box<dyn FnOnce(Arc<T>) -> Arc<T> + Send>;

/// Builder for constructing stores with a fluent API.
///
/// Persistence configured with [`persist`](Self::persist) always runs last,
/// after every middleware added with [`middleware`](Self::middleware),
/// regardless of call order.
pub struct StoreBuilder<T> {
    initial: Option<Arc<T>>,
    middleware: Vec<Middleware<T>>,
    persistence: Option<(String, Hydrator<T>, Middleware<T>)>,
}

impl<T: Send + Sync + 'static> StoreBuilder<T> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            middleware: Vec::new(),
            persistence: None,
        }
    }

    /// Set the initial state (required). With persistence configured this
    /// is the fallback used when nothing readable is stored.
    pub fn initial(self, state: T) -> Self {
        self.initial_arc(Arc::new(state))
    }

    /// Set the initial state from a shared reference.
    pub fn initial_arc(mut self, state: Arc<T>) -> Self {
        self.initial = Some(state);
        self
    }

    /// Append a middleware.
    pub fn middleware(mut self, middleware: Middleware<T>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Append several middleware, keeping their order.
    pub fn middlewares(mut self, middleware: Vec<Middleware<T>>) -> Self {
        self.middleware.extend(middleware);
        self
    }

    /// Hydrate the initial state from storage and write every change back.
    /// Returns an error if persistence was already configured.
    pub fn persist(mut self, options: PersistOptions) -> Result<Self, BuildError>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some((key, _, _)) = &self.persistence {
            return Err(BuildError::DuplicatePersistence(key.clone()));
        }

        if options.key.is_empty() {
            return Err(BuildError::PersistenceSetup(PersistError::InvalidKey(
                options.key,
            )));
        }

        let key = options.key.clone();
        let hydrate_options = options.clone();
        let hydrator: Hydrator<T> =
            Box::new(move |default: Arc<T>| persist::hydrate_arc(&hydrate_options, default));
        self.persistence = Some((key, hydrator, persist::persist(options)));
        Ok(self)
    }

    /// Shorthand for [`persist`](Self::persist) with a [`FileStorage`]
    /// rooted at `dir`.
    pub fn persist_to_dir(
        self,
        dir: impl Into<std::path::PathBuf>,
        key: impl Into<String>,
    ) -> Result<Self, BuildError>
    where
        T: Serialize + DeserializeOwned,
    {
        let key = key.into();
        let storage = FileStorage::new(dir).map_err(BuildError::PersistenceSetup)?;
        storage
            .path_for(&key)
            .map_err(BuildError::PersistenceSetup)?;
        self.persist(PersistOptions::new(key, Arc::new(storage)))
    }

    /// Build the store.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<Store<T>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let mut middleware = self.middleware;

        let initial = match self.persistence {
            Some((_, hydrate, persist)) => {
                middleware.push(persist);
                hydrate(initial)
            }
            None => initial,
        };

        Ok(Store::from_arc(initial, middleware))
    }
}

impl<T: Send + Sync + 'static> Default for StoreBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
