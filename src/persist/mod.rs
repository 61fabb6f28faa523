//! Write-through persistence for store values.
//!
//! [`persist`] builds a middleware that writes each effective value to a
//! [`KeyValueStore`] under a configured key; [`hydrate`] reads the same key
//! back when the store is created, falling back to a default when the key is
//! absent or unreadable.
//!
//! # Example
//!
//! ```rust
//! use mindstore::persist::{self, MemoryStorage, PersistOptions};
//! use mindstore::create_store;
//! use serde::{Deserialize, Serialize};
//! use std::sync::Arc;
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Prefs {
//!     dark_mode: bool,
//! }
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let options = PersistOptions::new("prefs", storage.clone());
//!
//! let initial = persist::hydrate(&options, Prefs { dark_mode: false });
//! let store = create_store(initial, vec![persist::persist(options.clone())]);
//! store.set(Prefs { dark_mode: true }).unwrap();
//!
//! let reloaded = persist::hydrate(&options, Prefs { dark_mode: false });
//! assert!(reloaded.dark_mode);
//! ```

mod envelope;
mod error;
mod storage;

pub use envelope::{Codec, Envelope, ENVELOPE_VERSION};
pub use error::PersistError;
pub use storage::{FileStorage, KeyValueStore, MemoryStorage};

use crate::core::{Middleware, MiddlewareError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// What the persistence middleware does when a write fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteFailure {
    /// Keep the new value in memory and log a warning
    #[default]
    IgnoreAndLog,

    /// Reject the transition by returning the previous value
    Veto,

    /// Fail the transition with [`MiddlewareError::Persist`]
    Propagate,
}

/// Where and how a store is persisted.
#[derive(Clone)]
pub struct PersistOptions {
    pub key: String,
    pub storage: Arc<dyn KeyValueStore>,
    pub codec: Codec,
    pub on_write_failure: WriteFailure,
}

impl PersistOptions {
    pub fn new(key: impl Into<String>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            key: key.into(),
            storage,
            codec: Codec::default(),
            on_write_failure: WriteFailure::default(),
        }
    }

    pub fn codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    pub fn on_write_failure(mut self, strategy: WriteFailure) -> Self {
        self.on_write_failure = strategy;
        self
    }
}

impl fmt::Debug for PersistOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistOptions")
            .field("key", &self.key)
            .field("codec", &self.codec)
            .field("on_write_failure", &self.on_write_failure)
            .finish_non_exhaustive()
    }
}

/// Encode `state` and write it under the configured key.
pub fn save<T: Serialize>(options: &PersistOptions, state: &T) -> Result<(), PersistError> {
    let bytes = options.codec.encode(&Envelope::new(&options.key, state))?;
    options.storage.write(&options.key, &bytes)
}

/// Read and decode the state stored under the configured key.
///
/// An envelope recorded under another key (a file copied or renamed by
/// hand) is rejected with [`PersistError::KeyMismatch`].
pub fn load<T: DeserializeOwned>(options: &PersistOptions) -> Result<Option<T>, PersistError> {
    let Some(bytes) = options.storage.read(&options.key)? else {
        return Ok(None);
    };
    let envelope: Envelope<T> = options.codec.decode(&bytes)?;
    if envelope.key != options.key {
        return Err(PersistError::KeyMismatch {
            expected: options.key.clone(),
            found: envelope.key,
        });
    }
    Ok(Some(envelope.state))
}

/// Initial value for a persisted store: the stored state if it can be read,
/// otherwise `default`.
pub fn hydrate<T: DeserializeOwned>(options: &PersistOptions, default: T) -> T {
    load_or_log(options).unwrap_or(default)
}

/// Like [`hydrate`], but keeps the caller's `Arc` when falling back.
pub fn hydrate_arc<T: DeserializeOwned>(options: &PersistOptions, default: Arc<T>) -> Arc<T> {
    load_or_log(options).map(Arc::new).unwrap_or(default)
}

fn load_or_log<T: DeserializeOwned>(options: &PersistOptions) -> Option<T> {
    match load(options) {
        Ok(Some(state)) => {
            debug!(key = %options.key, "hydrated state from storage");
            Some(state)
        }
        Ok(None) => None,
        Err(err) => {
            warn!(key = %options.key, error = %err, "stored state unreadable, using default");
            None
        }
    }
}

/// Middleware writing every changed value through to storage.
///
/// Runs after the value it receives is final for its position in the
/// chain; register it last so it sees the fully transformed result.
/// Transitions whose candidate is still the previous reference are not
/// written.
pub fn persist<T>(options: PersistOptions) -> Middleware<T>
where
    T: Serialize + Send + Sync + 'static,
{
    let name = format!("persist:{}", options.key);
    Middleware::try_new(move |previous: &Arc<T>, next: Arc<T>| {
        if Arc::ptr_eq(previous, &next) {
            return Ok(next);
        }
        let Err(err) = save(&options, &*next) else {
            return Ok(next);
        };
        match options.on_write_failure {
            WriteFailure::IgnoreAndLog => {
                warn!(key = %options.key, error = %err, "persisting state failed, keeping value");
                Ok(next)
            }
            WriteFailure::Veto => {
                warn!(key = %options.key, error = %err, "persisting state failed, vetoing");
                Ok(Arc::clone(previous))
            }
            WriteFailure::Propagate => Err(MiddlewareError::Persist(err)),
        }
    })
    .named(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Store, StoreError};
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: i64,
    }

    struct BrokenStorage;

    impl KeyValueStore for BrokenStorage {
        fn read(&self, _key: &str) -> Result<Option<Vec<u8>>, PersistError> {
            Err(PersistError::InvalidKey("broken".to_string()))
        }

        fn write(&self, _key: &str, _bytes: &[u8]) -> Result<(), PersistError> {
            Err(PersistError::InvalidKey("broken".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), PersistError> {
            Ok(())
        }
    }

    fn broken(strategy: WriteFailure) -> PersistOptions {
        PersistOptions::new("counter", Arc::new(BrokenStorage)).on_write_failure(strategy)
    }

    #[test]
    fn writes_through_on_change() {
        let storage = Arc::new(MemoryStorage::new());
        let options = PersistOptions::new("counter", storage.clone());
        let store = Store::new(Counter { count: 0 }, vec![persist(options.clone())]);

        store.set(Counter { count: 4 }).unwrap();

        assert_eq!(load::<Counter>(&options).unwrap(), Some(Counter { count: 4 }));
    }

    #[test]
    fn unchanged_transition_is_not_written() {
        let storage = Arc::new(MemoryStorage::new());
        let options = PersistOptions::new("counter", storage.clone());
        let store = Store::new(Counter { count: 0 }, vec![persist(options)]);

        store.set(store.get()).unwrap();

        assert!(storage.is_empty());
    }

    #[test]
    fn hydrate_falls_back_when_absent() {
        let options = PersistOptions::new("missing", Arc::new(MemoryStorage::new()));
        assert_eq!(hydrate(&options, Counter { count: 9 }).count, 9);
    }

    #[test]
    fn hydrate_falls_back_when_corrupt() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write("counter", b"{ definitely not").unwrap();
        let options = PersistOptions::new("counter", storage);

        assert_eq!(hydrate(&options, Counter { count: 9 }).count, 9);
    }

    #[test]
    fn load_rejects_envelope_from_another_key() {
        let storage = Arc::new(MemoryStorage::new());
        let bytes = Codec::Json
            .encode(&Envelope::new("other", Counter { count: 3 }))
            .unwrap();
        storage.write("counter", &bytes).unwrap();
        let options = PersistOptions::new("counter", storage);

        let result = load::<Counter>(&options);

        assert!(matches!(
            result,
            Err(PersistError::KeyMismatch { expected, found })
                if expected == "counter" && found == "other"
        ));
        assert_eq!(hydrate(&options, Counter { count: 9 }).count, 9);
    }

    #[test]
    fn hydrate_arc_keeps_default_reference() {
        let options = PersistOptions::new("missing", Arc::new(MemoryStorage::new()));
        let default = Arc::new(Counter { count: 1 });

        let hydrated = hydrate_arc(&options, Arc::clone(&default));

        assert!(Arc::ptr_eq(&hydrated, &default));
    }

    #[test]
    fn hydrate_falls_back_when_backend_fails() {
        assert_eq!(
            hydrate(&broken(WriteFailure::Veto), Counter { count: 2 }).count,
            2
        );
    }

    #[test]
    fn write_failure_ignored_keeps_value() {
        let store = Store::new(
            Counter { count: 0 },
            vec![persist(broken(WriteFailure::IgnoreAndLog))],
        );

        store.set(Counter { count: 1 }).unwrap();

        assert_eq!(store.get().count, 1);
    }

    #[test]
    fn write_failure_veto_keeps_previous() {
        let store = Store::new(Counter { count: 0 }, vec![persist(broken(WriteFailure::Veto))]);

        let outcome = store.set(Counter { count: 1 }).unwrap();

        assert!(!outcome.is_changed());
        assert_eq!(store.get().count, 0);
    }

    #[test]
    fn write_failure_propagates() {
        let store = Store::new(
            Counter { count: 0 },
            vec![persist(broken(WriteFailure::Propagate))],
        );

        let err = store.set(Counter { count: 1 }).unwrap_err();

        match err {
            StoreError::Middleware(e) => {
                assert_eq!(e.middleware, "persist:counter");
                assert!(matches!(e.source, MiddlewareError::Persist(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.get().count, 0);
    }

    #[test]
    fn binary_codec_roundtrips_through_store() {
        let storage = Arc::new(MemoryStorage::new());
        let options = PersistOptions::new("counter", storage).codec(Codec::Binary);
        let store = Store::new(Counter { count: 0 }, vec![persist(options.clone())]);

        store.update(|c| Counter { count: c.count + 5 }).unwrap();

        assert_eq!(hydrate(&options, Counter { count: 0 }).count, 5);
    }
}
