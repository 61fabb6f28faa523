//! The state container.

use super::error::StoreError;
use super::id::StoreId;
use super::subscription::{Registry, Subscription};
use crate::core::{Middleware, Pipeline};
use crate::selector::Selector;
use parking_lot::{ReentrantMutex, RwLock};
use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Result of an update request.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The pipeline produced a new reference; subscribers were notified.
    Changed(Arc<T>),
    /// The pipeline returned the current reference; nothing happened.
    Unchanged,
}

impl<T> Outcome<T> {
    pub fn is_changed(&self) -> bool {
        matches!(self, Outcome::Changed(_))
    }
}

struct StoreInner<T> {
    id: StoreId,
    current: RwLock<Arc<T>>,
    version: AtomicU64,
    pipeline: Pipeline<T>,
    subscribers: Arc<Registry<T>>,
    /// Serializes transitions across threads. The flag is set while a
    /// transition runs and catches same-thread re-entry.
    gate: ReentrantMutex<Cell<bool>>,
}

/// A single typed value, updated atomically through a middleware pipeline.
///
/// Values are held as `Arc<T>` and compared by reference: an update that
/// ends with the same `Arc` the store already holds is a no-op and notifies
/// nobody. Cloning a `Store` yields another handle to the same container.
///
/// Re-entrant updates (an updater, middleware or subscriber calling back
/// into the same store while a transition is running) are rejected with
/// [`StoreError::Reentrant`]. Updates from other threads wait for the
/// running transition, including its notifications, to finish.
///
/// # Example
///
/// ```rust
/// use mindstore::create_store;
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// #[derive(Debug)]
/// struct Counter {
///     count: i64,
/// }
///
/// let store = create_store(Counter { count: 0 }, Vec::new());
/// let notified = Arc::new(AtomicUsize::new(0));
/// let seen = notified.clone();
/// let _sub = store.subscribe(move |_| {
///     seen.fetch_add(1, Ordering::SeqCst);
/// });
///
/// store.update(|s| Counter { count: s.count + 1 }).unwrap();
///
/// assert_eq!(store.get().count, 1);
/// assert_eq!(notified.load(Ordering::SeqCst), 1);
/// ```
pub struct Store<T> {
    inner: Arc<StoreInner<T>>,
}

impl<T: Send + Sync + 'static> Store<T> {
    /// Create a store holding `initial`, with a fixed middleware chain.
    pub fn new(initial: T, middleware: Vec<Middleware<T>>) -> Self {
        Self::from_arc(Arc::new(initial), middleware)
    }

    /// Create a store from an already shared initial value.
    ///
    /// `get()` returns this exact reference until the first change.
    pub fn from_arc(initial: Arc<T>, middleware: Vec<Middleware<T>>) -> Self {
        let pipeline = Pipeline::new(middleware);
        let id = StoreId::new();
        debug!(store = %id, middleware = ?pipeline.names(), "store created");
        Self {
            inner: Arc::new(StoreInner {
                id,
                current: RwLock::new(initial),
                version: AtomicU64::new(0),
                pipeline,
                subscribers: Arc::new(Registry::new()),
                gate: ReentrantMutex::new(Cell::new(false)),
            }),
        }
    }

    pub fn id(&self) -> StoreId {
        self.inner.id
    }

    /// Current value. Always a complete snapshot.
    pub fn get(&self) -> Arc<T> {
        Arc::clone(&*self.inner.current.read())
    }

    /// Borrow the current value for the duration of `f`.
    ///
    /// No lock is held while `f` runs.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let current = self.get();
        f(&*current)
    }

    /// Number of effective changes since creation.
    pub fn version(&self) -> u64 {
        self.inner.version.load(Ordering::Acquire)
    }

    pub fn pipeline(&self) -> &Pipeline<T> {
        &self.inner.pipeline
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    /// Propose `next` as the new value.
    ///
    /// Passing the `Arc` the store already holds (with a chain that keeps
    /// it) is a no-op.
    pub fn set(&self, next: impl Into<Arc<T>>) -> Result<Outcome<T>, StoreError> {
        let next = next.into();
        self.transition(move |_| Ok(next))
    }

    /// Propose a value computed from the current one.
    pub fn update<F>(&self, f: F) -> Result<Outcome<T>, StoreError>
    where
        F: FnOnce(&T) -> T,
    {
        self.transition(|current| Ok(Arc::new(f(&**current))))
    }

    /// Like [`update`](Self::update), but the updater sees the shared
    /// reference and may return it unchanged.
    pub fn replace_with<F>(&self, f: F) -> Result<Outcome<T>, StoreError>
    where
        F: FnOnce(&Arc<T>) -> Arc<T>,
    {
        self.transition(|current| Ok(f(current)))
    }

    /// Propose a value from a fallible updater.
    ///
    /// If the updater fails the store is untouched and the error is
    /// returned as [`StoreError::Updater`].
    pub fn try_update<F, E>(&self, f: F) -> Result<Outcome<T>, StoreError>
    where
        F: FnOnce(&Arc<T>) -> Result<Arc<T>, E>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        self.transition(|current| f(current).map_err(|e| StoreError::Updater(e.into())))
    }

    /// Register a callback run after every effective change, in
    /// registration order.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Arc<T>) + Send + Sync + 'static,
    {
        let id = self.inner.subscribers.insert(Arc::new(callback));
        trace!(store = %self.inner.id, subscriber = id, "subscribed");
        Subscription::new(id, &self.inner.subscribers)
    }

    /// Read a memoized projection of the current value.
    pub fn select<S>(&self, selector: &Selector<T, S>) -> Arc<S> {
        selector.select(self)
    }

    fn transition<F>(&self, resolve: F) -> Result<Outcome<T>, StoreError>
    where
        F: FnOnce(&Arc<T>) -> Result<Arc<T>, StoreError>,
    {
        let gate = self.inner.gate.lock();
        if gate.get() {
            debug!(store = %self.inner.id, "re-entrant update rejected");
            return Err(StoreError::Reentrant {
                store: self.inner.id,
            });
        }
        gate.set(true);
        let _running = scopeguard::guard(&*gate, |flag| flag.set(false));

        let previous = self.get();
        let proposed = resolve(&previous)?;
        let effective = self.inner.pipeline.run(&previous, proposed)?;

        if Arc::ptr_eq(&effective, &previous) {
            trace!(store = %self.inner.id, "transition produced no change");
            return Ok(Outcome::Unchanged);
        }

        *self.inner.current.write() = Arc::clone(&effective);
        let version = self.inner.version.fetch_add(1, Ordering::AcqRel) + 1;

        let subscribers = self.inner.subscribers.snapshot();
        debug!(
            store = %self.inner.id,
            version,
            subscribers = subscribers.len(),
            "state changed"
        );
        for callback in subscribers {
            callback(&effective);
        }

        Ok(Outcome::Changed(effective))
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.inner.id)
            .field("current", &*self.inner.current.read())
            .field("version", &self.inner.version.load(Ordering::Acquire))
            .field("pipeline", &self.inner.pipeline)
            .finish()
    }
}
