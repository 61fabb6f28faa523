//! Store error types.

use super::id::StoreId;
use crate::core::PipelineError;
use thiserror::Error;

/// Errors returned by store updates.
///
/// Every variant guarantees the store's current value was left untouched
/// and no subscriber was notified.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The updater function failed before a value was proposed.
    #[error("updater failed: {0}")]
    Updater(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A middleware failed during the pipeline fold.
    #[error(transparent)]
    Middleware(#[from] PipelineError),

    /// An update was requested from inside an update of the same store
    /// (from an updater, a middleware or a subscriber).
    #[error("re-entrant update on store {store}")]
    Reentrant { store: StoreId },
}
