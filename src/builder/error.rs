//! Build errors for store builders.

use crate::persist::PersistError;
use thiserror::Error;

/// Errors that can occur when building stores.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Persistence already configured for key '{0}'. Call .persist() once")]
    DuplicatePersistence(String),

    #[error("Persistence setup failed: {0}")]
    PersistenceSetup(#[source] PersistError),
}
