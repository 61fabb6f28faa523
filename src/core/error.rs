//! Errors raised while running the transition pipeline.

use crate::persist::PersistError;
use crate::validation::ViolationError;
use thiserror::Error;

/// Failure reported by a single middleware.
///
/// Middleware are total by contract; the fallible form exists so that a
/// middleware which cannot honour its contract (a failed durable write, a
/// broken invariant) can surface that as a value instead of panicking.
#[derive(Debug, Error)]
pub enum MiddlewareError {
    #[error("transition rejected: {0}")]
    Rejected(String),

    #[error("{} validation rule(s) failed", .0.len())]
    Violations(Vec<ViolationError>),

    #[error(transparent)]
    Persist(#[from] PersistError),
}

/// A middleware failed mid-fold. Nothing after `index` ran.
#[derive(Debug, Error)]
#[error("middleware '{middleware}' (position {index}) failed: {source}")]
pub struct PipelineError {
    pub middleware: String,
    pub index: usize,
    #[source]
    pub source: MiddlewareError,
}
