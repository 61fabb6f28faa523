//! Core transition types and logic.
//!
//! This module contains the pure functional core of the store:
//! - Middleware: `(previous, proposed) -> effective` interceptors
//! - The pipeline that left-folds a middleware chain
//!
//! Nothing in this module owns state. The store in [`crate::store`] is the
//! imperative shell that applies the pipeline's result.

mod error;
mod middleware;
pub mod pipeline;

pub use error::{MiddlewareError, PipelineError};
pub use middleware::Middleware;
pub use pipeline::{Pipeline, Step};
