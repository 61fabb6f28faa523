//! Left-fold composition of a middleware chain.
//!
//! Every middleware sees the ORIGINAL previous value and the candidate as
//! transformed by everything before it. A veto is not final: the vetoed
//! value becomes the next middleware's proposal and may still be
//! transformed further down the chain.

use super::error::PipelineError;
use super::middleware::Middleware;
use std::sync::Arc;
use tracing::trace;

/// What a single middleware did to the candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Returned the candidate it was given.
    Pass,
    /// Returned the pre-transition value.
    Veto,
    /// Returned some other value.
    Transform,
}

impl Step {
    fn classify<T>(previous: &Arc<T>, input: &Arc<T>, output: &Arc<T>) -> Self {
        if Arc::ptr_eq(output, input) {
            Step::Pass
        } else if Arc::ptr_eq(output, previous) {
            Step::Veto
        } else {
            Step::Transform
        }
    }
}

/// Fold `proposed` through `chain` in order.
///
/// An empty chain is the identity on `proposed`. The first failing
/// middleware stops the fold.
pub fn run<T>(
    chain: &[Middleware<T>],
    previous: &Arc<T>,
    proposed: Arc<T>,
) -> Result<Arc<T>, PipelineError> {
    chain
        .iter()
        .enumerate()
        .try_fold(proposed, |acc, (index, middleware)| {
            let input = Arc::clone(&acc);
            let output = middleware
                .apply(previous, acc)
                .map_err(|source| PipelineError {
                    middleware: middleware.name().to_string(),
                    index,
                    source,
                })?;
            trace!(
                middleware = middleware.name(),
                index,
                step = ?Step::classify(previous, &input, &output),
                "middleware applied"
            );
            Ok(output)
        })
}

/// An immutable, ordered middleware chain.
pub struct Pipeline<T> {
    chain: Vec<Middleware<T>>,
}

impl<T> Pipeline<T> {
    pub fn new(chain: Vec<Middleware<T>>) -> Self {
        Self { chain }
    }

    /// Run a transition through the chain. See [`run`].
    pub fn run(&self, previous: &Arc<T>, proposed: Arc<T>) -> Result<Arc<T>, PipelineError> {
        run(&self.chain, previous, proposed)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Middleware names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.chain.iter().map(Middleware::name).collect()
    }
}

impl<T> Default for Pipeline<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> Clone for Pipeline<T> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("chain", &self.names())
            .finish()
    }
}
