//! Context provided to validation checks.

/// The transition being validated.
#[derive(Debug)]
pub struct TransitionContext<'a, T> {
    /// Value the store held before the transition
    pub previous: &'a T,
    /// Candidate as handed to this middleware
    pub proposed: &'a T,
}

impl<T> Clone for TransitionContext<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TransitionContext<'_, T> {}
