//! Validation rules for transitions using Validation.

use crate::core::{Middleware, MiddlewareError};
use crate::validation::context::TransitionContext;
use crate::validation::violations::{ViolationError, ViolationStrategy};
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use tracing::{debug, warn};

/// Type alias for validation check functions
pub type ValidationCheck<T> = Box<
    dyn Fn(&TransitionContext<'_, T>) -> Validation<(), NonEmptyVec<ViolationError>> + Send + Sync,
>;

/// Validation rules for transitions.
/// Uses Validation to accumulate ALL violations.
pub struct ValidationRules<T> {
    pub(crate) checks: Vec<ValidationCheck<T>>,
    pub(crate) on_violation: ViolationStrategy,
}

impl<T> ValidationRules<T> {
    /// Run every check, accumulating ALL violations.
    /// Returns Validation::Success(()) if all checks pass.
    /// Returns Validation::Failure with ALL violations if any fail.
    pub fn enforce(
        &self,
        context: &TransitionContext<'_, T>,
    ) -> Validation<(), NonEmptyVec<ViolationError>> {
        let checks: Vec<Validation<(), NonEmptyVec<ViolationError>>> =
            self.checks.iter().map(|check| check(context)).collect();

        Validation::all_vec(checks).map(|_| ())
    }

    pub fn violation_strategy(&self) -> ViolationStrategy {
        self.on_violation
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl<T: Send + Sync + 'static> ValidationRules<T> {
    /// Turn the rules into a middleware.
    ///
    /// Checks see the store's previous value and the candidate as it
    /// arrives at this middleware's position in the chain.
    pub fn into_middleware(self) -> Middleware<T> {
        let rules = Arc::new(self);
        Middleware::try_new(move |previous: &Arc<T>, proposed: Arc<T>| {
            let context = TransitionContext {
                previous: &**previous,
                proposed: &*proposed,
            };
            let errors = match rules.enforce(&context) {
                Validation::Success(_) => return Ok(proposed),
                Validation::Failure(errors) => errors,
            };
            let violations: Vec<ViolationError> = errors.iter().cloned().collect();

            match rules.on_violation {
                ViolationStrategy::Veto => {
                    debug!(violations = violations.len(), "transition vetoed by validation");
                    Ok(Arc::clone(previous))
                }
                ViolationStrategy::IgnoreAndLog => {
                    for violation in &violations {
                        warn!(%violation, "validation failed, transition allowed");
                    }
                    Ok(proposed)
                }
                ViolationStrategy::Propagate => Err(MiddlewareError::Violations(violations)),
            }
        })
        .named("validation")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Store, StoreError};
    use crate::validation::builder::ValidationBuilder;

    #[derive(Debug, Clone, PartialEq)]
    struct Account {
        owner: String,
        balance: i64,
    }

    fn account(owner: &str, balance: i64) -> Account {
        Account {
            owner: owner.to_string(),
            balance,
        }
    }

    fn rules(strategy: ViolationStrategy) -> ValidationRules<Account> {
        ValidationBuilder::new()
            .require_pred(
                |ctx: &TransitionContext<'_, Account>| ctx.proposed.balance >= 0,
                "balance must not be negative".to_string(),
            )
            .require_pred(
                |ctx: &TransitionContext<'_, Account>| !ctx.proposed.owner.is_empty(),
                "owner is required".to_string(),
            )
            .on_violation(strategy)
            .build()
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let rules = rules(ViolationStrategy::Veto);
        let previous = account("ada", 10);
        let proposed = account("", -5);
        let context = TransitionContext {
            previous: &previous,
            proposed: &proposed,
        };

        match rules.enforce(&context) {
            Validation::Failure(errors) => assert_eq!(errors.len(), 2),
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn validation_succeeds_when_all_checks_pass() {
        let rules = rules(ViolationStrategy::Veto);
        let previous = account("ada", 10);
        let proposed = account("ada", 3);
        let context = TransitionContext {
            previous: &previous,
            proposed: &proposed,
        };

        assert!(rules.enforce(&context).is_success());
    }

    #[test]
    fn checks_can_compare_against_previous() {
        let rules = ValidationBuilder::new()
            .require(|ctx: &TransitionContext<'_, Account>| {
                if ctx.proposed.owner == ctx.previous.owner {
                    Validation::success(())
                } else {
                    Validation::fail(ViolationError::InvalidField {
                        field: "owner".to_string(),
                        reason: "cannot change".to_string(),
                    })
                }
            })
            .build();
        let previous = account("ada", 10);
        let proposed = account("bob", 10);

        let result = rules.enforce(&TransitionContext {
            previous: &previous,
            proposed: &proposed,
        });

        assert!(result.is_failure());
    }

    #[test]
    fn veto_strategy_keeps_previous_value() {
        let store = Store::new(
            account("ada", 10),
            vec![rules(ViolationStrategy::Veto).into_middleware()],
        );

        let outcome = store.set(account("ada", -1)).unwrap();

        assert!(!outcome.is_changed());
        assert_eq!(store.get().balance, 10);
    }

    #[test]
    fn propagate_strategy_reports_every_violation() {
        let store = Store::new(
            account("ada", 10),
            vec![rules(ViolationStrategy::Propagate).into_middleware()],
        );

        let err = store.set(account("", -1)).unwrap_err();

        match err {
            StoreError::Middleware(e) => match e.source {
                MiddlewareError::Violations(violations) => {
                    assert_eq!(violations.len(), 2);
                    assert!(violations
                        .iter()
                        .all(|v| matches!(v, ViolationError::CustomCheckFailed { .. })));
                }
                other => panic!("unexpected middleware error: {other:?}"),
            },
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.get().balance, 10);
    }

    #[test]
    fn ignore_strategy_lets_value_through() {
        let store = Store::new(
            account("ada", 10),
            vec![rules(ViolationStrategy::IgnoreAndLog).into_middleware()],
        );

        store.set(account("ada", -1)).unwrap();

        assert_eq!(store.get().balance, -1);
    }

    #[test]
    fn violation_strategy_is_stored() {
        let rules: ValidationRules<Account> = ValidationBuilder::new()
            .on_violation(ViolationStrategy::Propagate)
            .build();

        assert_eq!(rules.violation_strategy(), ViolationStrategy::Propagate);
        assert!(rules.is_empty());
    }
}
