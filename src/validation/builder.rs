//! Builder API for creating validation rules.

use crate::core::Middleware;
use crate::validation::context::TransitionContext;
use crate::validation::rules::{ValidationCheck, ValidationRules};
use crate::validation::violations::{ViolationError, ViolationStrategy};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for creating validation rules
pub struct ValidationBuilder<T> {
    checks: Vec<ValidationCheck<T>>,
    on_violation: ViolationStrategy,
}

impl<T> ValidationBuilder<T> {
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            on_violation: ViolationStrategy::Veto,
        }
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&TransitionContext<'_, T>) -> Validation<(), NonEmptyVec<ViolationError>>
            + Send
            + Sync
            + 'static,
    {
        self.checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&TransitionContext<'_, T>) -> bool + Send + Sync + 'static,
    {
        let check = move |ctx: &TransitionContext<'_, T>| {
            if predicate(ctx) {
                Validation::success(())
            } else {
                Validation::fail(ViolationError::CustomCheckFailed {
                    message: error_msg.clone(),
                })
            }
        };
        self.checks.push(Box::new(check));
        self
    }

    /// Check a single projected field of the candidate
    pub fn require_field<V, P, F>(mut self, field: &str, project: P, valid: F, reason: &str) -> Self
    where
        P: Fn(&T) -> &V + Send + Sync + 'static,
        F: Fn(&V) -> bool + Send + Sync + 'static,
        V: ?Sized,
    {
        let field = field.to_string();
        let reason = reason.to_string();
        let check = move |ctx: &TransitionContext<'_, T>| {
            if valid(project(ctx.proposed)) {
                Validation::success(())
            } else {
                Validation::fail(ViolationError::InvalidField {
                    field: field.clone(),
                    reason: reason.clone(),
                })
            }
        };
        self.checks.push(Box::new(check));
        self
    }

    /// Set violation handling strategy
    pub fn on_violation(mut self, strategy: ViolationStrategy) -> Self {
        self.on_violation = strategy;
        self
    }

    /// Build the validation rules
    pub fn build(self) -> ValidationRules<T> {
        ValidationRules {
            checks: self.checks,
            on_violation: self.on_violation,
        }
    }
}

impl<T: Send + Sync + 'static> ValidationBuilder<T> {
    /// Build the rules straight into a middleware
    pub fn middleware(self) -> Middleware<T> {
        self.build().into_middleware()
    }
}

impl<T> Default for ValidationBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Form {
        email: String,
        age: u32,
    }

    #[test]
    fn field_checks_report_field_name() {
        let rules = ValidationBuilder::new()
            .require_field(
                "email",
                |f: &Form| f.email.as_str(),
                |e: &str| e.contains('@'),
                "must contain @",
            )
            .require_field("age", |f: &Form| &f.age, |a: &u32| *a >= 18, "must be adult")
            .build();
        let previous = Form {
            email: "a@b.c".to_string(),
            age: 30,
        };
        let proposed = Form {
            email: "nope".to_string(),
            age: 30,
        };

        let result = rules.enforce(&TransitionContext {
            previous: &previous,
            proposed: &proposed,
        });

        match result {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors.iter().any(|e| matches!(
                    e,
                    ViolationError::InvalidField { field, .. } if field == "email"
                )));
            }
            Validation::Success(_) => panic!("Expected failure"),
        }
    }

    #[test]
    fn default_strategy_is_veto() {
        let rules: ValidationRules<Form> = ValidationBuilder::default().build();
        assert_eq!(rules.violation_strategy(), ViolationStrategy::Veto);
    }

    #[test]
    fn checks_are_counted() {
        let rules: ValidationRules<Form> = ValidationBuilder::new()
            .require_pred(|_ctx| true, "always passes".to_string())
            .require_pred(|_ctx| true, "also passes".to_string())
            .build();
        assert_eq!(rules.len(), 2);
    }
}
