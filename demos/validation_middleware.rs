//! Validation Middleware
//!
//! This example demonstrates rule-based validation in a store's chain.
//!
//! Key concepts:
//! - Validation over Result for comprehensive error reporting
//! - Field checks and custom predicates over previous and proposed values
//! - Violation strategies (Veto, Propagate, IgnoreAndLog)
//!
//! Run with: cargo run --example validation_middleware

use mindstore::validation::{TransitionContext, ValidationBuilder, ViolationStrategy};
use mindstore::{create_store, MiddlewareError, StoreError};

#[derive(Debug, Clone)]
struct Account {
    owner: String,
    balance: i64,
}

fn rules(strategy: ViolationStrategy) -> ValidationBuilder<Account> {
    ValidationBuilder::new()
        .require_field(
            "owner",
            |a: &Account| &a.owner,
            |owner: &String| !owner.is_empty(),
            "owner must not be empty",
        )
        .require_pred(
            |ctx: &TransitionContext<'_, Account>| ctx.proposed.balance >= 0,
            "balance must not go negative".to_string(),
        )
        .require_pred(
            |ctx: &TransitionContext<'_, Account>| {
                (ctx.proposed.balance - ctx.previous.balance).abs() <= 1_000
            },
            "single change limited to 1000".to_string(),
        )
        .on_violation(strategy)
}

fn account(owner: &str, balance: i64) -> Account {
    Account {
        owner: owner.to_string(),
        balance,
    }
}

fn main() {
    println!("=== Validation Middleware Example ===\n");

    // Example 1: Veto keeps the previous value
    println!("Example 1: Veto strategy");
    let store = create_store(account("ada", 100), vec![rules(ViolationStrategy::Veto).middleware()]);
    store.set(account("ada", 250)).unwrap();
    println!("  Deposit accepted: balance = {}", store.get().balance);
    let outcome = store.set(account("ada", -50)).unwrap();
    println!(
        "  Overdraft vetoed: changed = {}, balance = {}\n",
        outcome.is_changed(),
        store.get().balance
    );

    // Example 2: Propagate reports every violation at once
    println!("Example 2: Propagate strategy");
    let store = create_store(
        account("ada", 100),
        vec![rules(ViolationStrategy::Propagate).middleware()],
    );
    match store.set(account("", -5_000)) {
        Err(StoreError::Middleware(err)) => {
            println!("  Rejected by '{}':", err.middleware);
            if let MiddlewareError::Violations(violations) = &err.source {
                for violation in violations {
                    println!("    - {}", violation);
                }
            }
        }
        other => println!("  Unexpected outcome: {:?}", other.map(|o| o.is_changed())),
    }
    println!("  Balance unchanged: {}\n", store.get().balance);

    // Example 3: IgnoreAndLog lets the value through
    println!("Example 3: IgnoreAndLog strategy");
    let store = create_store(
        account("ada", 100),
        vec![rules(ViolationStrategy::IgnoreAndLog).middleware()],
    );
    store.set(account("ada", 5_000)).unwrap();
    println!("  Large change logged but kept: balance = {}", store.get().balance);
}
