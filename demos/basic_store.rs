//! Basic Store
//!
//! This example demonstrates a counter store with middleware, subscribers
//! and a memoized selector.
//!
//! Key concepts:
//! - Middleware folded left to right over `(previous, proposed)`
//! - Subscribers notified once per effective change, in registration order
//! - Reference-equality no-ops (returning the current `Arc` changes nothing)
//! - Selectors recomputed only when the store's reference changes
//!
//! Run with: cargo run --example basic_store

use mindstore::logging::logger;
use mindstore::{create_store, Middleware, Selector};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Counter {
    count: i64,
}

fn main() {
    println!("=== Basic Store Example ===\n");

    // Clamp negative counts back to zero
    let floor = Middleware::new(|_prev: &Arc<Counter>, next: Arc<Counter>| {
        if next.count < 0 {
            Arc::new(Counter { count: 0 })
        } else {
            next
        }
    })
    .named("floor");

    let store = create_store(Counter { count: 0 }, vec![floor, logger("counter")]);
    println!("Created store {} with chain {:?}", store.id(), store.pipeline().names());

    let _sub = store.subscribe(|value| println!("  [Subscriber] count = {}", value.count));

    // Example 1: plain updates
    println!("\nExample 1: Incrementing three times");
    for _ in 0..3 {
        store.update(|c| Counter { count: c.count + 1 }).unwrap();
    }

    // Example 2: the floor middleware catches a negative proposal
    println!("\nExample 2: Decrementing by 10");
    store.update(|c| Counter { count: c.count - 10 }).unwrap();
    println!("  Count after floor: {}", store.get().count);

    // Example 3: returning the current reference is a no-op
    println!("\nExample 3: No-op update");
    let outcome = store.replace_with(Arc::clone).unwrap();
    println!("  Changed: {} (no subscriber output above)", outcome.is_changed());

    // Example 4: memoized selector
    println!("\nExample 4: Memoized selector");
    let runs = Arc::new(AtomicUsize::new(0));
    let counted = runs.clone();
    let doubled = Selector::new(move |c: &Counter| {
        counted.fetch_add(1, Ordering::SeqCst);
        c.count * 2
    });

    store.set(Counter { count: 21 }).unwrap();
    for _ in 0..3 {
        println!("  doubled = {}", store.select(&doubled));
    }
    println!("  Projection ran {} time(s)", runs.load(Ordering::SeqCst));

    println!("\nFinal version: {}", store.version());
}
