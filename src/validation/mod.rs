//! Rule-based validation middleware.
//!
//! This module builds middleware from validation checks using Stillwater's
//! `Validation` type to accumulate ALL violations instead of stopping at the
//! first one, then applies a single [`ViolationStrategy`] to the result.
//!
//! Note that a veto here is local to this middleware's position: the
//! previous value becomes the candidate for the rest of the chain, which
//! may still transform it.
//!
//! # Example
//!
//! ```rust
//! use mindstore::create_store;
//! use mindstore::validation::{TransitionContext, ValidationBuilder, ViolationStrategy};
//!
//! #[derive(Debug)]
//! struct Volume {
//!     level: u8,
//! }
//!
//! let clamp = ValidationBuilder::new()
//!     .require_pred(
//!         |ctx: &TransitionContext<'_, Volume>| ctx.proposed.level <= 100,
//!         "volume above 100".to_string(),
//!     )
//!     .on_violation(ViolationStrategy::Veto)
//!     .middleware();
//!
//! let store = create_store(Volume { level: 50 }, vec![clamp]);
//! store.set(Volume { level: 120 }).unwrap();
//! assert_eq!(store.get().level, 50);
//! ```

pub mod builder;
pub mod context;
pub mod rules;
pub mod violations;

// Re-export commonly used types
pub use builder::ValidationBuilder;
pub use context::TransitionContext;
pub use rules::ValidationRules;
pub use violations::{ViolationError, ViolationStrategy};
