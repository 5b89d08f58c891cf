//! Auto-action safety policy — cooldown, hourly budget, circuit breaker,
//! and new-evidence gating for the self-healing loop.

pub mod engine;
pub mod types;

pub use engine::evaluate_policy;
pub use types::{PolicyDecision, PolicyReason};
