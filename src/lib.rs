//! Drift-Watch: task drift evaluation and auto-remediation safety.
//!
//! Scans a task's event log for drift signals, tracks open drift follow-up
//! tasks, scores the result into findings, and runs the auto-action safety
//! policy — a per-task rate limiter and circuit breaker that keeps the
//! self-healing loop from re-triggering itself indefinitely.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod errors;
pub mod model;
pub mod policy;
pub mod state;
pub mod store;
pub mod time;
pub mod trace;

pub use analysis::{evaluate_task, Evaluation};
pub use config::{extract_spec_block, WatchSpec};
pub use engine::{CheckEngine, CheckOptions};
pub use errors::{SpecError, StoreError, WatchError};
pub use model::{
    DriftReport, Finding, FindingKind, LogEntry, Recommendation, Score, Severity, TaskRecord,
    TaskStatus, Telemetry,
};
pub use policy::{evaluate_policy, PolicyDecision, PolicyReason};
pub use state::{AutomationState, JsonStateStore, TaskAutomationState};
pub use store::{ActionSink, FollowupRequest, LogSink, TaskStore};
