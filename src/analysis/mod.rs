//! Drift analysis: signal extraction, follow-up tracking, and scoring.

pub mod followups;
pub mod scoring;
pub mod signals;

pub use followups::{open_followups, TELEMETRY_FOLLOWUP_CAP};
pub use scoring::{evaluate_task, recovery_task_id, Evaluation};
pub use signals::{scan_signals, DriftSignal, SignalScan, DRIFT_PREFIXES};
