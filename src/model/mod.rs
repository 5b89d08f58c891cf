//! Data model: task records, findings, telemetry, and reports.

pub mod finding;
pub mod report;
pub mod task;
pub mod telemetry;

pub use finding::{Finding, FindingKind, Score, Severity};
pub use report::{DriftReport, Recommendation};
pub use task::{LogEntry, TaskRecord, TaskStatus};
pub use telemetry::Telemetry;
