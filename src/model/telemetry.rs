//! Derived facts for one evaluation.

use serde::{Deserialize, Serialize};

/// Telemetry computed by the signal extractor and follow-up tracker.
///
/// `open_followup_ids` is capped at 50 entries for size control;
/// `open_drift_followups` always reflects the full set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Telemetry {
    pub drift_signal_count: usize,
    pub new_signal_count: usize,
    pub ignored_self_signals: usize,
    pub open_drift_followups: usize,
    pub open_followup_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_signal_ts: Option<String>,
    pub recovery_task_exists: bool,
}
