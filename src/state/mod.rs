//! Persisted per-task automation state.
//!
//! Read before policy evaluation, folded forward after, written back by the
//! caller. Concurrent invocations against the same persisted state are a
//! race (last-writer-wins); callers needing multi-invocation safety must
//! serialize externally.

pub mod store;

pub use store::JsonStateStore;

use chrono::{DateTime, Duration, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::Telemetry;
use crate::policy::PolicyDecision;
use crate::time::{format_ts, parse_ts};

/// Automation history for a single task. Created on first evaluation,
/// updated every evaluation, never deleted automatically.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskAutomationState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_check_ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_signal_ts: Option<String>,
    pub drift_signal_count: usize,
    pub open_followup_ids: Vec<String>,
    /// Rolling window of action timestamps, pruned to 24h retention.
    pub auto_action_timestamps: Vec<String>,
    /// Cumulative lifetime action count; drives the circuit breaker.
    pub auto_action_total: u64,
    /// Breaker flag as observed at the last decision.
    pub circuit_breaker_open: bool,
}

impl TaskAutomationState {
    /// Previous latest signal timestamp, parsed. Unparseable values read as
    /// absent, so every current signal counts as new.
    pub fn previous_latest_signal_ts(&self) -> Option<DateTime<Utc>> {
        self.latest_signal_ts.as_deref().and_then(parse_ts)
    }
}

/// The whole persisted automation state, keyed by task id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationState {
    pub tasks: FxHashMap<String, TaskAutomationState>,
}

impl AutomationState {
    /// Per-task state, cloned; missing entries start empty.
    pub fn task(&self, task_id: &str) -> TaskAutomationState {
        self.tasks.get(task_id).cloned().unwrap_or_default()
    }

    /// Fold the current evaluation back into the persisted state.
    ///
    /// Moves the latest-signal timestamp forward only, replaces the stored
    /// follow-up set, prunes action timestamps to the 24-hour window, and
    /// appends/increments when an action was actually taken.
    pub fn apply(
        &mut self,
        task_id: &str,
        telemetry: &Telemetry,
        decision: &PolicyDecision,
        action_created: bool,
        now: DateTime<Utc>,
    ) {
        let cur = self.tasks.entry(task_id.to_string()).or_default();

        cur.last_check_ts = Some(format_ts(&now));

        if let Some(latest) = telemetry.latest_signal_ts.as_deref().and_then(parse_ts) {
            let stored = cur.latest_signal_ts.as_deref().and_then(parse_ts);
            if stored.map_or(true, |s| latest > s) {
                cur.latest_signal_ts = Some(format_ts(&latest));
            }
        }

        cur.drift_signal_count = telemetry.drift_signal_count;
        cur.open_followup_ids = telemetry.open_followup_ids.clone();

        let day_ago = now - Duration::hours(24);
        cur.auto_action_timestamps
            .retain(|raw| parse_ts(raw).map_or(false, |ts| ts >= day_ago));
        if action_created {
            cur.auto_action_timestamps.push(format_ts(&now));
            cur.auto_action_total += 1;
        }

        cur.circuit_breaker_open = decision.circuit_breaker_open;
    }
}
