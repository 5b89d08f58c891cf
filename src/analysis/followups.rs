//! Follow-up tracker: open drift follow-up tasks blocked by a subject task.

use rustc_hash::FxHashMap;

use crate::model::TaskRecord;

/// Maximum follow-up ids carried in telemetry. The full set still drives
/// the `open_drift_followups` count.
pub const TELEMETRY_FOLLOWUP_CAP: usize = 50;

/// Find open or in-progress tasks that are blocked by `subject_id` and whose
/// id starts with one of the configured follow-up prefixes.
///
/// The subject task itself is excluded. The result is sorted and
/// de-duplicated so set comparisons against persisted state are stable.
pub fn open_followups(
    tasks: &FxHashMap<String, TaskRecord>,
    subject_id: &str,
    prefixes: &[String],
) -> Vec<String> {
    let mut ids: Vec<String> = tasks
        .values()
        .filter(|t| !t.id.is_empty() && t.id != subject_id)
        .filter(|t| t.status.is_active())
        .filter(|t| t.blocked_by.iter().any(|b| b == subject_id))
        .filter(|t| prefixes.iter().any(|p| t.id.starts_with(p.as_str())))
        .map(|t| t.id.clone())
        .collect();
    ids.sort();
    ids.dedup();
    ids
}
