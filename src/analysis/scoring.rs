//! Finding and scoring engine.
//!
//! Deterministic pure function of (spec, task, all tasks, previous latest
//! signal timestamp). Each rule fires independently; multiple findings per
//! evaluation are normal.

use chrono::{DateTime, Utc};
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::json;

use super::followups::{open_followups, TELEMETRY_FOLLOWUP_CAP};
use super::signals::scan_signals;
use crate::config::WatchSpec;
use crate::model::{Finding, FindingKind, Recommendation, Score, TaskRecord, Telemetry};
use crate::time::format_ts;

/// Result of scoring one task.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub findings: Vec<Finding>,
    pub telemetry: Telemetry,
    pub score: Score,
    pub recommendations: Vec<Recommendation>,
}

/// Id of the recovery task that consolidates remediation for a drifting task.
///
/// Deliberately a fixed naming scheme, independent of the configured
/// `followup_prefixes`.
pub fn recovery_task_id(task_id: &str) -> String {
    format!("drift-therapy-{task_id}")
}

/// Score one task against its spec.
pub fn evaluate_task(
    spec: &WatchSpec,
    task: &TaskRecord,
    tasks: &FxHashMap<String, TaskRecord>,
    previous_latest_signal_ts: Option<DateTime<Utc>>,
) -> Evaluation {
    let scan = scan_signals(&task.log, &spec.ignore_signal_prefixes, previous_latest_signal_ts);
    let followup_ids = open_followups(tasks, &task.id, &spec.followup_prefixes);

    let recovery_id = recovery_task_id(&task.id);
    let recovery_task_exists = tasks
        .get(&recovery_id)
        .map_or(false, |t| t.status.counts_as_recovery());

    let telemetry = Telemetry {
        drift_signal_count: scan.signals.len(),
        new_signal_count: scan.new_count,
        ignored_self_signals: scan.ignored_self,
        open_drift_followups: followup_ids.len(),
        open_followup_ids: followup_ids
            .iter()
            .take(TELEMETRY_FOLLOWUP_CAP)
            .cloned()
            .collect(),
        latest_signal_ts: scan.latest_ts.as_ref().map(format_ts),
        recovery_task_exists,
    };

    let mut findings = Vec::new();

    if spec.schema != 1 {
        findings.push(Finding::warn(
            FindingKind::UnsupportedSchema,
            format!("Unsupported spec schema: {} (expected 1)", spec.schema),
        ));
    }

    if scan.signals.len() >= spec.min_signal_count {
        let tail = scan.signals.len().saturating_sub(5);
        let recent: Vec<&str> = scan.signals[tail..].iter().map(|s| s.message.as_str()).collect();
        findings.push(
            Finding::warn(
                FindingKind::RepeatedDriftSignals,
                format!(
                    "Task has repeated drift signals ({} >= {})",
                    scan.signals.len(),
                    spec.min_signal_count
                ),
            )
            .with_details(json!({ "recent_signals": recent })),
        );
    }

    if !followup_ids.is_empty() {
        let listed: Vec<&str> = followup_ids.iter().take(20).map(String::as_str).collect();
        findings.push(
            Finding::warn(
                FindingKind::UnresolvedDriftFollowups,
                format!(
                    "Task has unresolved drift follow-up tasks ({})",
                    followup_ids.len()
                ),
            )
            .with_details(json!({ "tasks": listed })),
        );
    }

    if spec.require_recovery_plan && !findings.is_empty() && !recovery_task_exists {
        findings.push(
            Finding::warn(
                FindingKind::MissingRecoveryPlan,
                "No recovery task exists for this drifting task",
            )
            .with_details(json!({ "expected_task_id": recovery_id })),
        );
    }

    let score = Score::from_findings(&findings);
    let recommendations = recommend(&findings, &recovery_task_id(&task.id));

    Evaluation {
        findings,
        telemetry,
        score,
        recommendations,
    }
}

/// Fixed 1:1 mapping from finding kind to remediation, de-duplicated by
/// action text in first-seen order.
pub fn recommend(findings: &[Finding], recovery_id: &str) -> Vec<Recommendation> {
    let mut out: Vec<Recommendation> = Vec::new();
    let mut seen: FxHashSet<String> = FxHashSet::default();

    for finding in findings {
        let rec = match finding.kind {
            FindingKind::RepeatedDriftSignals => Recommendation {
                priority: "high".to_string(),
                action: "Run a self-healing cycle: tighten touch scope and split hardening work"
                    .to_string(),
                rationale:
                    "Repeated drift signals indicate intent is not staying synchronized with execution."
                        .to_string(),
            },
            FindingKind::UnresolvedDriftFollowups => Recommendation {
                priority: "high".to_string(),
                action: "Resolve or re-scope open drift follow-up tasks before adding new scope"
                    .to_string(),
                rationale: "Stacking unresolved follow-ups compounds execution drift over time."
                    .to_string(),
            },
            FindingKind::MissingRecoveryPlan => Recommendation {
                priority: "high".to_string(),
                action: format!("Create and complete {recovery_id} to consolidate remediation"),
                rationale:
                    "A dedicated recovery lane prevents drift fixes from bloating the current task."
                        .to_string(),
            },
            FindingKind::UnsupportedSchema => Recommendation {
                priority: "high".to_string(),
                action: "Set spec schema = 1".to_string(),
                rationale: "Only schema v1 is currently supported.".to_string(),
            },
            FindingKind::InvalidSpec => Recommendation {
                priority: "high".to_string(),
                action: "Fix the spec block so it parses".to_string(),
                rationale: "Drift-watch can only guide self-healing when it can read the configuration."
                    .to_string(),
            },
        };
        if seen.insert(rec.action.clone()) {
            out.push(rec);
        }
    }

    out
}
