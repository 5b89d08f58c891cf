//! Check engine: orchestrates one evaluation end to end.
//!
//! Task lookup → spec extraction → scoring → policy → log write → optional
//! follow-up creation → state fold-back. State persistence stays with the
//! caller so the read-modify-write can be serialized externally.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::analysis::{evaluate_task, recovery_task_id, scoring::recommend};
use crate::config::{extract_spec_block, WatchSpec, FENCE_INFO};
use crate::errors::WatchError;
use crate::model::{DriftReport, Finding, FindingKind, Score};
use crate::state::AutomationState;
use crate::store::{ActionSink, FollowupRequest, LogSink, TaskStore};

/// Prefix of every summary line this system writes. The default
/// `ignore_signal_prefixes` must cover it, or the loop counts its own
/// output as drift.
pub const LOG_PREFIX: &str = "Therapydrift:";

/// Per-run switches, mirroring the caller-facing flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions {
    /// Append a summary line to the task's event log.
    pub write_log: bool,
    /// Create the recovery follow-up task when the policy allows.
    pub create_followups: bool,
}

/// Drift check orchestrator over the three collaborator capabilities.
pub struct CheckEngine<T, A, L>
where
    T: TaskStore,
    A: ActionSink,
    L: LogSink,
{
    tasks: T,
    actions: A,
    logs: L,
}

impl<T, A, L> CheckEngine<T, A, L>
where
    T: TaskStore,
    A: ActionSink,
    L: LogSink,
{
    pub fn new(tasks: T, actions: A, logs: L) -> Self {
        Self {
            tasks,
            actions,
            logs,
        }
    }

    pub fn tasks(&self) -> &T {
        &self.tasks
    }

    pub fn actions(&self) -> &A {
        &self.actions
    }

    pub fn logs(&self) -> &L {
        &self.logs
    }

    /// Run one check. The caller persists `state` afterwards; cooldown,
    /// budget, and breaker decisions on the next run depend on it.
    pub fn run(
        &mut self,
        state: &mut AutomationState,
        task_id: &str,
        now: DateTime<Utc>,
        options: CheckOptions,
    ) -> Result<DriftReport, WatchError> {
        let task = self
            .tasks
            .get_task(task_id)
            .ok_or_else(|| WatchError::TaskNotFound {
                id: task_id.to_string(),
            })?;
        let title = if task.title.is_empty() {
            task_id.to_string()
        } else {
            task.title.clone()
        };

        let Some(raw_block) = extract_spec_block(&task.description) else {
            // No spec block: nothing to evaluate, nothing to persist.
            return Ok(DriftReport {
                task_id: task_id.to_string(),
                task_title: title,
                score: Score::Green,
                spec: None,
                telemetry: None,
                findings: Vec::new(),
                recommendations: Vec::new(),
                policy: None,
            });
        };

        let spec = match WatchSpec::parse(&raw_block) {
            Ok(spec) => spec,
            Err(e) => {
                // Malformed block degrades to a warn finding; the policy is
                // not evaluated in this path.
                tracing::warn!(task = task_id, error = %e, "spec block unreadable");
                let findings = vec![Finding::warn(
                    FindingKind::InvalidSpec,
                    "Drift spec block present but could not be parsed",
                )];
                let recommendations = recommend(&findings, &recovery_task_id(task_id));
                let report = DriftReport {
                    task_id: task_id.to_string(),
                    task_title: title,
                    score: Score::Yellow,
                    spec: None,
                    telemetry: None,
                    findings,
                    recommendations,
                    policy: None,
                };
                if options.write_log {
                    self.logs.append_log(task_id, &summary_line(&report))?;
                }
                return Ok(report);
            }
        };

        let all_tasks = self.tasks.list_tasks();
        let prior = state.task(task_id);
        let evaluation = evaluate_task(
            &spec,
            &task,
            &all_tasks,
            prior.previous_latest_signal_ts(),
        );
        let decision = crate::policy::evaluate_policy(
            &spec,
            &evaluation.findings,
            &evaluation.telemetry,
            &prior,
            now,
        );

        let report = DriftReport {
            task_id: task_id.to_string(),
            task_title: title.clone(),
            score: evaluation.score,
            spec: Some(spec),
            telemetry: Some(evaluation.telemetry.clone()),
            findings: evaluation.findings,
            recommendations: evaluation.recommendations,
            policy: Some(decision.clone()),
        };

        if options.write_log {
            self.logs.append_log(task_id, &summary_line(&report))?;
        }

        let mut action_created = false;
        if options.create_followups && decision.allow_auto_action && !report.findings.is_empty() {
            let request = followup_request(task_id, &title, &report, &raw_block);
            self.actions.ensure_task(&request)?;
            action_created = true;
            tracing::info!(task = task_id, followup = %request.id, "recovery follow-up created");
        }

        state.apply(task_id, &evaluation.telemetry, &decision, action_created, now);

        Ok(report)
    }
}

/// Human-readable summary line appended to the task's event log.
fn summary_line(report: &DriftReport) -> String {
    if report.findings.is_empty() {
        return format!("{LOG_PREFIX} OK (no findings)");
    }
    let kinds: BTreeSet<&str> = report.findings.iter().map(|f| f.kind.as_str()).collect();
    let kinds = kinds.into_iter().collect::<Vec<_>>().join(", ");
    let mut line = format!("{LOG_PREFIX} {} ({kinds})", report.score.as_str());
    if let Some(rec) = report.recommendations.first() {
        let action = rec.action.trim();
        if !action.is_empty() {
            line.push_str(&format!(" | next: {action}"));
        }
    }
    line
}

/// Build the recovery follow-up request. The raw spec block is embedded so
/// the recovery task carries the same configuration as its origin.
fn followup_request(
    task_id: &str,
    task_title: &str,
    report: &DriftReport,
    raw_block: &str,
) -> FollowupRequest {
    let kinds: BTreeSet<&str> = report.findings.iter().map(|f| f.kind.as_str()).collect();
    let kinds = kinds.into_iter().collect::<Vec<_>>().join(", ");

    let mut action_lines: Vec<String> = report
        .recommendations
        .iter()
        .map(|r| format!("- {}", r.action.trim()))
        .filter(|l| l.len() > 2)
        .collect();
    if action_lines.is_empty() {
        action_lines.push("- Re-synchronize intent, scope, and open drift follow-up tasks.".to_string());
    }

    let description = format!(
        "Run a self-healing cycle for persistent drift signals.\n\n\
         Context:\n\
         - Origin task: {task_id}\n\
         - Findings: {kinds}\n\n\
         Recommended actions:\n{}\n\n\
         ```{FENCE_INFO}\n{}\n```\n",
        action_lines.join("\n"),
        raw_block.trim(),
    );

    FollowupRequest {
        id: recovery_task_id(task_id),
        title: format!("therapy: {task_title}"),
        description,
        blocked_by: vec![task_id.to_string()],
        tags: vec!["drift".to_string(), "therapy".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with(findings: Vec<Finding>, score: Score) -> DriftReport {
        let recommendations = recommend(&findings, "drift-therapy-t1");
        DriftReport {
            task_id: "t1".to_string(),
            task_title: "Task".to_string(),
            score,
            spec: None,
            telemetry: None,
            findings,
            recommendations,
            policy: None,
        }
    }

    #[test]
    fn test_summary_line_no_findings() {
        let report = report_with(Vec::new(), Score::Green);
        assert_eq!(summary_line(&report), "Therapydrift: OK (no findings)");
    }

    #[test]
    fn test_summary_line_sorts_kinds_and_names_next_action() {
        let report = report_with(
            vec![
                Finding::warn(FindingKind::UnresolvedDriftFollowups, "f"),
                Finding::warn(FindingKind::RepeatedDriftSignals, "r"),
            ],
            Score::Yellow,
        );
        let line = summary_line(&report);
        assert!(line.starts_with(
            "Therapydrift: yellow (repeated_drift_signals, unresolved_drift_followups)"
        ));
        assert!(line.contains("| next: Resolve or re-scope"));
    }

    #[test]
    fn test_summary_line_is_self_ignored_by_default_spec() {
        let spec = crate::config::WatchSpec::default();
        let report = report_with(Vec::new(), Score::Green);
        let line = summary_line(&report);
        assert!(spec
            .ignore_signal_prefixes
            .iter()
            .any(|p| line.starts_with(p.as_str())));
    }

    #[test]
    fn test_followup_request_embeds_spec_block() {
        let report = report_with(
            vec![Finding::warn(FindingKind::RepeatedDriftSignals, "r")],
            Score::Yellow,
        );
        let request = followup_request("t1", "Task", &report, "schema = 1");
        assert_eq!(request.id, "drift-therapy-t1");
        assert_eq!(request.blocked_by, vec!["t1"]);
        assert!(request.description.contains("```therapydrift\nschema = 1\n```"));
        assert!(request.tags.contains(&"therapy".to_string()));
    }
}
