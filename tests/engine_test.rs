//! End-to-end engine runs over in-memory collaborators plus the JSON state
//! store: log writes, follow-up creation, and state fold-back across runs.

use chrono::{DateTime, Duration, TimeZone, Utc};

use drift_watch::store::{InMemoryTasks, RecordingActionSink, RecordingLogSink};
use drift_watch::{
    AutomationState, CheckEngine, CheckOptions, FindingKind, JsonStateStore, PolicyReason, Score,
    TaskRecord, WatchError,
};

const SPEC_BLOCK: &str = "```therapydrift\n\
schema = 1\n\
min_signal_count = 1\n\
cooldown_seconds = 1800\n\
max_auto_actions_per_hour = 2\n\
min_new_signals = 1\n\
circuit_breaker_after = 6\n\
```";

fn subject_task(id: &str, signals: usize) -> TaskRecord {
    let log = (0..signals)
        .map(|i| {
            serde_json::json!({
                "message": format!("Speedrift: s{i}"),
                "timestamp": format!("2026-02-16T09:{:02}:00Z", i),
            })
        })
        .collect::<Vec<_>>();
    serde_json::from_value(serde_json::json!({
        "id": id,
        "title": "Build the thing",
        "status": "in-progress",
        "description": format!("Work item.\n\n{SPEC_BLOCK}\n"),
        "log": log,
    }))
    .unwrap()
}

fn engine_for(
    tasks: Vec<TaskRecord>,
) -> CheckEngine<InMemoryTasks, RecordingActionSink, RecordingLogSink> {
    CheckEngine::new(
        InMemoryTasks::new(tasks),
        RecordingActionSink::default(),
        RecordingLogSink::default(),
    )
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 16, 11, 0, 0).unwrap()
}

fn all_on() -> CheckOptions {
    CheckOptions {
        write_log: true,
        create_followups: true,
    }
}

#[test]
fn test_missing_task_is_fatal() {
    let mut engine = engine_for(vec![]);
    let mut state = AutomationState::default();
    let err = engine
        .run(&mut state, "ghost", now(), CheckOptions::default())
        .unwrap_err();
    assert!(matches!(err, WatchError::TaskNotFound { .. }));
}

#[test]
fn test_no_spec_block_reports_green_and_touches_nothing() {
    let task: TaskRecord = serde_json::from_value(serde_json::json!({
        "id": "t1",
        "title": "Plain task",
        "status": "open",
        "description": "No fenced block here.",
    }))
    .unwrap();
    let mut engine = engine_for(vec![task]);
    let mut state = AutomationState::default();

    let report = engine.run(&mut state, "t1", now(), all_on()).unwrap();
    assert_eq!(report.score, Score::Green);
    assert!(report.findings.is_empty());
    assert!(report.spec.is_none());
    assert!(report.policy.is_none());
    assert!(engine.logs().lines.is_empty());
    assert!(engine.actions().created.is_empty());
    assert!(state.tasks.is_empty());
}

#[test]
fn test_clean_run_writes_ok_summary_line() {
    let mut engine = engine_for(vec![subject_task("t1", 0)]);
    let mut state = AutomationState::default();

    let report = engine.run(&mut state, "t1", now(), all_on()).unwrap();
    assert_eq!(report.score, Score::Green);
    assert!(report.findings.is_empty());
    assert_eq!(
        report.policy.as_ref().unwrap().reason,
        PolicyReason::NoActionableFindings
    );
    assert!(engine.actions().created.is_empty());

    let (task_id, line) = &engine.logs().lines[0];
    assert_eq!(task_id, "t1");
    assert_eq!(line, "Therapydrift: OK (no findings)");
}

#[test]
fn test_invalid_spec_block_degrades_to_finding() {
    let task: TaskRecord = serde_json::from_value(serde_json::json!({
        "id": "t1",
        "title": "Broken config",
        "status": "open",
        "description": "```therapydrift\nschema = [unclosed\n```",
    }))
    .unwrap();
    let mut engine = engine_for(vec![task]);
    let mut state = AutomationState::default();

    let report = engine.run(&mut state, "t1", now(), all_on()).unwrap();
    assert_eq!(report.score, Score::Yellow);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].kind, FindingKind::InvalidSpec);
    // Policy is not evaluated on this path, so no action can fire.
    assert!(report.policy.is_none());
    assert!(engine.actions().created.is_empty());

    let (task_id, line) = &engine.logs().lines[0];
    assert_eq!(task_id, "t1");
    assert!(line.starts_with("Therapydrift: yellow (invalid_spec)"));
}

#[test]
fn test_first_run_creates_recovery_followup() {
    let mut engine = engine_for(vec![subject_task("t1", 2)]);
    let mut state = AutomationState::default();

    let report = engine.run(&mut state, "t1", now(), all_on()).unwrap();
    assert_eq!(report.score, Score::Yellow);
    let decision = report.policy.as_ref().unwrap();
    assert!(decision.allow_auto_action);
    assert_eq!(decision.reason, PolicyReason::Allowed);

    let created = &engine.actions().created;
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].id, "drift-therapy-t1");
    assert_eq!(created[0].title, "therapy: Build the thing");
    assert_eq!(created[0].blocked_by, vec!["t1"]);

    let cur = state.task("t1");
    assert_eq!(cur.auto_action_total, 1);
    assert_eq!(cur.auto_action_timestamps.len(), 1);
    assert_eq!(cur.latest_signal_ts.as_deref(), Some("2026-02-16T09:01:00Z"));
    assert!(!cur.circuit_breaker_open);

    assert_eq!(engine.logs().lines.len(), 1);
    assert!(engine.logs().lines[0].1.starts_with("Therapydrift: yellow"));
}

#[test]
fn test_immediate_rerun_hits_cooldown() {
    let mut engine = engine_for(vec![subject_task("t1", 2)]);
    let mut state = AutomationState::default();

    engine.run(&mut state, "t1", now(), all_on()).unwrap();
    let report = engine
        .run(&mut state, "t1", now() + Duration::seconds(60), all_on())
        .unwrap();

    let decision = report.policy.as_ref().unwrap();
    assert!(!decision.allow_auto_action);
    assert_eq!(decision.reason, PolicyReason::CooldownActive);
    assert_eq!(engine.actions().created.len(), 1);
    assert_eq!(state.task("t1").auto_action_total, 1);
}

#[test]
fn test_rerun_after_cooldown_needs_new_evidence() {
    let mut engine = engine_for(vec![subject_task("t1", 2)]);
    let mut state = AutomationState::default();

    engine.run(&mut state, "t1", now(), all_on()).unwrap();
    // Past the cooldown, same log, same follow-up set: stale evidence.
    let report = engine
        .run(&mut state, "t1", now() + Duration::seconds(3600), all_on())
        .unwrap();

    let decision = report.policy.as_ref().unwrap();
    assert_eq!(decision.reason, PolicyReason::NoNewEvidence);
    assert_eq!(engine.actions().created.len(), 1);
}

#[test]
fn test_tripped_breaker_denies_despite_fresh_evidence() {
    let mut engine = engine_for(vec![subject_task("t1", 3)]);
    let mut state = AutomationState::default();
    state.tasks.insert(
        "t1".to_string(),
        drift_watch::TaskAutomationState {
            auto_action_total: 6,
            ..Default::default()
        },
    );

    let report = engine.run(&mut state, "t1", now(), all_on()).unwrap();
    let decision = report.policy.as_ref().unwrap();
    assert_eq!(decision.reason, PolicyReason::CircuitBreakerOpen);
    assert!(engine.actions().created.is_empty());
    assert!(state.task("t1").circuit_breaker_open);
}

#[test]
fn test_log_gating_and_action_gating_are_independent() {
    let mut engine = engine_for(vec![subject_task("t1", 2)]);
    let mut state = AutomationState::default();

    let options = CheckOptions {
        write_log: false,
        create_followups: true,
    };
    engine.run(&mut state, "t1", now(), options).unwrap();
    assert!(engine.logs().lines.is_empty());
    assert_eq!(engine.actions().created.len(), 1);
}

#[test]
fn test_state_survives_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonStateStore::new(dir.path().join(".driftwatch/state.json"));

    let mut engine = engine_for(vec![subject_task("t1", 2)]);
    let mut state = store.load();
    engine.run(&mut state, "t1", now(), all_on()).unwrap();
    store.save(&state).unwrap();

    // Fresh process: reload and re-evaluate a minute later.
    let mut engine = engine_for(vec![subject_task("t1", 2)]);
    let mut state = store.load();
    let report = engine
        .run(&mut state, "t1", now() + Duration::seconds(60), all_on())
        .unwrap();

    assert_eq!(
        report.policy.as_ref().unwrap().reason,
        PolicyReason::CooldownActive
    );
    assert!(engine.actions().created.is_empty());
}

#[test]
fn test_report_serializes_with_policy() {
    let mut engine = engine_for(vec![subject_task("t1", 2)]);
    let mut state = AutomationState::default();
    let report = engine.run(&mut state, "t1", now(), all_on()).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["score"], "yellow");
    assert_eq!(json["policy"]["reason"], "allowed");
    assert_eq!(json["telemetry"]["drift_signal_count"], 2);
    assert_eq!(
        json["findings"][0]["kind"],
        "repeated_drift_signals"
    );
}
