//! Evaluation report assembled by the check engine.

use serde::{Deserialize, Serialize};

use super::finding::{Finding, Score};
use super::telemetry::Telemetry;
use crate::config::WatchSpec;
use crate::policy::PolicyDecision;

/// A remediation recommendation paired to a finding kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: String,
    pub action: String,
    pub rationale: String,
}

/// Full result of one drift check.
///
/// `spec` and `telemetry` are absent when no spec block was found or the
/// block failed to parse; `policy` is absent whenever the auto-action policy
/// was not evaluated (no spec, or spec parse failure).
#[derive(Debug, Clone, Serialize)]
pub struct DriftReport {
    pub task_id: String,
    pub task_title: String,
    pub score: Score,
    pub spec: Option<WatchSpec>,
    pub telemetry: Option<Telemetry>,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<Recommendation>,
    pub policy: Option<PolicyDecision>,
}
