//! Findings produced by the scoring engine.

use serde::{Deserialize, Serialize};

/// Kinds of finding a drift evaluation can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    RepeatedDriftSignals,
    UnresolvedDriftFollowups,
    MissingRecoveryPlan,
    UnsupportedSchema,
    InvalidSpec,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RepeatedDriftSignals => "repeated_drift_signals",
            Self::UnresolvedDriftFollowups => "unresolved_drift_followups",
            Self::MissingRecoveryPlan => "missing_recovery_plan",
            Self::UnsupportedSchema => "unsupported_schema",
            Self::InvalidSpec => "invalid_spec",
        }
    }

    /// Kinds that may trigger an automated remediation action.
    pub fn is_actionable(&self) -> bool {
        matches!(
            self,
            Self::RepeatedDriftSignals | Self::UnresolvedDriftFollowups | Self::MissingRecoveryPlan
        )
    }
}

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
    Error,
}

/// Overall evaluation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Score {
    Green,
    Yellow,
    Red,
}

impl Score {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }

    /// Worst severity wins: any error ⇒ red, any warn ⇒ yellow, else green.
    pub fn from_findings(findings: &[Finding]) -> Self {
        if findings.iter().any(|f| f.severity == Severity::Error) {
            Self::Red
        } else if findings.iter().any(|f| f.severity == Severity::Warn) {
            Self::Yellow
        } else {
            Self::Green
        }
    }
}

/// One finding: immutable, produced fresh each evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl Finding {
    /// Warn-severity finding without structured details.
    pub fn warn(kind: FindingKind, summary: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warn,
            summary: summary.into(),
            details: None,
        }
    }

    /// Attach structured details.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
