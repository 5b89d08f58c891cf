//! Policy decision types.

use serde::{Deserialize, Serialize};

/// Why the policy allowed or denied an automated action.
///
/// Ordering matters: the circuit breaker (permanent until externally reset)
/// outranks the transient budget and cooldown checks, which outrank the
/// evidence-freshness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyReason {
    NoActionableFindings,
    CircuitBreakerOpen,
    HourlyBudgetDisabled,
    HourlyBudgetExhausted,
    CooldownActive,
    NoNewEvidence,
    Allowed,
}

impl PolicyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoActionableFindings => "no_actionable_findings",
            Self::CircuitBreakerOpen => "circuit_breaker_open",
            Self::HourlyBudgetDisabled => "hourly_budget_disabled",
            Self::HourlyBudgetExhausted => "hourly_budget_exhausted",
            Self::CooldownActive => "cooldown_active",
            Self::NoNewEvidence => "no_new_evidence",
            Self::Allowed => "allowed",
        }
    }
}

/// The policy verdict plus the intermediate facts that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDecision {
    pub allow_auto_action: bool,
    pub reason: PolicyReason,
    pub has_actionable_findings: bool,
    pub new_signal_count: usize,
    pub open_followups_changed: bool,
    pub recent_action_count_1h: usize,
    pub cooldown_active: bool,
    pub circuit_breaker_open: bool,
}
