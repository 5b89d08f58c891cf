//! Policy evaluation: a short-circuiting ordered predicate chain.
//!
//! Pure function over (spec, findings, telemetry, prior state, now); the
//! caller persists the returned decision through the state updater.

use chrono::{DateTime, Duration, Utc};
use rustc_hash::FxHashSet;

use super::types::{PolicyDecision, PolicyReason};
use crate::config::WatchSpec;
use crate::model::{Finding, Telemetry};
use crate::state::TaskAutomationState;
use crate::time::parse_ts;

/// Decide whether an automated remediation action may fire.
///
/// First matching rule wins:
/// 1. circuit breaker open
/// 2. hourly budget disabled (`max_auto_actions_per_hour == 0`)
/// 3. hourly budget exhausted
/// 4. cooldown active
/// 5. no new evidence
/// 6. allowed
pub fn evaluate_policy(
    spec: &WatchSpec,
    findings: &[Finding],
    telemetry: &Telemetry,
    prior: &TaskAutomationState,
    now: DateTime<Utc>,
) -> PolicyDecision {
    let has_actionable_findings = findings.iter().any(|f| f.kind.is_actionable());

    // Invalid persisted timestamps are dropped silently.
    let action_times: Vec<DateTime<Utc>> = prior
        .auto_action_timestamps
        .iter()
        .filter_map(|raw| parse_ts(raw))
        .collect();
    let one_hour_ago = now - Duration::hours(1);
    let recent_action_count_1h = action_times.iter().filter(|t| **t >= one_hour_ago).count();
    let last_action_time = action_times.iter().max().copied();

    let circuit_breaker_open = prior.auto_action_total >= spec.circuit_breaker_after;

    let cooldown_active = match last_action_time {
        Some(last) if spec.cooldown_seconds > 0 => {
            now - last < Duration::seconds(spec.cooldown_seconds)
        }
        _ => false,
    };

    let prev_followups: FxHashSet<&str> =
        prior.open_followup_ids.iter().map(String::as_str).collect();
    let cur_followups: FxHashSet<&str> =
        telemetry.open_followup_ids.iter().map(String::as_str).collect();
    let open_followups_changed = prev_followups != cur_followups;

    let new_signal_count = telemetry.new_signal_count;
    let has_new_evidence = new_signal_count >= spec.min_new_signals || open_followups_changed;

    let (allow, reason) = if !has_actionable_findings {
        (false, PolicyReason::NoActionableFindings)
    } else if circuit_breaker_open {
        (false, PolicyReason::CircuitBreakerOpen)
    } else if spec.max_auto_actions_per_hour == 0 {
        (false, PolicyReason::HourlyBudgetDisabled)
    } else if recent_action_count_1h >= spec.max_auto_actions_per_hour {
        (false, PolicyReason::HourlyBudgetExhausted)
    } else if cooldown_active {
        (false, PolicyReason::CooldownActive)
    } else if !has_new_evidence {
        (false, PolicyReason::NoNewEvidence)
    } else {
        (true, PolicyReason::Allowed)
    };

    if !allow {
        tracing::debug!(
            reason = reason.as_str(),
            recent_action_count_1h,
            cooldown_active,
            circuit_breaker_open,
            "auto-action denied"
        );
    }

    PolicyDecision {
        allow_auto_action: allow,
        reason,
        has_actionable_findings,
        new_signal_count,
        open_followups_changed,
        recent_action_count_1h,
        cooldown_active,
        circuit_breaker_open,
    }
}
