//! Watch spec: immutable per-task drift configuration.

use serde::{Deserialize, Serialize};
use toml::Value;

use crate::errors::SpecError;

/// Info string of the fenced spec block inside a task description.
pub const FENCE_INFO: &str = "therapydrift";

/// Immutable drift-watch configuration for one task.
///
/// Built through [`WatchSpec::from_raw`], which applies defaults for absent
/// keys and clamps out-of-range values: negative durations and counts clamp
/// to 0, sub-1 thresholds (`min_signal_count`, `circuit_breaker_after`)
/// clamp to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchSpec {
    pub schema: i64,
    pub min_signal_count: usize,
    pub followup_prefixes: Vec<String>,
    pub require_recovery_plan: bool,
    pub ignore_signal_prefixes: Vec<String>,
    pub cooldown_seconds: i64,
    pub max_auto_actions_per_hour: usize,
    pub min_new_signals: usize,
    pub circuit_breaker_after: u64,
}

impl Default for WatchSpec {
    fn default() -> Self {
        Self {
            schema: 1,
            min_signal_count: 2,
            followup_prefixes: vec!["drift-".to_string(), "speedrift-pit-".to_string()],
            require_recovery_plan: true,
            ignore_signal_prefixes: vec!["Therapydrift:".to_string()],
            cooldown_seconds: 1800,
            max_auto_actions_per_hour: 2,
            min_new_signals: 1,
            circuit_breaker_after: 6,
        }
    }
}

impl WatchSpec {
    /// Parse a raw TOML spec block into a validated spec.
    pub fn parse(text: &str) -> Result<Self, SpecError> {
        let table: toml::Table = toml::from_str(text).map_err(|e| SpecError::Parse {
            message: e.to_string(),
        })?;
        Self::from_raw(&table)
    }

    /// Build a spec from a raw key/value table.
    ///
    /// Absent keys take defaults; wrongly-typed values are an error so a
    /// misconfigured block is surfaced instead of half-applied. Unknown keys
    /// are ignored (forward-compatible).
    pub fn from_raw(raw: &toml::Table) -> Result<Self, SpecError> {
        let defaults = Self::default();

        let schema = int_or(raw, "schema", defaults.schema)?;
        let min_signal_count =
            int_or(raw, "min_signal_count", defaults.min_signal_count as i64)?.max(1) as usize;
        let followup_prefixes = str_list_or(raw, "followup_prefixes", defaults.followup_prefixes)?;
        let require_recovery_plan =
            bool_or(raw, "require_recovery_plan", defaults.require_recovery_plan)?;
        let ignore_signal_prefixes =
            str_list_or(raw, "ignore_signal_prefixes", defaults.ignore_signal_prefixes)?;
        let cooldown_seconds = int_or(raw, "cooldown_seconds", defaults.cooldown_seconds)?.max(0);
        let max_auto_actions_per_hour = int_or(
            raw,
            "max_auto_actions_per_hour",
            defaults.max_auto_actions_per_hour as i64,
        )?
        .max(0) as usize;
        let min_new_signals =
            int_or(raw, "min_new_signals", defaults.min_new_signals as i64)?.max(0) as usize;
        let circuit_breaker_after =
            int_or(raw, "circuit_breaker_after", defaults.circuit_breaker_after as i64)?.max(1)
                as u64;

        Ok(Self {
            schema,
            min_signal_count,
            followup_prefixes,
            require_recovery_plan,
            ignore_signal_prefixes,
            cooldown_seconds,
            max_auto_actions_per_hour,
            min_new_signals,
            circuit_breaker_after,
        })
    }
}

fn int_or(raw: &toml::Table, key: &str, default: i64) -> Result<i64, SpecError> {
    match raw.get(key) {
        None => Ok(default),
        Some(Value::Integer(v)) => Ok(*v),
        Some(_) => Err(SpecError::InvalidField {
            key: key.to_string(),
            expected: "integer",
        }),
    }
}

fn bool_or(raw: &toml::Table, key: &str, default: bool) -> Result<bool, SpecError> {
    match raw.get(key) {
        None => Ok(default),
        Some(Value::Boolean(v)) => Ok(*v),
        Some(_) => Err(SpecError::InvalidField {
            key: key.to_string(),
            expected: "boolean",
        }),
    }
}

fn str_list_or(
    raw: &toml::Table,
    key: &str,
    default: Vec<String>,
) -> Result<Vec<String>, SpecError> {
    match raw.get(key) {
        None => Ok(default),
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item.as_str() {
                    Some(s) => out.push(s.to_string()),
                    None => {
                        return Err(SpecError::InvalidField {
                            key: key.to_string(),
                            expected: "array of strings",
                        })
                    }
                }
            }
            Ok(out)
        }
        Some(_) => Err(SpecError::InvalidField {
            key: key.to_string(),
            expected: "array of strings",
        }),
    }
}

/// Extract the body of the fenced spec block from a task description.
///
/// Returns `None` when no opening fence is present or the block is never
/// closed. The body is returned trimmed, TOML parsing left to the caller.
pub fn extract_spec_block(description: &str) -> Option<String> {
    let mut body: Vec<&str> = Vec::new();
    let mut in_block = false;
    for line in description.lines() {
        if !in_block {
            let trimmed = line.trim_end();
            if trimmed.strip_prefix("```").map(str::trim) == Some(FENCE_INFO) {
                in_block = true;
            }
        } else if line.trim_start().starts_with("```") {
            return Some(body.join("\n").trim().to_string());
        } else {
            body.push(line);
        }
    }
    None
}
