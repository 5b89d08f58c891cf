//! Task record as exposed by the task store collaborator.

use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status of a task. Unknown statuses deserialize to [`TaskStatus::Other`]
/// so an unexpected value never fails an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Open,
    InProgress,
    Done,
    #[default]
    #[serde(other)]
    Other,
}

impl TaskStatus {
    /// Open or in-progress: the task still demands attention.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }

    /// Statuses under which a recovery task counts as existing.
    pub fn counts_as_recovery(&self) -> bool {
        matches!(self, Self::Open | Self::InProgress | Self::Done)
    }
}

/// One entry in a task's event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A task record, the minimum shape required from the task store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub description: String,
    #[serde(deserialize_with = "lenient_log")]
    pub log: Vec<LogEntry>,
    pub blocked_by: Vec<String>,
    pub tags: Vec<String>,
}

/// Deserialize a log array, silently skipping non-record entries.
fn lenient_log<'de, D>(deserializer: D) -> Result<Vec<LogEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter(|v| v.is_object())
        .map(|v| LogEntry {
            message: v
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or_default()
                .to_string(),
            timestamp: v
                .get("timestamp")
                .and_then(|t| t.as_str())
                .map(str::to_string),
        })
        .collect())
}
