//! Collaborator interfaces: task lookup, action creation, log append.
//!
//! These are local data-structure contracts; file formats, CLIs, and wire
//! protocols live outside this crate. In-memory implementations back the
//! test suite and small embedders.

pub mod memory;

pub use memory::{InMemoryTasks, RecordingActionSink, RecordingLogSink};

use rustc_hash::FxHashMap;

use crate::errors::StoreError;
use crate::model::TaskRecord;

/// Read access to the task collection.
pub trait TaskStore {
    fn get_task(&self, id: &str) -> Option<TaskRecord>;
    fn list_tasks(&self) -> FxHashMap<String, TaskRecord>;
}

/// A follow-up/recovery task to be created when the policy allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowupRequest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub blocked_by: Vec<String>,
    pub tags: Vec<String>,
}

/// Capability to create a follow-up task. `ensure` semantics: creating an
/// id that already exists is a no-op, not an error.
pub trait ActionSink {
    fn ensure_task(&mut self, request: &FollowupRequest) -> Result<(), StoreError>;
}

/// Capability to append a human-readable summary line to a task's event log.
pub trait LogSink {
    fn append_log(&mut self, task_id: &str, line: &str) -> Result<(), StoreError>;
}
