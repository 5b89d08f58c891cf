//! In-memory collaborator implementations.

use rustc_hash::FxHashMap;

use super::{ActionSink, FollowupRequest, LogSink, TaskStore};
use crate::errors::StoreError;
use crate::model::TaskRecord;

/// Task store over an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTasks {
    pub tasks: FxHashMap<String, TaskRecord>,
}

impl InMemoryTasks {
    pub fn new(tasks: impl IntoIterator<Item = TaskRecord>) -> Self {
        Self {
            tasks: tasks.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }
}

impl TaskStore for InMemoryTasks {
    fn get_task(&self, id: &str) -> Option<TaskRecord> {
        self.tasks.get(id).cloned()
    }

    fn list_tasks(&self) -> FxHashMap<String, TaskRecord> {
        self.tasks.clone()
    }
}

/// Action sink that records every created follow-up.
#[derive(Debug, Clone, Default)]
pub struct RecordingActionSink {
    pub created: Vec<FollowupRequest>,
}

impl ActionSink for RecordingActionSink {
    fn ensure_task(&mut self, request: &FollowupRequest) -> Result<(), StoreError> {
        if !self.created.iter().any(|r| r.id == request.id) {
            self.created.push(request.clone());
        }
        Ok(())
    }
}

/// Log sink that records appended lines per task.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogSink {
    pub lines: Vec<(String, String)>,
}

impl LogSink for RecordingLogSink {
    fn append_log(&mut self, task_id: &str, line: &str) -> Result<(), StoreError> {
        self.lines.push((task_id.to_string(), line.to_string()));
        Ok(())
    }
}
