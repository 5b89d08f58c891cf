//! Collaborator store errors.

/// Errors from the task-store, state-store, and sink collaborators.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("State store I/O failed at {path}: {message}")]
    StateIo { path: String, message: String },

    #[error("State serialization failed: {message}")]
    Serialize { message: String },

    #[error("Action sink rejected task {id}: {message}")]
    ActionRejected { id: String, message: String },

    #[error("Log append failed for task {task_id}: {message}")]
    LogAppend { task_id: String, message: String },
}
