//! Top-level evaluation errors.

use super::store_error::StoreError;

/// Errors that abort a check invocation.
///
/// A missing subject task is the only condition fatal to an evaluation;
/// malformed spec blocks, log entries, and timestamps all degrade into
/// findings or documented defaults instead.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("Task not found: {id}")]
    TaskNotFound { id: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}
