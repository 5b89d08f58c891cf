//! JSON-file persistence for the automation state.

use std::path::{Path, PathBuf};

use super::AutomationState;
use crate::errors::StoreError;

/// File-backed automation state, one JSON document for all tasks.
///
/// Loading is lenient: a missing or corrupt file reads as empty state so an
/// operator can always recover by deleting it. Writing is a plain overwrite;
/// read-modify-write serialization across processes is the caller's job.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state, substituting empty state for any failure.
    pub fn load(&self) -> AutomationState {
        let Ok(content) = std::fs::read_to_string(&self.path) else {
            return AutomationState::default();
        };
        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "automation state unreadable, starting empty"
                );
                AutomationState::default()
            }
        }
    }

    /// Persist the state, creating parent directories as needed.
    pub fn save(&self, state: &AutomationState) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(state).map_err(|e| StoreError::Serialize {
            message: e.to_string(),
        })?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::StateIo {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;
        }
        std::fs::write(&self.path, json + "\n").map_err(|e| StoreError::StateIo {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })
    }
}
