//! Watch spec configuration.
//! TOML-based, carried in a fenced block inside the task description.

pub mod watch_spec;

pub use watch_spec::{extract_spec_block, WatchSpec, FENCE_INFO};
