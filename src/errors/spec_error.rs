//! Watch spec errors.

/// Errors raised while reading a watch spec block.
///
/// All of these are recoverable: the caller surfaces them as a
/// warn-severity `invalid_spec` finding, never as a fatal error.
#[derive(Debug, thiserror::Error)]
pub enum SpecError {
    #[error("Spec block parse failed: {message}")]
    Parse { message: String },

    #[error("Spec field `{key}` has the wrong type (expected {expected})")]
    InvalidField { key: String, expected: &'static str },
}
