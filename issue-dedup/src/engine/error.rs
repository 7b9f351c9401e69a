//! Engine error types.

use thiserror::Error;

/// Errors raised by the duplicate engine before any comparison runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// An input record is malformed.
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    /// Threshold, weights or limits are out of range.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}
