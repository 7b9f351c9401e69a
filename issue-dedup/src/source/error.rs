//! Issue source error types.

use crate::engine::EngineError;
use thiserror::Error;

/// Errors that can occur while obtaining issues.
#[derive(Debug, Error)]
pub enum SourceError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// Failed to read an issues file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An issues file is not valid JSON.
    #[error("Failed to parse issues in '{path}': {source}")]
    ParseError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// An issue record failed validation.
    #[error(transparent)]
    InvalidRecord(#[from] EngineError),
}
