//! Runner error types.

/// Errors that can occur during a duplicate finding run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration file errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Issue fetching and loading errors.
    #[error(transparent)]
    Source(#[from] crate::source::SourceError),

    /// Invalid threshold, weights or issue batch.
    #[error(transparent)]
    Engine(#[from] crate::engine::EngineError),

    /// Report rendering and writing errors.
    #[error(transparent)]
    Report(#[from] crate::report::ReportError),
}
