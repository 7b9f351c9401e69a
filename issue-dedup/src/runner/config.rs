//! Runner configuration.

use std::path::{Path, PathBuf};

/// Default JSON output file.
pub const DEFAULT_OUTPUT_PATH: &str = "duplicate-issues.json";

/// Configuration for a duplicate finding run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Repository owner.
    owner: String,
    /// Repository name.
    repo: String,
    /// GitHub token used for API calls.
    token: Option<String>,
    /// Threshold overriding the configuration file.
    threshold: Option<f64>,
    /// JSON output path; the text report is written next to it.
    output_path: PathBuf,
    /// Optional markdown report path.
    markdown_path: Option<PathBuf>,
    /// Cap on fetched issues, overriding the configuration file.
    max_issues: Option<usize>,
    /// Issues file read instead of the GitHub API.
    input_path: Option<PathBuf>,
    /// Optional TOML configuration file.
    config_path: Option<PathBuf>,
}

impl RunnerConfig {
    /// Creates a new configuration for a run against `owner/repo`.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            token: None,
            threshold: None,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            markdown_path: None,
            max_issues: None,
            input_path: None,
            config_path: None,
        }
    }

    /// Sets the GitHub token.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Sets the similarity threshold.
    pub fn with_threshold(mut self, threshold: Option<f64>) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the JSON output path.
    pub fn with_output_path(mut self, output_path: PathBuf) -> Self {
        self.output_path = output_path;
        self
    }

    /// Sets the markdown report path.
    pub fn with_markdown_path(mut self, markdown_path: Option<PathBuf>) -> Self {
        self.markdown_path = markdown_path;
        self
    }

    /// Sets the cap on fetched issues.
    pub fn with_max_issues(mut self, max_issues: Option<usize>) -> Self {
        self.max_issues = max_issues;
        self
    }

    /// Reads issues from a JSON file instead of the GitHub API.
    pub fn with_input_path(mut self, input_path: Option<PathBuf>) -> Self {
        self.input_path = input_path;
        self
    }

    /// Sets the TOML configuration file.
    pub fn with_config_path(mut self, config_path: Option<PathBuf>) -> Self {
        self.config_path = config_path;
        self
    }

    /// Returns the repository owner.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the repository name.
    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Returns the repository in `owner/repo` form.
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the threshold override.
    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    /// Returns the JSON output path.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Returns the markdown report path.
    pub fn markdown_path(&self) -> Option<&Path> {
        self.markdown_path.as_deref()
    }

    /// Returns the cap on fetched issues.
    pub fn max_issues(&self) -> Option<usize> {
        self.max_issues
    }

    /// Returns the issues file path.
    pub fn input_path(&self) -> Option<&Path> {
        self.input_path.as_deref()
    }

    /// Returns the configuration file path.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
