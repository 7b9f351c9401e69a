//! Configuration file loading.
//!
//! Settings live in an optional TOML file with kebab-case keys. Every key has
//! a default, so an empty file is a valid configuration:
//!
//! ```toml
//! threshold = 0.7
//! max-body-chars = 500
//! keywords = ["crash", "freeze"]
//!
//! [weights]
//! title = 0.5
//! body = 0.2
//! labels = 0.15
//! keywords = 0.15
//!
//! [source]
//! api-base-url = "https://api.github.com"
//! max-issues = 500
//! ```

mod error;

pub use error::ConfigError;

use crate::engine::{validate_threshold, DEFAULT_THRESHOLD};
use crate::similarity::{default_keywords, SimilarityConfig, Weights, DEFAULT_MAX_BODY_CHARS};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};
use url::Url;

/// Duplicate finder settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DedupConfig {
    /// Minimum overall score to count as a duplicate.
    pub threshold: f64,

    /// Normalized body characters compared per issue.
    pub max_body_chars: usize,

    /// Keyword vocabulary.
    pub keywords: Vec<String>,

    /// Feature weights.
    pub weights: Weights,

    /// Issue source settings.
    pub source: SourceSettings,
}

/// Where and how many issues to fetch.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SourceSettings {
    /// GitHub API root, for GitHub Enterprise installs.
    pub api_base_url: Option<String>,

    /// Cap on fetched issues.
    pub max_issues: Option<usize>,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_body_chars: DEFAULT_MAX_BODY_CHARS,
            keywords: default_keywords(),
            weights: Weights::default(),
            source: SourceSettings::default(),
        }
    }
}

impl DedupConfig {
    /// Loads and validates a configuration file.
    ///
    /// Keywords are trimmed and lower-cased; empty entries are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file is missing, unreadable, not valid
    /// TOML or contains out-of-range settings.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        info!(path = %path.display(), "Loading configuration");

        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::parse(&content, path)
    }

    /// Parses and validates configuration text. `path` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TomlError`] or [`ConfigError::ValidationError`].
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let mut config: DedupConfig =
            toml::from_str(content).map_err(|e| ConfigError::TomlError {
                path: path.display().to_string(),
                source: e,
            })?;

        config.keywords = config
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        config.validate(path)?;
        debug!(
            threshold = config.threshold,
            keywords = config.keywords.len(),
            "Parsed configuration"
        );
        Ok(config)
    }

    /// Returns the scoring part of the configuration.
    #[must_use]
    pub fn similarity(&self) -> SimilarityConfig {
        SimilarityConfig {
            weights: self.weights,
            max_body_chars: self.max_body_chars,
            keywords: self.keywords.clone(),
        }
    }

    fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let path_str = path.display().to_string();
        let invalid = |message: String| ConfigError::ValidationError {
            path: path_str.clone(),
            message,
        };

        validate_threshold(self.threshold).map_err(|e| invalid(e.to_string()))?;
        self.similarity()
            .validate()
            .map_err(|e| invalid(e.to_string()))?;

        if let Some(base) = &self.source.api_base_url {
            if Url::parse(base).is_err() {
                return Err(invalid(format!("api-base-url is not a valid URL: {base}")));
            }
        }

        if self.source.max_issues == Some(0) {
            return Err(invalid("max-issues must be greater than zero".to_string()));
        }

        Ok(())
    }
}
