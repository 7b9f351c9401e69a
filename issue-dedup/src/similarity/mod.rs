//! Weighted multi-feature similarity between two issues.
//!
//! Four features are compared: title and body text (sequence ratio over
//! normalized text), labels and domain keywords (Jaccard index). The overall
//! score is a weighted sum of the four, using [`Weights`].

mod keywords;
mod normalize;
mod sequence;

pub use keywords::{default_keywords, extract_keywords, DEFAULT_KEYWORDS};
pub use normalize::{normalize, VERSION_PLACEHOLDER};
pub use sequence::sequence_ratio;

use crate::engine::EngineError;
use crate::issue::IssueRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default weight of the title ratio.
pub const TITLE_WEIGHT: f64 = 0.5;

/// Default weight of the body ratio.
pub const BODY_WEIGHT: f64 = 0.2;

/// Default weight of the label overlap.
pub const LABELS_WEIGHT: f64 = 0.15;

/// Default weight of the keyword overlap.
pub const KEYWORDS_WEIGHT: f64 = 0.15;

/// Number of normalized body characters compared by default.
pub const DEFAULT_MAX_BODY_CHARS: usize = 500;

/// Allowed deviation of the weight sum from 1.0.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Per-feature similarity scores, each in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SimilarityBreakdown {
    pub title: f64,
    pub body: f64,
    pub labels: f64,
    pub keywords: f64,
}

impl SimilarityBreakdown {
    /// Returns a copy with every score rounded to `places` decimals.
    #[must_use]
    pub fn rounded(&self, places: i32) -> Self {
        Self {
            title: round_to(self.title, places),
            body: round_to(self.body, places),
            labels: round_to(self.labels, places),
            keywords: round_to(self.keywords, places),
        }
    }
}

/// Rounds `value` to `places` decimals.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Feature weights of the overall score. Must be non-negative and sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub title: f64,
    pub body: f64,
    pub labels: f64,
    pub keywords: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            title: TITLE_WEIGHT,
            body: BODY_WEIGHT,
            labels: LABELS_WEIGHT,
            keywords: KEYWORDS_WEIGHT,
        }
    }
}

impl Weights {
    /// Returns the sum of all weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.title + self.body + self.labels + self.keywords
    }

    /// Combines a breakdown into the overall score.
    #[must_use]
    pub fn combine(&self, breakdown: &SimilarityBreakdown) -> f64 {
        let overall = breakdown.title * self.title
            + breakdown.body * self.body
            + breakdown.labels * self.labels
            + breakdown.keywords * self.keywords;
        overall.clamp(0.0, 1.0)
    }

    /// Checks that every weight is a non-negative number and that they sum to 1.0.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigurationError`] describing the problem.
    pub fn validate(&self) -> Result<(), EngineError> {
        let named = [
            ("title", self.title),
            ("body", self.body),
            ("labels", self.labels),
            ("keywords", self.keywords),
        ];
        for (name, weight) in named {
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineError::ConfigurationError {
                    message: format!("{name} weight must be a non-negative number, got {weight}"),
                });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EngineError::ConfigurationError {
                message: format!("weights must sum to 1.0, got {sum}"),
            });
        }

        Ok(())
    }
}

/// Static scoring configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityConfig {
    /// Feature weights.
    pub weights: Weights,
    /// Normalized body characters compared per issue.
    pub max_body_chars: usize,
    /// Keyword vocabulary, lower-case.
    pub keywords: Vec<String>,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            weights: Weights::default(),
            max_body_chars: DEFAULT_MAX_BODY_CHARS,
            keywords: default_keywords(),
        }
    }
}

impl SimilarityConfig {
    /// Validates weights and the body limit.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigurationError`] if the configuration is unusable.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.weights.validate()?;
        if self.max_body_chars == 0 {
            return Err(EngineError::ConfigurationError {
                message: "max body chars must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Pre-computed comparison features of one issue.
///
/// Building these once per issue keeps the pairwise loop free of repeated
/// normalization work.
#[derive(Debug, Clone)]
pub struct IssueFeatures<'a> {
    title: String,
    body: String,
    labels: &'a BTreeSet<String>,
    keywords: BTreeSet<String>,
}

impl<'a> IssueFeatures<'a> {
    /// Extracts the comparison features of `issue`.
    #[must_use]
    pub fn extract(issue: &'a IssueRecord, config: &SimilarityConfig) -> Self {
        let title = normalize(&issue.title);
        let body = normalize(&issue.body);
        let keywords = extract_keywords(&format!("{title} {body}"), &config.keywords);
        let body = body.chars().take(config.max_body_chars).collect();

        Self {
            title,
            body,
            labels: &issue.labels,
            keywords,
        }
    }

    /// Normalized title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Normalized, truncated body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Keywords found in the normalized title and full body.
    #[must_use]
    pub fn keywords(&self) -> &BTreeSet<String> {
        &self.keywords
    }
}

/// Compares two pre-computed feature sets.
#[must_use]
pub fn compare(
    a: &IssueFeatures<'_>,
    b: &IssueFeatures<'_>,
    weights: &Weights,
) -> (f64, SimilarityBreakdown) {
    let breakdown = SimilarityBreakdown {
        title: sequence_ratio(&a.title, &b.title),
        body: sequence_ratio(&a.body, &b.body),
        labels: jaccard(a.labels, b.labels),
        keywords: jaccard(&a.keywords, &b.keywords),
    };
    (weights.combine(&breakdown), breakdown)
}

/// Scores two issues, returning the overall score and its breakdown.
///
/// Label and keyword components are symmetric. The text ratios are not for
/// long or repetitive text (see [`sequence_ratio`]), so callers pass the
/// earlier issue first.
#[must_use]
pub fn score(
    a: &IssueRecord,
    b: &IssueRecord,
    config: &SimilarityConfig,
) -> (f64, SimilarityBreakdown) {
    let a = IssueFeatures::extract(a, config);
    let b = IssueFeatures::extract(b, config);
    compare(&a, &b, &config.weights)
}

/// Jaccard index of two sets; 0.0 when both are empty.
#[must_use]
pub fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}
