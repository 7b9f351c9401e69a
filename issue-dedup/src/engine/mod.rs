//! Duplicate clustering engine.
//!
//! Groups a batch of issues with a single greedy forward pass: each unvisited
//! issue in input order is compared against every later unvisited issue, and
//! those scoring at or above the threshold join its group. Grouping is not
//! transitive, so the result depends on input order. Two issues that only
//! match through a third one end up apart if the third is claimed first.

mod error;
mod group;

pub use error::EngineError;
pub use group::{DuplicateGroup, DuplicateMember};

use crate::issue::IssueRecord;
use crate::similarity::{compare, score, IssueFeatures, SimilarityBreakdown, SimilarityConfig};
use std::collections::HashSet;
use tracing::{debug, info};

/// Minimum overall score for two issues to count as duplicates.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Primaries between progress log lines.
const PROGRESS_INTERVAL: usize = 50;

/// Stateless duplicate finder holding a validated scoring configuration.
#[derive(Debug, Clone, Default)]
pub struct DuplicateEngine {
    config: SimilarityConfig,
}

impl DuplicateEngine {
    /// Creates an engine after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigurationError`] for invalid weights or limits.
    pub fn new(config: SimilarityConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the scoring configuration.
    #[must_use]
    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// Scores a pair of issues.
    #[must_use]
    pub fn score(&self, a: &IssueRecord, b: &IssueRecord) -> (f64, SimilarityBreakdown) {
        score(a, b, &self.config)
    }

    /// Partitions `issues` into duplicate groups.
    ///
    /// Groups come out in the order of their primaries; members in ascending
    /// input position. Issues that neither match nor are matched do not appear.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigurationError`] if `threshold` is outside
    /// `[0, 1]`, or [`EngineError::ValidationError`] if an issue number is zero
    /// or repeated. Both are checked before any comparison.
    pub fn cluster<'a>(
        &self,
        issues: &'a [IssueRecord],
        threshold: f64,
    ) -> Result<Vec<DuplicateGroup<'a>>, EngineError> {
        validate_threshold(threshold)?;
        validate_batch(issues)?;

        info!(
            issues = issues.len(),
            threshold, "Analyzing issues for duplicates"
        );

        let features: Vec<IssueFeatures<'a>> = issues
            .iter()
            .map(|issue| IssueFeatures::extract(issue, &self.config))
            .collect();

        let mut visited = vec![false; issues.len()];
        let mut groups = Vec::new();

        for i in 0..issues.len() {
            if visited[i] {
                continue;
            }

            if (i + 1) % PROGRESS_INTERVAL == 0 {
                debug!(analyzed = i + 1, total = issues.len(), "Clustering progress");
            }

            let mut group = DuplicateGroup::new(&issues[i]);
            for j in (i + 1)..issues.len() {
                if visited[j] {
                    continue;
                }

                let (overall, breakdown) =
                    compare(&features[i], &features[j], &self.config.weights);
                if overall >= threshold {
                    group.members.push(DuplicateMember {
                        issue: &issues[j],
                        score: overall,
                        breakdown,
                    });
                    visited[j] = true;
                }
            }

            if !group.is_empty() {
                visited[i] = true;
                groups.push(group);
            }
        }

        info!(groups = groups.len(), "Found potential duplicate groups");
        Ok(groups)
    }
}

/// Clusters `issues` with the default scoring configuration.
///
/// # Errors
///
/// See [`DuplicateEngine::cluster`].
pub fn cluster(
    issues: &[IssueRecord],
    threshold: f64,
) -> Result<Vec<DuplicateGroup<'_>>, EngineError> {
    DuplicateEngine::default().cluster(issues, threshold)
}

/// Checks that `threshold` lies in `[0, 1]`.
///
/// # Errors
///
/// Returns [`EngineError::ConfigurationError`] otherwise, including for NaN.
pub fn validate_threshold(threshold: f64) -> Result<(), EngineError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(EngineError::ConfigurationError {
            message: format!("threshold must be within [0, 1], got {threshold}"),
        })
    }
}

fn validate_batch(issues: &[IssueRecord]) -> Result<(), EngineError> {
    let mut seen = HashSet::with_capacity(issues.len());
    for (index, issue) in issues.iter().enumerate() {
        if issue.number == 0 {
            return Err(EngineError::ValidationError {
                message: format!("record {index}: issue number must be positive"),
            });
        }
        if !seen.insert(issue.number) {
            return Err(EngineError::ValidationError {
                message: format!("record {index}: duplicate issue number {}", issue.number),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(number: u64, title: &str) -> IssueRecord {
        IssueRecord::new(number, title)
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        let issues = vec![titled(1, "a"), titled(2, "a")];
        for threshold in [-0.1, 1.01, f64::NAN] {
            assert!(matches!(
                cluster(&issues, threshold),
                Err(EngineError::ConfigurationError { .. })
            ));
        }
        assert!(cluster(&issues, 0.0).is_ok());
        assert!(cluster(&issues, 1.0).is_ok());
    }

    #[test]
    fn rejects_zero_and_repeated_numbers() {
        let zero = vec![titled(0, "a")];
        assert!(matches!(
            cluster(&zero, 0.7),
            Err(EngineError::ValidationError { .. })
        ));

        let repeated = vec![titled(4, "a"), titled(4, "b")];
        assert!(matches!(
            cluster(&repeated, 0.7),
            Err(EngineError::ValidationError { .. })
        ));
    }

    #[test]
    fn empty_batch_has_no_groups() {
        assert!(cluster(&[], 0.7).unwrap().is_empty());
    }

    #[test]
    fn dpi_freeze_reports_cluster_together() {
        let issues = vec![
            titled(1, "UI freezes on DPI change")
                .with_body("The window stops responding after moving it to another monitor.")
                .with_labels(["bug"]),
            titled(2, "Application freezes when DPI changes")
                .with_body("Moving the app window to a second monitor makes it unresponsive.")
                .with_labels(["bug"]),
        ];

        let groups = cluster(&issues, 0.6).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].primary.number, 1);
        assert_eq!(groups[0].member_numbers(), vec![2]);
        let member = &groups[0].members[0];
        assert_eq!(member.breakdown.labels, 1.0);
        assert_eq!(member.breakdown.keywords, 1.0);
        assert!((member.score - 0.7454).abs() < 1e-3);
        assert!((member.breakdown.body - 0.3937).abs() < 1e-3);
    }

    #[test]
    fn disjoint_issues_score_zero_and_never_cluster() {
        let issues = vec![
            titled(1, "crash").with_body("boom").with_labels(["bug"]),
            titled(2, "dpi").with_body("lull").with_labels(["ui"]),
        ];

        let engine = DuplicateEngine::default();
        let (overall, breakdown) = engine.score(&issues[0], &issues[1]);
        assert_eq!(overall, 0.0);
        assert_eq!(breakdown, SimilarityBreakdown::default());

        for threshold in [0.01, 0.1, 0.5, 0.7, 1.0] {
            assert!(engine.cluster(&issues, threshold).unwrap().is_empty());
        }
    }

    #[test]
    fn grouping_is_not_transitive() {
        // 0 ~ 2 and 1 ~ 2, but 0 and 1 share nothing.
        let issues = vec![
            titled(10, "abcdefghij"),
            titled(11, "klmnopqrst"),
            titled(12, "abcdefghijklmnopqrst"),
        ];

        let engine = DuplicateEngine::default();
        assert!(engine.score(&issues[0], &issues[2]).0 >= 0.5);
        assert!(engine.score(&issues[1], &issues[2]).0 >= 0.5);
        assert!(engine.score(&issues[0], &issues[1]).0 < 0.5);

        let groups = engine.cluster(&issues, 0.5).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].primary.number, 10);
        assert_eq!(groups[0].member_numbers(), vec![12]);
    }

    #[test]
    fn members_keep_input_order_and_primaries_are_claimed() {
        let issues = vec![
            titled(1, "webview2 crashes on navigation to pdf"),
            titled(2, "something unrelated about fonts"),
            titled(3, "webview2 crashes on navigation to pdfs"),
            titled(4, "webview2 crashed on navigation to pdf"),
        ];

        let groups = cluster(&issues, 0.7).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].primary.number, 1);
        assert_eq!(groups[0].member_numbers(), vec![3, 4]);
    }

    #[test]
    fn custom_weights_change_scores() {
        let config = SimilarityConfig {
            weights: crate::similarity::Weights {
                title: 1.0,
                body: 0.0,
                labels: 0.0,
                keywords: 0.0,
            },
            ..SimilarityConfig::default()
        };
        let engine = DuplicateEngine::new(config).unwrap();

        let a = titled(1, "same title").with_body("one body");
        let b = titled(2, "same title").with_body("a different body entirely");
        assert_eq!(engine.score(&a, &b).0, 1.0);
    }

    #[test]
    fn engine_rejects_invalid_config() {
        let config = SimilarityConfig {
            max_body_chars: 0,
            ..SimilarityConfig::default()
        };
        assert!(DuplicateEngine::new(config).is_err());
    }
}
