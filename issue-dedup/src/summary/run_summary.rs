//! Run summary types.

use crate::report::{sort_by_duplicate_count, GroupRecord};
use std::path::{Path, PathBuf};

/// Number of largest groups kept for the summary.
pub const TOP_GROUPS: usize = 5;

/// One of the largest groups of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary {
    /// Primary issue number.
    pub number: u64,

    /// Primary issue title.
    pub title: String,

    /// Number of duplicates in the group.
    pub duplicates: usize,
}

/// Summary of a complete run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Number of issues compared.
    pub issues_analyzed: usize,

    /// Number of duplicate groups found.
    pub groups_found: usize,

    /// Number of issues placed in a group as duplicates.
    pub duplicates_found: usize,

    /// Threshold used for the run.
    pub threshold: f64,

    /// Largest groups, largest first.
    pub top_groups: Vec<GroupSummary>,

    /// Report files written.
    pub outputs: Vec<PathBuf>,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            ..Default::default()
        }
    }

    /// Updates the summary with the groups found by the run.
    pub fn record_groups(&mut self, records: &[GroupRecord]) {
        self.groups_found = records.len();
        self.duplicates_found = records.iter().map(|g| g.duplicates.len()).sum();
        self.top_groups = sort_by_duplicate_count(records)
            .into_iter()
            .take(TOP_GROUPS)
            .map(|g| GroupSummary {
                number: g.primary.number,
                title: g.primary.title.clone(),
                duplicates: g.duplicates.len(),
            })
            .collect();
    }

    /// Records a written report file.
    pub fn record_output(&mut self, path: &Path) {
        self.outputs.push(path.to_path_buf());
    }

    /// Returns true if the run analyzed at least one issue.
    #[must_use]
    pub fn has_issues(&self) -> bool {
        self.issues_analyzed > 0
    }

    /// Returns true if any duplicate group was found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        self.groups_found > 0
    }
}
