//! Serializable report records.

use super::ReportError;
use crate::engine::{DuplicateGroup, DuplicateMember};
use crate::issue::IssueRecord;
use crate::similarity::{round_to, SimilarityBreakdown};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Decimal places kept for scores in reports.
pub const SCORE_PLACES: i32 = 3;

/// Issue details shown for a group's primary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueSummary {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub labels: Vec<String>,
}

/// A duplicate and its scores against the primary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateRecord {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub similarity: f64,
    pub similarity_breakdown: SimilarityBreakdown,
    pub labels: Vec<String>,
}

/// One duplicate group as written to reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRecord {
    pub primary: IssueSummary,
    pub duplicates: Vec<DuplicateRecord>,
}

impl From<&IssueRecord> for IssueSummary {
    fn from(issue: &IssueRecord) -> Self {
        Self {
            number: issue.number,
            title: issue.title.clone(),
            url: issue.url.clone(),
            created_at: issue.created_at,
            labels: issue.label_names(),
        }
    }
}

impl From<&DuplicateMember<'_>> for DuplicateRecord {
    fn from(member: &DuplicateMember<'_>) -> Self {
        Self {
            number: member.issue.number,
            title: member.issue.title.clone(),
            url: member.issue.url.clone(),
            created_at: member.issue.created_at,
            similarity: round_to(member.score, SCORE_PLACES),
            similarity_breakdown: member.breakdown.rounded(SCORE_PLACES),
            labels: member.issue.label_names(),
        }
    }
}

impl From<&DuplicateGroup<'_>> for GroupRecord {
    fn from(group: &DuplicateGroup<'_>) -> Self {
        Self {
            primary: IssueSummary::from(group.primary),
            duplicates: group.members.iter().map(DuplicateRecord::from).collect(),
        }
    }
}

/// Converts engine groups into owned report records, keeping their order.
#[must_use]
pub fn to_records(groups: &[DuplicateGroup<'_>]) -> Vec<GroupRecord> {
    groups.iter().map(GroupRecord::from).collect()
}

/// Renders the records as a pretty-printed JSON array.
///
/// # Errors
///
/// Returns [`ReportError::SerializeError`] if serialization fails.
pub fn render_json(records: &[GroupRecord]) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(records)?)
}
