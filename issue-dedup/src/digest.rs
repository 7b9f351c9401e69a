//! Daily digest of newly opened issues.

use crate::issue::IssueRecord;
use crate::source::{fetch_issues_created_on, SourceError};
use chrono::{DateTime, Days, NaiveDate, Utc};
use octocrab::Octocrab;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while building a digest.
#[derive(Debug, Error)]
pub enum DigestError {
    /// Fetching the day's issues failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// JSON serialization error.
    #[error("Failed to serialize digest: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Issues opened on one UTC day, in the digest's JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyDigest {
    pub total: usize,
    pub issue_list: Vec<DigestEntry>,
}

/// One line of the digest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestEntry {
    pub issue_name: String,
    pub issue_link: String,
    pub issue_tags: Vec<String>,
    pub issue_assignee: Option<String>,
}

impl DailyDigest {
    /// Builds the digest from the issues created on `date`, keeping input order.
    #[must_use]
    pub fn from_issues(issues: &[IssueRecord], date: NaiveDate) -> Self {
        let issue_list: Vec<DigestEntry> = issues
            .iter()
            .filter(|issue| issue.created_on() == Some(date))
            .map(|issue| DigestEntry {
                issue_name: issue.title.clone(),
                issue_link: issue.url.clone(),
                issue_tags: issue.label_names(),
                issue_assignee: issue.assignee.clone(),
            })
            .collect();

        Self {
            total: issue_list.len(),
            issue_list,
        }
    }

    /// Serializes the digest as compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::SerializeError`] if serialization fails.
    pub fn to_json(&self) -> Result<String, DigestError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Returns the day before `now`, the default digest day.
#[must_use]
pub fn previous_day(now: DateTime<Utc>) -> NaiveDate {
    let today = now.date_naive();
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}

/// Fetches the issues opened on `date` and builds their digest.
///
/// # Errors
///
/// Returns [`DigestError::Source`] if fetching fails.
pub async fn fetch_daily_digest(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    date: NaiveDate,
) -> Result<DailyDigest, DigestError> {
    let issues = fetch_issues_created_on(octocrab, owner, repo, date).await?;
    Ok(DailyDigest::from_issues(&issues, date))
}
