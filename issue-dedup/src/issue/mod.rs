//! Issue records consumed by the duplicate engine.
//!
//! [`IssueRecord`] is the validated, immutable form of an issue. Sources that
//! read loosely-typed data (JSON dumps, API responses) go through [`RawIssue`]
//! and [`records_from_raw`], which apply the validation policy: a missing
//! title or body becomes an empty string, a missing number aborts the batch.

mod raw;

pub use raw::{RawIssue, RawLabel, RawUser};

use crate::engine::EngineError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

/// A single issue report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRecord {
    /// Unique positive issue number.
    pub number: u64,

    /// Issue title, possibly empty.
    pub title: String,

    /// Issue body, empty when the report had none.
    pub body: String,

    /// Label names attached to the issue.
    pub labels: BTreeSet<String>,

    /// Creation timestamp, when the source provides one.
    pub created_at: Option<DateTime<Utc>>,

    /// Link to the issue. Not used for scoring.
    pub url: String,

    /// Login of the assigned user, if any.
    pub assignee: Option<String>,
}

impl IssueRecord {
    /// Creates a record with the given number and title and no other data.
    #[must_use]
    pub fn new(number: u64, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            body: String::new(),
            labels: BTreeSet::new(),
            created_at: None,
            url: String::new(),
            assignee: None,
        }
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the labels.
    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the issue link.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the assignee login.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Returns the UTC calendar day the issue was created on.
    #[must_use]
    pub fn created_on(&self) -> Option<NaiveDate> {
        self.created_at.map(|ts| ts.date_naive())
    }

    /// Returns the label names in sorted order.
    #[must_use]
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().cloned().collect()
    }
}

/// Converts a batch of raw issues into validated records.
///
/// Pull requests are skipped. The whole batch fails on the first record
/// without a usable number, since grouping identity depends on it.
///
/// # Errors
///
/// Returns [`EngineError::ValidationError`] naming the offending position.
pub fn records_from_raw(raw: Vec<RawIssue>) -> Result<Vec<IssueRecord>, EngineError> {
    raw.into_iter()
        .enumerate()
        .filter(|(_, issue)| !issue.is_pull_request())
        .map(|(index, issue)| {
            IssueRecord::try_from(issue).map_err(|e| match e {
                EngineError::ValidationError { message } => EngineError::ValidationError {
                    message: format!("record {index}: {message}"),
                },
                other => other,
            })
        })
        .collect()
}
