//! Loosely-typed issue shape accepted from files and API dumps.

use super::IssueRecord;
use crate::engine::EngineError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// An issue as it appears in GitHub REST responses or hand-written fixtures.
///
/// Every field is optional here; [`IssueRecord::try_from`] decides what is
/// recoverable. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawIssue {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<RawLabel>,
    pub created_at: Option<DateTime<Utc>>,
    pub html_url: Option<String>,
    pub url: Option<String>,
    pub assignee: Option<RawUser>,
    pub pull_request: Option<serde_json::Value>,
}

/// A label, either a bare name or a GitHub label object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLabel {
    Name(String),
    Object { name: String },
}

impl RawLabel {
    /// Returns the label name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Object { name } => name,
        }
    }
}

/// A user, either a bare login or a GitHub user object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawUser {
    Login(String),
    Object { login: String },
}

impl RawUser {
    /// Returns the user login.
    #[must_use]
    pub fn login(&self) -> &str {
        match self {
            Self::Login(login) | Self::Object { login } => login,
        }
    }
}

impl RawIssue {
    /// Returns true if the entry is a pull request rather than an issue.
    #[must_use]
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

impl TryFrom<RawIssue> for IssueRecord {
    type Error = EngineError;

    fn try_from(raw: RawIssue) -> Result<Self, Self::Error> {
        let number = match raw.number {
            Some(0) => {
                return Err(EngineError::ValidationError {
                    message: "issue number must be positive".to_string(),
                })
            }
            Some(number) => number,
            None => {
                return Err(EngineError::ValidationError {
                    message: "issue has no number".to_string(),
                })
            }
        };

        Ok(IssueRecord {
            number,
            title: raw.title.unwrap_or_default(),
            body: raw.body.unwrap_or_default(),
            labels: raw.labels.iter().map(|l| l.name().to_string()).collect(),
            created_at: raw.created_at,
            url: raw.html_url.or(raw.url).unwrap_or_default(),
            assignee: raw.assignee.map(|a| a.login().to_string()),
        })
    }
}
