//! Issue sources: the GitHub REST API and JSON files.
//!
//! Both produce validated [`IssueRecord`]s with pull requests filtered out.
//! JSON files use the shape of the GitHub issues endpoint, so a saved API
//! response can be replayed offline.

mod error;

pub use error::SourceError;

use crate::issue::{records_from_raw, IssueRecord, RawIssue};
use crate::rate_limit::reserve_page;
use chrono::NaiveDate;
use octocrab::models::issues::Issue;
use octocrab::params::{self, State};
use octocrab::{Octocrab, Page};
use std::path::Path;
use tracing::{debug, info, info_span, warn, Instrument};

/// Issues requested per page.
const RESULTS_PER_PAGE: u8 = 100;

/// Builds a GitHub client.
///
/// Without a token the client is anonymous and subject to the lower
/// unauthenticated rate limit.
///
/// # Errors
///
/// Returns [`SourceError::GitHubError`] if the base URL is invalid or the
/// client cannot be constructed.
pub fn build_client(
    token: Option<&str>,
    api_base_url: Option<&str>,
) -> Result<Octocrab, SourceError> {
    let mut builder = Octocrab::builder();
    if let Some(token) = token {
        builder = builder.personal_token(token.to_string());
    }
    if let Some(base) = api_base_url {
        builder = builder.base_uri(base)?;
    }
    Ok(builder.build()?)
}

/// Fetches open issues from `owner/repo`, newest first.
///
/// Stops after `max_issues` issues when given. A failure on the first page is
/// an error; a failure on a later page ends pagination and keeps what was
/// already fetched.
///
/// # Errors
///
/// Returns [`SourceError`] if the first page or its budget check fails.
pub async fn fetch_open_issues(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    max_issues: Option<usize>,
) -> Result<Vec<IssueRecord>, SourceError> {
    let span = info_span!("fetch_open_issues", repo = %format!("{owner}/{repo}"));

    async {
        info!("Fetching open issues");
        reserve_page(octocrab).await?;

        let mut page = octocrab
            .issues(owner, repo)
            .list()
            .state(State::Open)
            .per_page(RESULTS_PER_PAGE)
            .send()
            .await?;

        let mut issues = Vec::new();
        let mut page_number = 1;
        loop {
            let reached_max = append_page(&mut issues, take_issues(&mut page), max_issues);
            debug!(page = page_number, total = issues.len(), "Fetched page");
            if reached_max {
                break;
            }

            match next_page(octocrab, &page).await {
                Some(next) => page = next,
                None => break,
            }
            page_number += 1;
        }

        info!(count = issues.len(), "Fetched open issues");
        Ok(issues)
    }
    .instrument(span)
    .await
}

/// Fetches open issues created on `date` (UTC).
///
/// Issues are listed newest first, so pagination stops at the first issue
/// created before `date`.
///
/// # Errors
///
/// Returns [`SourceError`] if the first page or its budget check fails.
pub async fn fetch_issues_created_on(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    date: NaiveDate,
) -> Result<Vec<IssueRecord>, SourceError> {
    let span = info_span!(
        "fetch_issues_created_on",
        repo = %format!("{owner}/{repo}"),
        %date
    );

    async {
        info!("Fetching new issues");
        reserve_page(octocrab).await?;

        let mut page = octocrab
            .issues(owner, repo)
            .list()
            .state(State::Open)
            .sort(params::issues::Sort::Created)
            .direction(params::Direction::Descending)
            .per_page(RESULTS_PER_PAGE)
            .send()
            .await?;

        let mut issues = Vec::new();
        loop {
            let finished = collect_created_on(take_issues(&mut page), date, &mut issues);
            if finished {
                break;
            }

            match next_page(octocrab, &page).await {
                Some(next) => page = next,
                None => break,
            }
        }

        info!(count = issues.len(), "Fetched new issues");
        Ok(issues)
    }
    .instrument(span)
    .await
}

/// Loads issues from a JSON array in GitHub issues shape.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or parsed, or if a
/// record has no issue number.
pub fn load_issues_file(path: &Path) -> Result<Vec<IssueRecord>, SourceError> {
    info!(path = %path.display(), "Loading issues from file");

    let content = std::fs::read_to_string(path).map_err(|e| SourceError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let raw: Vec<RawIssue> =
        serde_json::from_str(&content).map_err(|e| SourceError::ParseError {
            path: path.display().to_string(),
            source: e,
        })?;

    let issues = records_from_raw(raw)?;
    info!(count = issues.len(), "Loaded issues");
    Ok(issues)
}

/// Appends the issues created on `date` and reports whether the scan is over.
///
/// Expects issues newest first; the scan ends at the first older issue.
fn collect_created_on(
    page: Vec<IssueRecord>,
    date: NaiveDate,
    out: &mut Vec<IssueRecord>,
) -> bool {
    for issue in page {
        match issue.created_on() {
            Some(created) if created < date => return true,
            Some(created) if created == date => out.push(issue),
            _ => {}
        }
    }
    false
}

/// Appends `page` to `issues`, keeping at most `max_issues`.
///
/// Returns true once the cap is reached.
fn append_page(
    issues: &mut Vec<IssueRecord>,
    page: Vec<IssueRecord>,
    max_issues: Option<usize>,
) -> bool {
    issues.extend(page);
    match max_issues {
        Some(max) if issues.len() >= max => {
            issues.truncate(max);
            true
        }
        _ => false,
    }
}

/// Moves the issues out of a page.
fn take_issues(page: &mut Page<Issue>) -> Vec<IssueRecord> {
    issue_records(std::mem::take(&mut page.items))
}

/// Converts API issues to records, dropping pull requests.
fn issue_records(items: Vec<Issue>) -> Vec<IssueRecord> {
    items
        .into_iter()
        .filter(|issue| issue.pull_request.is_none())
        .map(to_record)
        .collect()
}

/// Fetches the page after `page`, if any.
///
/// Errors past the first page end pagination instead of failing the fetch.
async fn next_page(octocrab: &Octocrab, page: &Page<Issue>) -> Option<Page<Issue>> {
    if page.next.is_none() {
        return None;
    }

    let next = async {
        reserve_page(octocrab).await?;
        Ok::<_, SourceError>(octocrab.get_page::<Issue>(&page.next).await?)
    }
    .await;
    keep_fetched_on_error(next)
}

/// Turns a failed follow-up page into the end of pagination.
fn keep_fetched_on_error<T>(next: Result<Option<T>, SourceError>) -> Option<T> {
    match next {
        Ok(next) => next,
        Err(e) => {
            warn!(error = %e, "Failed to fetch next page, keeping issues fetched so far");
            None
        }
    }
}

fn to_record(issue: Issue) -> IssueRecord {
    IssueRecord {
        number: issue.number,
        title: issue.title,
        body: issue.body.unwrap_or_default(),
        labels: issue.labels.into_iter().map(|label| label.name).collect(),
        created_at: Some(issue.created_at),
        url: issue.html_url.to_string(),
        assignee: issue.assignee.map(|user| user.login),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn api_page() -> Vec<Issue> {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/github-issues-page.json");
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    fn numbered(numbers: std::ops::Range<u64>) -> Vec<IssueRecord> {
        numbers.map(|n| IssueRecord::new(n, format!("issue {n}"))).collect()
    }

    fn created(number: u64, day: u32, hour: u32) -> IssueRecord {
        IssueRecord::new(number, format!("issue {number}"))
            .with_created_at(Utc.with_ymd_and_hms(2025, 5, day, hour, 0, 0).unwrap())
    }

    #[test]
    fn collects_only_issues_from_the_target_day() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 19).unwrap();
        let mut out = Vec::new();

        let page = vec![created(5, 20, 1), created(4, 19, 23), created(3, 19, 0)];
        assert!(!collect_created_on(page, date, &mut out));

        let page = vec![created(2, 18, 23), created(1, 19, 12)];
        assert!(collect_created_on(page, date, &mut out));

        let numbers: Vec<u64> = out.iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![4, 3]);
    }

    #[test]
    fn skips_issues_without_timestamp() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 19).unwrap();
        let mut out = Vec::new();
        let page = vec![IssueRecord::new(9, "undated"), created(8, 19, 5)];

        assert!(!collect_created_on(page, date, &mut out));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].number, 8);
    }

    #[test]
    fn loads_issue_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("issues.json");
        fs::write(
            &path,
            r#"[
                {"number": 1, "title": "Crash", "labels": [{"name": "bug"}]},
                {"number": 2, "title": "PR", "pull_request": {}},
                {"number": 3, "body": "untitled"}
            ]"#,
        )
        .unwrap();

        let issues = load_issues_file(&path).unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[1].title, "");
    }

    #[test]
    fn load_rejects_record_without_number() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("issues.json");
        fs::write(&path, r#"[{"title": "who am I"}]"#).unwrap();

        assert!(matches!(
            load_issues_file(&path),
            Err(SourceError::InvalidRecord(_))
        ));
    }

    #[test]
    fn load_reports_parse_and_io_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("issues.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            load_issues_file(&path),
            Err(SourceError::ParseError { .. })
        ));
        assert!(matches!(
            load_issues_file(&temp.path().join("missing.json")),
            Err(SourceError::IoError { .. })
        ));
    }

    #[test]
    fn api_issues_become_records_without_pull_requests() {
        let records = issue_records(api_page());

        let numbers: Vec<u64> = records.iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![5412, 5299]);

        let gamepad = &records[0];
        assert_eq!(
            gamepad.url,
            "https://github.com/MicrosoftEdge/WebView2Feedback/issues/5412"
        );
        assert_eq!(gamepad.label_names(), vec!["bug", "tracked"]);
        assert_eq!(gamepad.assignee.as_deref(), Some("webview2-triage"));
        assert_eq!(
            gamepad.created_at,
            Some(Utc.with_ymd_and_hms(2025, 6, 2, 8, 15, 0).unwrap())
        );

        let devtools = &records[1];
        assert_eq!(devtools.body, "");
        assert!(devtools.labels.is_empty());
        assert_eq!(devtools.assignee, None);
    }

    #[test]
    fn append_page_stops_at_max_issues() {
        let mut issues = numbered(1..4);
        assert!(append_page(&mut issues, numbered(4..8), Some(5)));

        let numbers: Vec<u64> = issues.iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn append_page_reports_exact_cap() {
        let mut issues = Vec::new();
        assert!(append_page(&mut issues, numbered(1..3), Some(2)));
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn append_page_without_cap_keeps_everything() {
        let mut issues = numbered(1..3);
        assert!(!append_page(&mut issues, numbered(3..6), None));
        assert!(!append_page(&mut issues, Vec::new(), Some(10)));
        assert_eq!(issues.len(), 5);
    }

    #[test]
    fn later_page_errors_end_pagination() {
        let budget_failure = SourceError::IoError {
            path: "rate_limit".to_string(),
            source: io::Error::other("budget endpoint unavailable"),
        };
        assert_eq!(keep_fetched_on_error::<u32>(Err(budget_failure)), None);
        assert_eq!(keep_fetched_on_error(Ok(Some(2u32))), Some(2));
        assert_eq!(keep_fetched_on_error::<u32>(Ok(None)), None);
    }
}
