//! Duplicate reports.
//!
//! Engine groups are turned into owned [`GroupRecord`]s once, then rendered
//! as JSON (the machine-readable result), plain text and markdown.

mod error;
mod json;
mod renderer;
mod text;

pub use error::ReportError;
pub use json::{render_json, to_records, DuplicateRecord, GroupRecord, IssueSummary};
pub use renderer::{create_handlebars_registry, MarkdownRenderer};
pub use text::render_text_report;

use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::path::{Path, PathBuf};
use tracing::info;

/// Run details shown in report headers.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportContext {
    /// Repository in `owner/repo` form.
    pub repository: String,

    /// Threshold the groups were found with.
    pub threshold: f64,

    /// Report timestamp.
    pub generated_at: DateTime<Utc>,
}

impl ReportContext {
    #[must_use]
    pub fn new(
        repository: impl Into<String>,
        threshold: f64,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            repository: repository.into(),
            threshold,
            generated_at,
        }
    }
}

/// Orders groups by duplicate count, largest first, keeping ties in order.
#[must_use]
pub fn sort_by_duplicate_count(records: &[GroupRecord]) -> Vec<&GroupRecord> {
    let mut sorted: Vec<&GroupRecord> = records.iter().collect();
    sorted.sort_by_key(|group| Reverse(group.duplicates.len()));
    sorted
}

/// Returns the text report path for a JSON output path.
///
/// `duplicate-issues.json` becomes `duplicate-issues.txt`.
#[must_use]
pub fn text_report_path(json_path: &Path) -> PathBuf {
    json_path.with_extension("txt")
}

/// Writes a report file, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ReportError::IoError`] if the file cannot be written.
pub fn write_report(path: &Path, content: &str) -> Result<(), ReportError> {
    let io_error = |e| ReportError::IoError {
        path: path.display().to_string(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, content).map_err(io_error)?;

    info!(path = %path.display(), "Wrote report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn group(primary: u64, duplicates: usize) -> GroupRecord {
        GroupRecord {
            primary: IssueSummary {
                number: primary,
                title: String::new(),
                url: String::new(),
                created_at: None,
                labels: Vec::new(),
            },
            duplicates: (0..duplicates)
                .map(|i| DuplicateRecord {
                    number: primary * 100 + i as u64,
                    title: String::new(),
                    url: String::new(),
                    created_at: None,
                    similarity: 1.0,
                    similarity_breakdown: Default::default(),
                    labels: Vec::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn sort_is_stable_for_equal_sizes() {
        let records = [group(1, 1), group(2, 3), group(3, 1), group(4, 2)];
        let order: Vec<u64> = sort_by_duplicate_count(&records)
            .iter()
            .map(|g| g.primary.number)
            .collect();
        assert_eq!(order, vec![2, 4, 1, 3]);
    }

    #[test]
    fn text_path_replaces_extension() {
        assert_eq!(
            text_report_path(Path::new("out/duplicate-issues.json")),
            PathBuf::from("out/duplicate-issues.txt")
        );
        assert_eq!(
            text_report_path(Path::new("report")),
            PathBuf::from("report.txt")
        );
    }

    #[test]
    fn write_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("report.md");

        write_report(&path, "# report").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# report");
    }
}
