use std::fs;
use std::path::PathBuf;

use issue_dedup::{Runner, RunnerConfig, RunnerError, SourceError};
use serde_json::Value;
use tempfile::TempDir;

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn offline_config(temp: &TempDir) -> RunnerConfig {
    RunnerConfig::new("MicrosoftEdge", "WebView2Feedback")
        .with_input_path(Some(fixtures_root().join("sample-issues.json")))
        .with_output_path(temp.path().join("out").join("duplicate-issues.json"))
}

#[tokio::test]
async fn writes_json_and_text_reports() {
    let temp = TempDir::new().unwrap();
    let config = offline_config(&temp).with_threshold(Some(0.6));
    let runner = Runner::new(config).unwrap();

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.issues_analyzed, 6);
    assert_eq!(summary.groups_found, 1);
    assert_eq!(summary.duplicates_found, 1);
    assert_eq!(summary.outputs.len(), 2);

    let json_path = temp.path().join("out/duplicate-issues.json");
    let json: Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json[0]["primary"]["number"], 5247);
    assert_eq!(json[0]["primary"]["labels"][0], "bug");
    assert_eq!(json[0]["duplicates"][0]["number"], 5248);
    assert_eq!(json[0]["duplicates"][0]["similarity"], 0.692);
    assert_eq!(json[0]["duplicates"][0]["similarity_breakdown"]["keywords"], 0.75);

    let text = fs::read_to_string(temp.path().join("out/duplicate-issues.txt")).unwrap();
    assert!(text.contains("MicrosoftEdge/WebView2Feedback Duplicate Issues Report"));
    assert!(text.contains("  - #5248 (Similarity: 69.2%)"));
}

#[tokio::test]
async fn config_file_threshold_and_markdown_report() {
    let temp = TempDir::new().unwrap();
    let markdown = temp.path().join("DUPLICATE_BUGS_REPORT.md");
    let config = offline_config(&temp)
        .with_config_path(Some(fixtures_root().join("dedup.toml")))
        .with_markdown_path(Some(markdown.clone()));

    let summary = Runner::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.threshold, 0.5);
    assert_eq!(summary.groups_found, 2);
    assert_eq!(summary.duplicates_found, 2);
    assert_eq!(summary.top_groups[0].number, 5247);
    assert_eq!(summary.top_groups[1].number, 5406);
    assert_eq!(summary.outputs.len(), 3);

    let report = fs::read_to_string(markdown).unwrap();
    assert!(report.contains("- **Potential duplicate issues:** 2"));
    assert!(report.contains("#5247 with 1 duplicates"));
    assert!(report.contains("### 2. Issue #5406:"));
}

#[tokio::test]
async fn default_threshold_finds_no_fixture_duplicates() {
    let temp = TempDir::new().unwrap();
    let summary = Runner::new(offline_config(&temp)).unwrap().run().await.unwrap();

    assert_eq!(summary.threshold, 0.7);
    assert_eq!(summary.issues_analyzed, 6);
    assert!(!summary.has_duplicates());
}

#[tokio::test]
async fn no_duplicates_still_writes_reports() {
    let temp = TempDir::new().unwrap();
    let config = offline_config(&temp).with_threshold(Some(0.95));

    let summary = Runner::new(config).unwrap().run().await.unwrap();

    assert!(summary.has_issues());
    assert!(!summary.has_duplicates());
    let json = fs::read_to_string(temp.path().join("out/duplicate-issues.json")).unwrap();
    assert_eq!(json, "[]");
}

#[tokio::test]
async fn missing_input_file_is_a_source_error() {
    let temp = TempDir::new().unwrap();
    let config = RunnerConfig::new("o", "r")
        .with_input_path(Some(temp.path().join("absent.json")))
        .with_output_path(temp.path().join("out.json"));

    let result = Runner::new(config).unwrap().run().await;
    assert!(matches!(
        result,
        Err(RunnerError::Source(SourceError::IoError { .. }))
    ));
}
