#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod digest;
pub mod engine;
pub mod issue;
pub mod rate_limit;
pub mod report;
pub mod runner;
pub mod similarity;
pub mod source;
pub mod summary;

pub use config::{ConfigError, DedupConfig, SourceSettings};
pub use digest::{fetch_daily_digest, previous_day, DailyDigest, DigestEntry, DigestError};
pub use engine::{
    cluster, validate_threshold, DuplicateEngine, DuplicateGroup, DuplicateMember, EngineError,
    DEFAULT_THRESHOLD,
};
pub use issue::{records_from_raw, IssueRecord, RawIssue};
pub use rate_limit::{fetch_budget, pause_for_budget, reserve_page, RequestBudget};
pub use report::{
    render_json, render_text_report, text_report_path, to_records, write_report, GroupRecord,
    MarkdownRenderer, ReportContext, ReportError,
};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use similarity::{
    normalize, score, sequence_ratio, SimilarityBreakdown, SimilarityConfig, Weights,
};
pub use source::{
    build_client, fetch_issues_created_on, fetch_open_issues, load_issues_file, SourceError,
};
pub use summary::{GroupSummary, RunSummary};
