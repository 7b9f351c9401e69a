//! Orchestrates duplicate finding runs.

mod config;
mod error;

pub use config::{RunnerConfig, DEFAULT_OUTPUT_PATH};
pub use error::RunnerError;

use crate::config::DedupConfig;
use crate::engine::{validate_threshold, DuplicateEngine};
use crate::issue::IssueRecord;
use crate::report::{
    render_json, render_text_report, text_report_path, to_records, write_report, GroupRecord,
    MarkdownRenderer, ReportContext,
};
use crate::source::{build_client, fetch_open_issues, load_issues_file};
use crate::summary::RunSummary;
use chrono::Utc;
use tracing::{info, warn};

/// Runs the fetch, cluster and report pipeline for one repository.
pub struct Runner {
    config: RunnerConfig,
    settings: DedupConfig,
    threshold: f64,
    engine: DuplicateEngine,
    renderer: MarkdownRenderer,
}

impl Runner {
    /// Builds a runner, loading and validating the configuration file if set.
    ///
    /// A threshold given on the runner configuration takes precedence over
    /// the file.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the configuration is invalid.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let settings = match config.config_path() {
            Some(path) => DedupConfig::load(path)?,
            None => DedupConfig::default(),
        };

        let threshold = config.threshold().unwrap_or(settings.threshold);
        validate_threshold(threshold)?;

        let engine = DuplicateEngine::new(settings.similarity())?;
        let renderer = MarkdownRenderer::new()?;

        Ok(Self {
            config,
            settings,
            threshold,
            engine,
            renderer,
        })
    }

    /// Returns the threshold the run will use.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Executes the full run and writes the reports.
    ///
    /// An empty issue set is not an error; the returned summary then has no
    /// analyzed issues and no report is written.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if fetching, clustering or writing fails.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.threshold);

        let issues = self.load_issues().await?;
        summary.issues_analyzed = issues.len();

        if issues.is_empty() {
            warn!("No issues found");
            return Ok(summary);
        }

        let groups = self.engine.cluster(&issues, self.threshold)?;
        let records = to_records(&groups);
        summary.record_groups(&records);

        self.write_reports(&records, &mut summary)?;
        Ok(summary)
    }

    async fn load_issues(&self) -> Result<Vec<IssueRecord>, RunnerError> {
        if let Some(path) = self.config.input_path() {
            return Ok(load_issues_file(path)?);
        }

        let octocrab = build_client(
            self.config.token(),
            self.settings.source.api_base_url.as_deref(),
        )?;
        let max_issues = self.config.max_issues().or(self.settings.source.max_issues);

        Ok(fetch_open_issues(
            &octocrab,
            self.config.owner(),
            self.config.repo(),
            max_issues,
        )
        .await?)
    }

    fn write_reports(
        &self,
        records: &[GroupRecord],
        summary: &mut RunSummary,
    ) -> Result<(), RunnerError> {
        let context = ReportContext::new(self.config.repository(), self.threshold, Utc::now());

        let json_path = self.config.output_path();
        write_report(json_path, &render_json(records)?)?;
        summary.record_output(json_path);

        let text_path = text_report_path(json_path);
        write_report(&text_path, &render_text_report(records, &context))?;
        summary.record_output(&text_path);

        if let Some(markdown_path) = self.config.markdown_path() {
            write_report(markdown_path, &self.renderer.render(records, &context)?)?;
            summary.record_output(markdown_path);
        }

        info!(
            groups = summary.groups_found,
            duplicates = summary.duplicates_found,
            "Reports written"
        );
        Ok(())
    }
}
