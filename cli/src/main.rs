//! CLI for the issue duplicate finder.
//!
//! `find` clusters open issues into probable duplicate groups and writes
//! JSON, text and markdown reports. `daily` prints a JSON digest of the
//! issues opened on one day.

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use issue_dedup::{
    build_client, fetch_daily_digest, previous_day, DigestError, RunSummary, Runner,
    RunnerConfig, RunnerError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Issue Dedup - Find duplicate GitHub issues and summarize new ones.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find groups of probable duplicate issues.
    Find(FindArgs),

    /// Print a JSON digest of the issues opened on one day.
    Daily(DailyArgs),
}

/// Repository selection shared by all commands.
#[derive(Args, Debug)]
struct RepoArgs {
    /// Repository owner.
    #[arg(long, default_value = "MicrosoftEdge")]
    owner: String,

    /// Repository name.
    #[arg(long, default_value = "WebView2Feedback")]
    repo: String,

    /// GitHub Personal Access Token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Args, Debug)]
struct FindArgs {
    #[command(flatten)]
    repo: RepoArgs,

    /// Similarity threshold (0-1) for considering issues as duplicates [default: 0.7].
    #[arg(long)]
    threshold: Option<f64>,

    /// Output file for the duplicate groups.
    #[arg(long, default_value = "duplicate-issues.json")]
    output: PathBuf,

    /// Also write a markdown report to this path.
    #[arg(long)]
    markdown: Option<PathBuf>,

    /// Maximum number of issues to analyze.
    #[arg(long)]
    max_issues: Option<usize>,

    /// Read issues from a JSON file instead of the GitHub API.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DailyArgs {
    #[command(flatten)]
    repo: RepoArgs,

    /// Day to summarize, as YYYY-MM-DD (UTC). Defaults to yesterday.
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Find(args) => match find(args).await {
            Ok(summary) => {
                print_summary(&summary);

                if summary.has_issues() {
                    ExitCode::from(0)
                } else {
                    ExitCode::from(1)
                }
            }
            Err(e) => {
                error!(error = %e, "Critical failure");
                ExitCode::from(2)
            }
        },
        Command::Daily(args) => match daily(args).await {
            Ok(json) => {
                println!("{json}");
                ExitCode::from(0)
            }
            Err(e) => {
                error!(error = %e, "Critical failure");
                ExitCode::from(2)
            }
        },
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

async fn find(args: FindArgs) -> Result<RunSummary, RunnerError> {
    let config = RunnerConfig::new(args.repo.owner, args.repo.repo)
        .with_token(args.repo.token)
        .with_threshold(args.threshold)
        .with_output_path(args.output)
        .with_markdown_path(args.markdown)
        .with_max_issues(args.max_issues)
        .with_input_path(args.input)
        .with_config_path(args.config);

    let runner = Runner::new(config)?;
    runner.run().await
}

async fn daily(args: DailyArgs) -> Result<String, DigestError> {
    let date = args.date.unwrap_or_else(|| previous_day(Utc::now()));
    let octocrab = build_client(args.repo.token.as_deref(), None)?;

    let digest = fetch_daily_digest(&octocrab, &args.repo.owner, &args.repo.repo, date).await?;
    digest.to_json()
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    if !summary.has_issues() {
        println!("\nNo issues found or error fetching issues.");
        return;
    }

    println!("\nSummary:");
    println!("  Issues analyzed: {}", summary.issues_analyzed);

    if summary.has_duplicates() {
        println!("  Total duplicate groups: {}", summary.groups_found);
        println!(
            "  Total potential duplicate issues: {}",
            summary.duplicates_found
        );
        println!("\nTop {} groups with most duplicates:", summary.top_groups.len());
        for (rank, group) in summary.top_groups.iter().enumerate() {
            println!(
                "  {}. Issue #{}: {} duplicates",
                rank + 1,
                group.number,
                group.duplicates
            );
            println!("     {}", short_title(&group.title));
        }
    } else {
        println!("  No duplicate issues found with the current threshold.");
        println!(
            "  Try lowering the threshold (current: {})",
            summary.threshold
        );
    }

    for path in &summary.outputs {
        println!("  Wrote {}", path.display());
    }
}

fn short_title(title: &str) -> String {
    const MAX_CHARS: usize = 70;
    if title.chars().count() > MAX_CHARS {
        format!("{}...", title.chars().take(MAX_CHARS).collect::<String>())
    } else {
        title.to_string()
    }
}
