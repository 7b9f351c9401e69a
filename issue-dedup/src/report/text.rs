//! Plain-text duplicate report.

use super::json::GroupRecord;
use super::{sort_by_duplicate_count, ReportContext};
use chrono::{DateTime, SecondsFormat, Utc};

const RULE_WIDTH: usize = 80;

/// Renders the human-readable report.
///
/// Groups are listed largest first; groups of equal size keep their order.
#[must_use]
pub fn render_text_report(records: &[GroupRecord], context: &ReportContext) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let mut lines = vec![
        heavy.clone(),
        format!("{} Duplicate Issues Report", context.repository),
        format!(
            "Generated: {}",
            context.generated_at.format("%Y-%m-%d %H:%M:%S")
        ),
        format!("Total duplicate groups found: {}", records.len()),
        heavy,
        String::new(),
    ];

    for (rank, group) in sort_by_duplicate_count(records).into_iter().enumerate() {
        let primary = &group.primary;
        lines.push(format!(
            "Group {}: {} potential duplicates",
            rank + 1,
            group.duplicates.len()
        ));
        lines.push("-".repeat(RULE_WIDTH));
        lines.push(format!("Primary Issue: #{}", primary.number));
        lines.push(format!("Title: {}", primary.title));
        lines.push(format!("URL: {}", primary.url));
        lines.push(format!("Created: {}", created(primary.created_at)));
        lines.push(format!("Labels: {}", labels(&primary.labels)));
        lines.push(String::new());
        lines.push("Potential Duplicates:".to_string());

        for dup in &group.duplicates {
            let b = &dup.similarity_breakdown;
            lines.push(format!(
                "  - #{} (Similarity: {:.1}%)",
                dup.number,
                dup.similarity * 100.0
            ));
            lines.push(format!("    Title: {}", dup.title));
            lines.push(format!("    URL: {}", dup.url));
            lines.push(format!("    Created: {}", created(dup.created_at)));
            lines.push(format!("    Labels: {}", labels(&dup.labels)));
            lines.push(format!(
                "    Breakdown: Title={:.2}, Body={:.2}, Labels={:.2}, Keywords={:.2}",
                b.title, b.body, b.labels, b.keywords
            ));
            lines.push(String::new());
        }

        lines.push(String::new());
    }

    lines.join("\n")
}

pub(super) fn created(created_at: Option<DateTime<Utc>>) -> String {
    created_at.map_or_else(
        || "unknown".to_string(),
        |ts| ts.to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

pub(super) fn labels(labels: &[String]) -> String {
    if labels.is_empty() {
        "None".to_string()
    } else {
        labels.join(", ")
    }
}
