//! Markdown report renderer.

use super::json::GroupRecord;
use super::text::{created, labels};
use super::{sort_by_duplicate_count, ReportContext, ReportError};
use handlebars::{no_escape, Handlebars};
use serde_json::{json, Value};

const TEMPLATE_NAME: &str = "duplicates";
const TEMPLATE: &str = include_str!("templates/duplicates.md.hbs");

/// Titles longer than this are shortened in the summary table.
const MAX_TABLE_TITLE_CHARS: usize = 70;

/// Creates a Handlebars registry suited to markdown output.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    // Disable HTML escaping for markdown output
    hbs.register_escape_fn(no_escape);

    // Enable strict mode to catch missing variables
    hbs.set_strict_mode(true);

    hbs
}

/// Renders the markdown duplicate report.
pub struct MarkdownRenderer {
    handlebars: Handlebars<'static>,
}

impl MarkdownRenderer {
    /// Creates a renderer with the built-in report template.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::RegistrationError`] if the template is invalid.
    pub fn new() -> Result<Self, ReportError> {
        Self::with_template(TEMPLATE)
    }

    /// Creates a renderer with a custom report template.
    ///
    /// The template sees `repository`, `generated`, `threshold`,
    /// `group_count`, `duplicate_count`, `top` (null without groups) and
    /// `groups`, ranked largest first.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::RegistrationError`] if the template is invalid.
    pub fn with_template(template: &str) -> Result<Self, ReportError> {
        let mut handlebars = create_handlebars_registry();
        handlebars.register_template_string(TEMPLATE_NAME, template)?;
        Ok(Self { handlebars })
    }

    /// Renders the report for `records`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::RenderError`] if rendering fails.
    pub fn render(
        &self,
        records: &[GroupRecord],
        context: &ReportContext,
    ) -> Result<String, ReportError> {
        let data = template_data(records, context);
        Ok(self.handlebars.render(TEMPLATE_NAME, &data)?)
    }
}

fn template_data(records: &[GroupRecord], context: &ReportContext) -> Value {
    let ranked = sort_by_duplicate_count(records);
    let duplicate_count: usize = records.iter().map(|g| g.duplicates.len()).sum();

    let top = ranked.first().map_or(Value::Null, |group| {
        json!({
            "number": group.primary.number,
            "count": group.duplicates.len(),
        })
    });

    let groups: Vec<Value> = ranked
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let primary = &group.primary;
            let duplicates: Vec<Value> = group
                .duplicates
                .iter()
                .map(|dup| {
                    json!({
                        "number": dup.number,
                        "title": dup.title,
                        "url": dup.url,
                        "similarity": format!("{:.1}%", dup.similarity * 100.0),
                    })
                })
                .collect();

            json!({
                "rank": index + 1,
                "number": primary.number,
                "title": primary.title,
                "short_title": table_title(&primary.title),
                "url": primary.url,
                "created": created(primary.created_at),
                "labels": labels(&primary.labels),
                "count": group.duplicates.len(),
                "duplicates": duplicates,
            })
        })
        .collect();

    json!({
        "repository": context.repository,
        "generated": context.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        "threshold": context.threshold.to_string(),
        "group_count": records.len(),
        "duplicate_count": duplicate_count,
        "top": top,
        "groups": groups,
    })
}

/// Shortens a title for a table cell and escapes cell separators.
fn table_title(title: &str) -> String {
    let shortened = if title.chars().count() > MAX_TABLE_TITLE_CHARS {
        let head: String = title.chars().take(MAX_TABLE_TITLE_CHARS - 3).collect();
        format!("{head}...")
    } else {
        title.to_string()
    };
    shortened.replace('|', "\\|")
}
