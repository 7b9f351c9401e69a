//! Text normalization applied before any comparison.

use regex::Regex;
use std::sync::LazyLock;

/// Placeholder substituted for dotted version numbers.
pub const VERSION_PLACEHOLDER: &str = "VERSION";

/// Upper bound on normalization passes when searching for a fixpoint.
const MAX_PASSES: usize = 8;

macro_rules! text_pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

text_pattern!(
    URL_PATTERN,
    r"https?://(?:[a-zA-Z0-9$-_@.&+!*(),]|%[0-9a-fA-F]{2})+"
);
text_pattern!(CODE_BLOCK_PATTERN, r"(?s)```.*?```");
text_pattern!(VERSION_PATTERN, r"\d+\.\d+\.\d+(?:\.\d+)?");

/// Normalizes issue text for comparison.
///
/// Lower-cases the text, drops URLs and fenced code blocks, folds dotted
/// version numbers into [`VERSION_PLACEHOLDER`] and collapses whitespace.
/// The pipeline is repeated until the output is stable, so the result is
/// always a fixpoint: `normalize(&normalize(x)) == normalize(x)`.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut current = normalize_once(text);
    for _ in 1..MAX_PASSES {
        let next = normalize_once(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn normalize_once(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = lowercase_preserving_placeholder(text);
    let text = replace_all(&URL_PATTERN, &text, "");
    let text = replace_all(&CODE_BLOCK_PATTERN, &text, "");
    let text = replace_all(&VERSION_PATTERN, &text, VERSION_PLACEHOLDER);
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// `1.2.3` folds to `VERSION`, which must normalize to itself, so the
// placeholder text is never lowered, typed or folded.
fn lowercase_preserving_placeholder(text: &str) -> String {
    text.split(VERSION_PLACEHOLDER)
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(VERSION_PLACEHOLDER)
}

fn replace_all(pattern: &LazyLock<Option<Regex>>, text: &str, replacement: &str) -> String {
    match pattern.as_ref() {
        Some(regex) => regex.replace_all(text, replacement).into_owned(),
        None => text.to_string(),
    }
}
