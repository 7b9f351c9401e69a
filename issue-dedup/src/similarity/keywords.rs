//! Domain keyword extraction.

use std::collections::BTreeSet;

/// Built-in vocabulary of product and failure-category terms.
///
/// Matching is by substring, so `"hang"` also fires on `"change"` and
/// `"event"` on `"prevent"`. That looseness is accepted: both sides of a
/// comparison are matched the same way.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "webview2",
    "corewebview2",
    "navigation",
    "crash",
    "freeze",
    "hang",
    "performance",
    "memory leak",
    "authentication",
    "cookie",
    "javascript",
    "pdf",
    "download",
    "print",
    "devtools",
    "fullscreen",
    "scaling",
    "dpi",
    "zoom",
    "bounds",
    "event",
    "exception",
    "error",
];

/// Returns the default vocabulary as owned strings.
#[must_use]
pub fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|k| (*k).to_string()).collect()
}

/// Returns every vocabulary term that occurs in `text`, ignoring case.
#[must_use]
pub fn extract_keywords<S: AsRef<str>>(text: &str, vocabulary: &[S]) -> BTreeSet<String> {
    let text = text.to_lowercase();
    vocabulary
        .iter()
        .map(|term| AsRef::<str>::as_ref(term))
        .filter(|term| !term.is_empty() && text.contains(*term))
        .map(str::to_string)
        .collect()
}
