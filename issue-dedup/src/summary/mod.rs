//! Run summary types and helpers.

mod run_summary;

pub use run_summary::{GroupSummary, RunSummary, TOP_GROUPS};
