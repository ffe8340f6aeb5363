//! Shared data models for aggregation, reporting, and console output.

pub mod document;
pub mod index;

use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A file that could not be parsed, with the reason it was skipped.
pub struct SkippedEntry {
    pub filename: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
/// Totals printed after the report is written.
pub struct RunSummary {
    pub output: PathBuf,
    /// Sum of identifier counts across all rule types.
    pub rules_processed: usize,
    pub rules_skipped: usize,
    pub rule_types: usize,
}
