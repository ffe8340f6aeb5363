//! Metadata extraction into the aggregate indices.
//!
//! An `Aggregator` is owned by the scan loop and fed one parsed document at
//! a time; once the loop is done it is handed to the report writer.

use crate::models::document;
use crate::models::index::IdIndex;
use crate::models::{RunSummary, SkippedEntry};
use serde_yaml::Value;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Default)]
pub struct Aggregator {
    /// operator -> rule ids using it
    pub operators: IdIndex,
    /// rule type -> rule ids classified under it
    pub rule_types: IdIndex,
    /// files that could not be parsed, in processing order
    pub skipped: Vec<SkippedEntry>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract metadata from one document.
    ///
    /// Documents without `Core.Id` (including non-mapping documents) are
    /// ignored and `None` is returned. Otherwise the id is registered under
    /// its rule type and under every operator found in `Check` and
    /// `Operations`.
    pub fn ingest(&mut self, doc: &Value) -> Option<String> {
        let id = document::core_id(doc)?;
        let rule_type = document::rule_type(doc);
        self.rule_types.insert(&rule_type, &id);

        let operators = document::check_section(doc)
            .items()
            .into_iter()
            .chain(document::operations(doc).iter())
            .filter_map(document::item_operator);
        for op in operators {
            self.operators.insert(&op, &id);
        }
        debug!(rule = %id, rule_type = %rule_type, "registered rule");
        Some(id)
    }

    pub fn skip(&mut self, filename: impl Into<String>, error: impl Into<String>) {
        self.skipped.push(SkippedEntry {
            filename: filename.into(),
            error: error.into(),
        });
    }

    pub fn rules_processed(&self) -> usize {
        self.rule_types.total_ids()
    }

    pub fn summary(&self, output: PathBuf) -> RunSummary {
        RunSummary {
            output,
            rules_processed: self.rules_processed(),
            rules_skipped: self.skipped.len(),
            rule_types: self.rule_types.len(),
        }
    }
}
