//! Console rendering of the run summary.

use crate::models::RunSummary;
use owo_colors::OwoColorize;
use serde_json::Value as JsonVal;

/// Summary lines in print order.
pub fn summary_lines(s: &RunSummary) -> Vec<String> {
    vec![
        format!("Results written to {}", s.output.to_string_lossy()),
        format!("Total rules processed: {}", s.rules_processed),
        format!("Total rules skipped: {}", s.rules_skipped),
        format!("Total rule types: {}", s.rule_types),
    ]
}

/// Print the completion summary to stdout.
pub fn print_summary(s: &RunSummary, color: bool) {
    for (i, line) in summary_lines(s).into_iter().enumerate() {
        if color && i == 0 {
            println!("{}", line.green().bold());
        } else {
            println!("{}", line);
        }
    }
}

/// Compose the summary as a JSON object (pure) for logging and tests.
pub fn compose_summary_json(s: &RunSummary) -> JsonVal {
    serde_json::to_value(s).unwrap_or(JsonVal::Null)
}
