//! CLI argument parsing via `clap`.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "rulemap",
    version,
    about = "Process YAML rule files and extract operators and rule IDs.",
    long_about = "Scan a directory of YAML rule definitions (non-recursive), collect the operators used in each rule's Check and Operations sections, group rules by type, and write everything to a timestamped .xlsx report.\n\nConfiguration: optional rulemap.toml|yaml in the working directory.",
    after_help = "Examples:\n  rulemap ./rules\n  RUST_LOG=rulemap=debug rulemap ./rules"
)]
/// Top-level CLI arguments.
pub struct Cli {
    /// Directory containing YAML files
    pub directory: PathBuf,
}
