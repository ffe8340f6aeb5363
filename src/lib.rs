//! Rulemap core library.
//!
//! This crate exposes programmatic APIs for scanning a directory of YAML rule
//! definitions, aggregating the operators and rule types they use, and
//! writing the result as a spreadsheet report.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `scan`: Directory listing and per-file decoding/parsing.
//! - `extract`: Metadata extraction into the aggregate indices.
//! - `report`: Workbook rendering for the three report sheets.
//! - `models`: Data models for documents, indices, and run summaries.
//! - `output`: Console printers for the run summary.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod models;
pub mod output;
pub mod report;
pub mod scan;
pub mod utils;

pub use error::{Error, Result};
