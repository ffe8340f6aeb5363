//! Error types for operations that abort a run.
//!
//! Per-file failures are not errors at this level; they are recorded as
//! skipped entries by the scan loop (see `scan::ParseFailure`).

use std::path::PathBuf;
use thiserror::Error;

/// Errors that terminate a rulemap run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot list directory {path}: {source}")]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("failed to write report: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
