//! Directory scanning and per-file parsing.
//!
//! `run_scan` drives the whole pass: list the rule files, parse each one,
//! and feed the result to an `Aggregator`. A file that cannot be parsed is
//! recorded as skipped and the scan moves on; only a directory listing
//! failure aborts the pass.

use crate::extract::Aggregator;
use crate::models::document;
use crate::utils;
use crate::{Error, Result};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const RULE_EXTENSIONS: [&str; 2] = [".yaml", ".yml"];

/// Text encoding a file was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

/// A successfully parsed rule file.
#[derive(Debug)]
pub enum ParseOutcome {
    Document(Value),
    /// The file holds no document (empty, whitespace, or a bare null).
    Empty,
}

#[derive(Debug)]
pub struct ParsedFile {
    pub outcome: ParseOutcome,
    pub encoding: TextEncoding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The file could not be read.
    Read,
    /// UTF-8 text that is not a well-formed document.
    Syntax,
    /// Failure after falling back to Latin-1.
    Fallback,
}

/// Why a rule file was skipped.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ParseFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// List rule files (`*.yaml`, `*.yml`) directly inside `dir`, sorted by name.
///
/// Entries that are not regular files are ignored.
pub fn list_rule_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let list_err = |source| Error::ListDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let name = entry.file_name().to_string_lossy().to_string();
        if !RULE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            continue;
        }
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false)
            || entry.path().is_file();
        if is_file {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Read and parse one rule file, falling back to Latin-1 when the bytes are
/// not valid UTF-8.
pub fn parse_rule_file(path: &Path) -> std::result::Result<ParsedFile, ParseFailure> {
    let bytes = fs::read(path).map_err(|e| ParseFailure {
        kind: FailureKind::Read,
        message: e.to_string(),
    })?;
    match String::from_utf8(bytes) {
        Ok(text) => parse_text(&text)
            .map(|outcome| ParsedFile {
                outcome,
                encoding: TextEncoding::Utf8,
            })
            .map_err(|message| ParseFailure {
                kind: FailureKind::Syntax,
                message,
            }),
        Err(e) => {
            let text = decode_latin1(e.as_bytes());
            parse_text(&text)
                .map(|outcome| ParsedFile {
                    outcome,
                    encoding: TextEncoding::Latin1,
                })
                .map_err(|message| ParseFailure {
                    kind: FailureKind::Fallback,
                    message,
                })
        }
    }
}

/// ISO-8859-1: every byte maps to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    encoding_rs::mem::decode_latin1(bytes).into_owned()
}

fn parse_text(text: &str) -> std::result::Result<ParseOutcome, String> {
    if text.trim().is_empty() {
        return Ok(ParseOutcome::Empty);
    }
    match document::parse_document(text) {
        Ok(Value::Null) => Ok(ParseOutcome::Empty),
        Ok(doc) => Ok(ParseOutcome::Document(doc)),
        Err(e) => Err(e.to_string()),
    }
}

/// Scan `dir` and aggregate every rule file found in it.
///
/// Per-file diagnostics are printed to stderr as files are processed.
pub fn run_scan(dir: &Path, color: bool) -> Result<Aggregator> {
    Ok(scan_files(&list_rule_files(dir)?, color))
}

/// Parse and aggregate `paths` in order. Failures become skipped entries.
pub fn scan_files(paths: &[PathBuf], color: bool) -> Aggregator {
    let mut agg = Aggregator::new();
    for path in paths {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        debug!(file = %filename, "scanning");
        match parse_rule_file(path) {
            Ok(parsed) => {
                if parsed.encoding == TextEncoding::Latin1 {
                    print_encoding_note(&filename, color);
                }
                match parsed.outcome {
                    ParseOutcome::Document(doc) => {
                        if agg.ingest(&doc).is_none() {
                            debug!(file = %filename, "no Core.Id; ignored");
                        }
                    }
                    ParseOutcome::Empty => {
                        let message = "document is empty";
                        eprintln!(
                            "{} Error parsing {}: {}",
                            utils::warn_prefix(color),
                            filename,
                            message
                        );
                        agg.skip(filename, message);
                    }
                }
            }
            Err(failure) => {
                match failure.kind {
                    FailureKind::Syntax => eprintln!(
                        "{} Error parsing {}: {}",
                        utils::warn_prefix(color),
                        filename,
                        failure
                    ),
                    FailureKind::Fallback => {
                        print_encoding_note(&filename, color);
                        eprintln!(
                            "{} Failed to process {}: {}",
                            utils::warn_prefix(color),
                            filename,
                            failure
                        );
                    }
                    FailureKind::Read => eprintln!(
                        "{} Failed to process {}: {}",
                        utils::warn_prefix(color),
                        filename,
                        failure
                    ),
                }
                agg.skip(filename, failure.message);
            }
        }
    }
    agg
}

fn print_encoding_note(filename: &str, color: bool) {
    eprintln!(
        "{} Encoding error in {}. Trying alternative encoding...",
        utils::note_prefix(color),
        filename
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_list_rule_files_filters_and_sorts() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("b.yml"), "a: 1").unwrap();
        fs::write(root.join("a.yaml"), "a: 1").unwrap();
        fs::write(root.join("c.json"), "{}").unwrap();
        fs::write(root.join("d.YAML"), "a: 1").unwrap();
        fs::create_dir(root.join("nested.yaml")).unwrap();
        fs::write(root.join("nested.yaml").join("inner.yaml"), "a: 1").unwrap();

        let names: Vec<String> = list_rule_files(root)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.yaml", "b.yml"]);
    }

    #[test]
    fn test_list_missing_dir_is_error() {
        let dir = tempdir().unwrap();
        let err = list_rule_files(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, Error::ListDir { .. }));
    }

    #[test]
    fn test_parse_utf8_document() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("r.yaml");
        fs::write(&p, "Core:\n  Id: R1\n").unwrap();
        let parsed = parse_rule_file(&p).unwrap();
        assert_eq!(parsed.encoding, TextEncoding::Utf8);
        assert!(matches!(parsed.outcome, ParseOutcome::Document(_)));
    }

    #[test]
    fn test_parse_falls_back_to_latin1() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("r.yaml");
        fs::write(&p, b"Core:\n  Id: R\xe9\n").unwrap();
        let parsed = parse_rule_file(&p).unwrap();
        assert_eq!(parsed.encoding, TextEncoding::Latin1);
        match parsed.outcome {
            ParseOutcome::Document(doc) => {
                assert_eq!(
                    crate::models::document::core_id(&doc).as_deref(),
                    Some("R\u{e9}")
                );
            }
            ParseOutcome::Empty => panic!("expected a document"),
        }
    }

    #[test]
    fn test_parse_empty_and_malformed() {
        let dir = tempdir().unwrap();
        let empty = dir.path().join("empty.yaml");
        fs::write(&empty, "").unwrap();
        assert!(matches!(
            parse_rule_file(&empty).unwrap().outcome,
            ParseOutcome::Empty
        ));

        let bad = dir.path().join("bad.yaml");
        fs::write(&bad, "Core: {Id: R1\n").unwrap();
        let failure = parse_rule_file(&bad).unwrap_err();
        assert_eq!(failure.kind, FailureKind::Syntax);
        assert!(!failure.message.is_empty());

        let bad_latin = dir.path().join("bad_latin.yaml");
        fs::write(&bad_latin, b"Core: {Id: R\xe9\n").unwrap();
        assert_eq!(
            parse_rule_file(&bad_latin).unwrap_err().kind,
            FailureKind::Fallback
        );
    }

    #[test]
    fn test_decode_latin1_accepts_any_byte() {
        let all: Vec<u8> = (0..=255u8).collect();
        let text = decode_latin1(&all);
        assert_eq!(text.chars().count(), 256);
        assert_eq!(text.chars().last(), Some('\u{ff}'));
    }

    #[test]
    fn test_run_scan_aggregates_and_skips() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("r1.yaml"),
            "Core:\n  Id: R1\nRule Type: Security\nCheck:\n  allow:\n    - operator: eq\n",
        )
        .unwrap();
        fs::write(root.join("r2.yml"), "Core:\n  Id: R2\nOperations:\n  - operator: eq\n").unwrap();
        fs::write(root.join("no_id.yaml"), "Check:\n  - operator: lt\n").unwrap();
        fs::write(root.join("broken.yaml"), "Core: {Id: R9\n").unwrap();
        fs::write(root.join("empty.yaml"), "").unwrap();
        fs::write(root.join("notes.txt"), "Core: {Id: R7}").unwrap();

        let agg = run_scan(root, false).unwrap();
        let eq: Vec<&str> = agg
            .operators
            .get("eq")
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(eq, vec!["R1", "R2"]);
        assert!(agg.operators.get("lt").is_none());
        assert_eq!(agg.rules_processed(), 2);
        let skipped: Vec<&str> = agg.skipped.iter().map(|s| s.filename.as_str()).collect();
        assert_eq!(skipped, vec!["broken.yaml", "empty.yaml"]);
    }

    #[test]
    fn test_parse_keeps_last_duplicate_key() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("dup.yaml");
        fs::write(
            &p,
            "Core:\n  Id: R1\nCheck:\n  - operator: eq\n    value: a\n    value: b\n",
        )
        .unwrap();
        let agg = scan_files(&[p], false);
        assert!(agg.skipped.is_empty());
        assert!(agg.operators.get("eq").unwrap().contains("R1"));
    }

    #[test]
    fn test_scan_files_records_read_failure_and_continues() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let good = root.join("a.yaml");
        fs::write(&good, "Core:\n  Id: R1\nOperations:\n  - operator: eq\n").unwrap();
        let gone = root.join("gone.yaml");

        let agg = scan_files(&[gone, good], false);
        assert_eq!(agg.skipped.len(), 1);
        assert_eq!(agg.skipped[0].filename, "gone.yaml");
        let expected = fs::read(root.join("gone.yaml")).unwrap_err().to_string();
        assert_eq!(agg.skipped[0].error, expected);
        assert!(agg.operators.get("eq").unwrap().contains("R1"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_scan_skips_unreadable_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("a.yaml"), "Core:\n  Id: R1\nRule Type: T\n").unwrap();
        let locked = root.join("locked.yaml");
        fs::write(&locked, "Core:\n  Id: R2\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        let read_err = fs::read(&locked).err();
        let Some(read_err) = read_err else {
            // privileged users can read mode 000 files
            return;
        };

        let agg = run_scan(root, false).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
        assert_eq!(agg.skipped.len(), 1);
        assert_eq!(agg.skipped[0].filename, "locked.yaml");
        assert_eq!(agg.skipped[0].error, read_err.to_string());
        assert_eq!(agg.rules_processed(), 1);
        assert!(agg.rule_types.get("T").unwrap().contains("R1"));
    }

    #[test]
    fn test_run_scan_empty_dir() {
        let dir = tempdir().unwrap();
        let agg = run_scan(dir.path(), false).unwrap();
        assert!(agg.operators.is_empty());
        assert!(agg.rule_types.is_empty());
        assert!(agg.skipped.is_empty());
    }
}
