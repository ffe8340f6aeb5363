//! Workbook rendering for the aggregated indices.
//!
//! The report has three two-column sheets (Operators, Skipped Rules, Rule
//! Types), each with a header row. Every cell is wrapped and top-aligned so
//! long joined id lists stay readable.

use crate::extract::Aggregator;
use crate::models::index::{join_ids, IdIndex};
use crate::Result;
use chrono::{DateTime, Local};
use rust_xlsxwriter::{ColNum, Format, FormatAlign, RowNum, Workbook};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const OPERATORS_SHEET: &str = "Operators";
pub const SKIPPED_SHEET: &str = "Skipped Rules";
pub const RULE_TYPES_SHEET: &str = "Rule Types";

/// Longest string Excel stores in a single cell.
pub const MAX_CELL_CHARS: usize = 32_767;

/// One sheet's worth of rows, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetData {
    pub name: &'static str,
    pub headers: [&'static str; 2],
    pub widths: [f64; 2],
    pub rows: Vec<[String; 2]>,
}

fn index_rows(index: &IdIndex) -> Vec<[String; 2]> {
    index
        .iter()
        .map(|(key, ids)| [key.to_string(), join_ids(ids)])
        .collect()
}

/// Build the three sheets from the aggregate, in workbook order.
pub fn report_sheets(agg: &Aggregator) -> Vec<SheetData> {
    vec![
        SheetData {
            name: OPERATORS_SHEET,
            headers: ["Operator", "Rule IDs"],
            widths: [30.0, 100.0],
            rows: index_rows(&agg.operators),
        },
        SheetData {
            name: SKIPPED_SHEET,
            headers: ["Filename", "Error"],
            widths: [50.0, 100.0],
            rows: agg
                .skipped
                .iter()
                .map(|s| [s.filename.clone(), s.error.clone()])
                .collect(),
        },
        SheetData {
            name: RULE_TYPES_SHEET,
            headers: ["Rule Type", "Core IDs"],
            widths: [30.0, 100.0],
            rows: index_rows(&agg.rule_types),
        },
    ]
}

/// `<prefix>_<YYYYMMDD_HHMMSS>.xlsx`
pub fn report_file_name(prefix: &str, at: &DateTime<Local>) -> String {
    format!("{}_{}.xlsx", prefix, at.format("%Y%m%d_%H%M%S"))
}

/// Cells of a sheet in write order: the header row first, then the data rows.
pub fn sheet_grid(sheet: &SheetData) -> Vec<[&str; 2]> {
    std::iter::once(sheet.headers)
        .chain(sheet.rows.iter().map(|[a, b]| [a.as_str(), b.as_str()]))
        .collect()
}

/// Cut `value` to at most `MAX_CELL_CHARS` characters.
pub fn fit_cell(value: &str) -> Cow<'_, str> {
    match value.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => Cow::Owned(value[..end].to_string()),
        None => Cow::Borrowed(value),
    }
}

pub fn build_workbook(sheets: &[SheetData]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let cell = Format::new().set_text_wrap().set_align(FormatAlign::Top);
    for sheet in sheets {
        let ws = workbook.add_worksheet();
        ws.set_name(sheet.name)?;
        for (col, width) in sheet.widths.iter().enumerate() {
            ws.set_column_width(col as ColNum, *width)?;
        }
        for (row, values) in sheet_grid(sheet).into_iter().enumerate() {
            for (col, value) in values.into_iter().enumerate() {
                let fitted = fit_cell(value);
                if let Cow::Owned(_) = fitted {
                    warn!(
                        sheet = sheet.name,
                        row = row + 1,
                        chars = value.chars().count(),
                        "cell truncated to {} characters",
                        MAX_CELL_CHARS
                    );
                }
                ws.write_string_with_format(row as RowNum, col as ColNum, fitted, &cell)?;
            }
        }
        debug!(sheet = sheet.name, rows = sheet.rows.len(), "sheet written");
    }
    Ok(workbook)
}

/// Write the report for `agg` into `out_dir`, stamped with the current local time.
///
/// Returns the path of the saved file. A file written within the same second
/// under the same prefix is overwritten.
pub fn write_report(agg: &Aggregator, out_dir: &Path, prefix: &str) -> Result<PathBuf> {
    write_report_at(agg, out_dir, prefix, &Local::now())
}

pub fn write_report_at(
    agg: &Aggregator,
    out_dir: &Path,
    prefix: &str,
    at: &DateTime<Local>,
) -> Result<PathBuf> {
    let path = out_dir.join(report_file_name(prefix, at));
    let mut workbook = build_workbook(&report_sheets(agg))?;
    workbook.save(&path)?;
    Ok(path)
}
