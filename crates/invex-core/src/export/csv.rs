//! Spreadsheet-oriented CSV export.
//!
//! The output targets spreadsheet import rather than generic CSV consumers:
//! - a UTF-8 byte-order mark so the Arabic column is not read as a legacy
//!   single-byte encoding;
//! - code columns wrapped as `="value"` so leading zeros survive and long
//!   codes are not turned into scientific notation. This is an import
//!   heuristic of one spreadsheet family, not part of RFC 4180;
//! - descriptions quoted with embedded quotes doubled;
//! - numbers as plain literals, `0` when missing.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::models::invoice::{InvoiceRecord, LineItem};

/// UTF-8 byte-order mark.
pub const BOM: char = '\u{FEFF}';

/// Fixed column labels, in export order.
pub const HEADERS: [&str; 10] = [
    "Red Code",
    "LV TY UC",
    "Supplier REF",
    "FAM",
    "VAT",
    "Description (EN)",
    "Description (AR)",
    "Qty",
    "Unit Price",
    "Line Total",
];

/// Row emitted when the record has no items, so the file is never header-only.
const NO_ITEMS_ROW: [&str; 10] = ["", "", "", "", "0", "No Items Detected", "", "0", "0", "0"];

/// Download file name prefix.
pub const FILE_PREFIX: &str = "invoice_extract_";

/// Format a record as spreadsheet-ready CSV text.
pub fn format(record: &InvoiceRecord) -> String {
    let mut rows = Vec::with_capacity(record.items.len().max(1) + 1);
    rows.push(HEADERS.join(","));

    if record.items.is_empty() {
        rows.push(NO_ITEMS_ROW.join(","));
    } else {
        rows.extend(record.items.iter().map(format_row));
    }

    let mut out = String::new();
    out.push(BOM);
    out.push_str(&rows.join("\n"));
    out
}

fn format_row(item: &LineItem) -> String {
    let fields = [
        code(item.red_code.as_deref()),
        code(item.lv_ty_uc.as_deref()),
        code(item.supplier_ref.as_deref()),
        code(item.fam.as_deref()),
        number(item.vat),
        quoted(&item.description_en),
        quoted(&item.description_ar),
        number(item.quantity),
        number(item.unit_price),
        number(Some(item.total)),
    ];
    fields.join(",")
}

/// `="value"`, or empty when absent. Quotes inside the value are written as-is.
fn code(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => format!("=\"{}\"", v),
        _ => String::new(),
    }
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn number(value: Option<Decimal>) -> String {
    value.unwrap_or(Decimal::ZERO).to_string()
}

/// Calendar date stamped on an export made at `now`, taken in UTC whatever
/// the caller's zone.
pub fn export_date<Tz: TimeZone>(now: DateTime<Tz>) -> NaiveDate {
    now.with_timezone(&Utc).date_naive()
}

/// Download file name for an export made on `date`.
pub fn file_name(date: NaiveDate) -> String {
    format!("{}{}.csv", FILE_PREFIX, date.format("%Y-%m-%d"))
}

/// Write the export for `record` into `dir` and return the file path.
pub fn write_to(dir: &Path, record: &InvoiceRecord, date: NaiveDate) -> std::io::Result<PathBuf> {
    let path = dir.join(file_name(date));
    let content = format(record);
    std::fs::write(&path, content.as_bytes())?;
    debug!(path = %path.display(), bytes = content.len(), "Wrote CSV export");
    Ok(path)
}
