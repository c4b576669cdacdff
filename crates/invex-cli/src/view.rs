//! Terminal rendering of an extracted invoice.

use console::{measure_text_width, pad_str, truncate_str, Alignment};
use rust_decimal::Decimal;

use invex_core::export::csv;
use invex_core::{format_amount, InvoiceRecord, LineItem};

/// Table labels match the export so the screen and the spreadsheet agree.
const COLUMNS: [&str; 10] = csv::HEADERS;

/// Widest a description column may grow before cells are truncated.
const MAX_DESCRIPTION_WIDTH: usize = 32;

/// Numeric columns are right-aligned.
const NUMERIC: [bool; 10] = [
    false, false, false, false, true, false, false, true, true, true,
];

/// Render the summary header, the line item table and the grand total.
pub fn render_record(record: &InvoiceRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Vendor: {}\n", record.vendor_name));
    output.push_str(&format!(
        "Total:  {} {}\n",
        format_amount(record.total_amount),
        record.currency
    ));
    if !record.invoice_number.is_empty() {
        output.push_str(&format!("Invoice: {}\n", record.invoice_number));
    }
    if !record.date.is_empty() {
        output.push_str(&format!("Date:    {}\n", record.date));
    }
    if let Some(summary) = record.summary.as_deref().filter(|s| !s.is_empty()) {
        output.push_str(&format!("\n{}\n", summary));
    }
    output.push('\n');

    let rows: Vec<[String; 10]> = record.items.iter().map(cells).collect();
    output.push_str(&render_table(&rows, record));

    output
}

fn cells(item: &LineItem) -> [String; 10] {
    [
        code(&item.red_code),
        code(&item.lv_ty_uc),
        code(&item.supplier_ref),
        code(&item.fam),
        vat(item.vat),
        item.description_en.clone(),
        item.description_ar.clone(),
        item.quantity.map(|q| q.normalize().to_string()).unwrap_or_else(|| "-".to_string()),
        item.unit_price.map(format_amount).unwrap_or_else(|| "-".to_string()),
        format_amount(item.total),
    ]
}

fn code(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

fn vat(value: Option<Decimal>) -> String {
    match value {
        Some(v) if !v.is_zero() => format_amount(v),
        _ => "-".to_string(),
    }
}

fn render_table(rows: &[[String; 10]], record: &InvoiceRecord) -> String {
    let mut widths = COLUMNS.map(measure_text_width);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(measure_text_width(cell));
        }
    }
    widths[5] = widths[5].min(MAX_DESCRIPTION_WIDTH);
    widths[6] = widths[6].min(MAX_DESCRIPTION_WIDTH);

    let mut output = String::new();
    let header = COLUMNS.map(String::from);
    output.push_str(&render_row(&header, &widths));
    output.push_str(&separator(&widths));

    if rows.is_empty() {
        output.push_str("  No line items extracted\n");
    }
    for row in rows {
        output.push_str(&render_row(row, &widths));
    }

    output.push_str(&separator(&widths));
    let label = format!("Grand Total ({})", record.currency);
    let total = format_amount(record.total_amount);
    let inner: usize = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
    let gap = inner.saturating_sub(measure_text_width(&label) + measure_text_width(&total));
    output.push_str(&format!("{}{}{}\n", label, " ".repeat(gap.max(1)), total));

    output
}

fn render_row(row: &[String; 10], widths: &[usize; 10]) -> String {
    let cells: Vec<String> = row
        .iter()
        .zip(widths)
        .zip(NUMERIC)
        .map(|((cell, &width), numeric)| {
            let cell = truncate_str(cell, width, "…");
            let align = if numeric { Alignment::Right } else { Alignment::Left };
            pad_str(&cell, width, align, None).into_owned()
        })
        .collect();
    format!("{}\n", cells.join(" | ").trim_end())
}

fn separator(widths: &[usize; 10]) -> String {
    let parts: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    format!("{}\n", parts.join("-+-"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record() -> InvoiceRecord {
        InvoiceRecord {
            invoice_number: "INV-7".to_string(),
            date: "2025-03-01".to_string(),
            vendor_name: "Acme".to_string(),
            currency: "SAR".to_string(),
            subtotal: None,
            tax: None,
            total_amount: dec("1234.5"),
            items: vec![LineItem {
                red_code: Some("00123".to_string()),
                vat: Some(Decimal::ZERO),
                description_en: "Bolt".to_string(),
                description_ar: "برغي".to_string(),
                quantity: Some(dec("2")),
                unit_price: Some(dec("617.25")),
                total: dec("1234.5"),
                ..Default::default()
            }],
            summary: Some("Hardware order".to_string()),
        }
    }

    #[test]
    fn test_render_record_header_and_total() {
        let out = render_record(&record());
        assert!(out.starts_with("Vendor: Acme\n"));
        assert!(out.contains("Total:  1,234.5 SAR"));
        assert!(out.contains("Invoice: INV-7"));
        assert!(out.contains("Hardware order"));
        assert!(out.trim_end().ends_with("1,234.5"));
        assert!(out.contains("Grand Total (SAR)"));
    }

    #[test]
    fn test_render_record_placeholders() {
        let out = render_record(&record());
        let row = out.lines().find(|l| l.contains("00123")).unwrap();
        // Missing codes and zero VAT render as a dash
        assert!(row.contains("| -"));
        assert!(row.contains("617.25"));
        assert!(row.contains("برغي"));
    }

    #[test]
    fn test_render_record_uses_export_labels() {
        let out = render_record(&record());
        let header = out.lines().find(|l| l.starts_with("Red Code")).unwrap();
        for label in ["Supplier REF", "FAM", "Line Total"] {
            assert!(header.contains(label), "missing {} in {}", label, header);
        }
        assert!(!header.contains("Supplier Ref"));
    }

    #[test]
    fn test_render_record_without_items() {
        let mut r = record();
        r.items.clear();
        let out = render_record(&r);
        assert!(out.contains("No line items extracted"));
    }
}
