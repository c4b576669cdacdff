//! Invoice data models shared by the extraction service, JSON files and the browser.
//!
//! Amounts are written as JSON numbers and read from numbers or numeric strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Tolerance used when comparing computed and stated amounts.
const AMOUNT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// One extracted invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    /// Invoice number or ID.
    #[serde(default)]
    pub invoice_number: String,

    /// Invoice date as printed (the service is asked for YYYY-MM-DD).
    #[serde(default)]
    pub date: String,

    /// Issuing company or vendor.
    pub vendor_name: String,

    /// Currency symbol or code (EGP, USD, SAR, ...).
    #[serde(default)]
    pub currency: String,

    /// Total before tax.
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub subtotal: Option<Decimal>,

    /// Total tax amount.
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub tax: Option<Decimal>,

    /// Final amount to be paid.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_amount: Decimal,

    /// Line items in document order.
    pub items: Vec<LineItem>,

    /// Optional brief summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// One line of an invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Red Code (product code).
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub red_code: Option<String>,

    /// LV TY UC classification code.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub lv_ty_uc: Option<String>,

    /// Supplier reference.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub supplier_ref: Option<String>,

    /// FAM (family) code.
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub fam: Option<String>,

    /// VAT amount or percentage.
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub vat: Option<Decimal>,

    /// Description in English.
    pub description_en: String,

    /// Description in Arabic.
    pub description_ar: String,

    /// Quantity purchased.
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<Decimal>,

    /// Price per unit.
    #[serde(
        default,
        serialize_with = "rust_decimal::serde::float_option::serialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub unit_price: Option<Decimal>,

    /// Line total.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total: Decimal,
}

/// Codes must survive verbatim, but an empty string carries nothing.
fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

impl LineItem {
    /// `quantity * unit_price`, when both are known.
    pub fn computed_total(&self) -> Option<Decimal> {
        match (self.quantity, self.unit_price) {
            (Some(quantity), Some(unit_price)) => quantity.checked_mul(unit_price),
            _ => None,
        }
    }
}

impl InvoiceRecord {
    /// Sum of all line totals.
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(|i| i.total).sum()
    }

    /// Check the record for inconsistencies. Findings are advisory and never
    /// reject the record.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.vendor_name.trim().is_empty() {
            issues.push("Missing vendor name".to_string());
        }

        if self.items.is_empty() {
            issues.push("No line items".to_string());
        }

        for (index, item) in self.items.iter().enumerate() {
            if item.description_en.trim().is_empty() || item.description_ar.trim().is_empty() {
                issues.push(format!("Line {}: missing English or Arabic description", index + 1));
            }

            if let Some(computed) = item.computed_total() {
                if (computed - item.total).abs() > AMOUNT_TOLERANCE {
                    issues.push(format!(
                        "Line {}: total ({}) differs from quantity x unit price ({})",
                        index + 1,
                        item.total,
                        computed
                    ));
                }
            }
        }

        if !self.items.is_empty() {
            let items_total = self.items_total();
            let stated = self.subtotal.unwrap_or(self.total_amount);
            let with_tax = self.subtotal.map(|s| s + self.tax.unwrap_or_default());

            if (items_total - stated).abs() > AMOUNT_TOLERANCE
                && (items_total - self.total_amount).abs() > AMOUNT_TOLERANCE
            {
                issues.push(format!(
                    "Line item total ({}) differs from invoice amounts ({})",
                    items_total, stated
                ));
            }

            if let Some(with_tax) = with_tax {
                if (with_tax - self.total_amount).abs() > AMOUNT_TOLERANCE {
                    issues.push(format!(
                        "Subtotal plus tax ({}) differs from total amount ({})",
                        with_tax, self.total_amount
                    ));
                }
            }
        }

        issues
    }
}
