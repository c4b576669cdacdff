//! WASM bindings for invoice extraction.
//!
//! The browser front-end sends the upload itself; this crate builds the
//! request body, decodes the service response and produces the spreadsheet
//! CSV so both surfaces share one implementation.

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;
use web_sys::console;

use invex_core::export::csv;
use invex_core::extract::schema::{self, GenerateRequest};
use invex_core::{is_accepted_mime, InvoiceRecord, PROCESSING_FAILED_MESSAGE};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Build the JSON body for a `generateContent` call.
///
/// `base64_data` is the file content, optionally as a `data:` URL. Only
/// images and PDF documents are accepted.
#[wasm_bindgen]
pub fn build_extraction_request(base64_data: &str, mime_type: &str) -> Result<String, JsValue> {
    if !is_accepted_mime(mime_type) {
        return Err(JsValue::from_str(&format!("unsupported file type: {}", mime_type)));
    }
    let data = strip_data_url(base64_data);
    let request = GenerateRequest::new(data, mime_type);
    serde_json::to_string(&request).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Decode a `generateContent` response body into an invoice record.
///
/// Any failure is logged to the console and reported with the generic
/// processing message.
#[wasm_bindgen]
pub fn parse_extraction_response(body: &str) -> Result<JsValue, JsValue> {
    let record = schema::parse_response(body).map_err(|e| {
        console::error_1(&JsValue::from_str(&format!("Extraction failed: {}", e)));
        JsValue::from_str(PROCESSING_FAILED_MESSAGE)
    })?;

    serde_wasm_bindgen::to_value(&record).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Format an invoice record as the spreadsheet CSV payload.
#[wasm_bindgen]
pub fn generate_csv(record: JsValue) -> Result<String, JsValue> {
    let record = record_from_js(record)?;
    Ok(csv::format(&record))
}

/// Download name for today's export, from the browser clock in UTC.
#[wasm_bindgen]
pub fn export_file_name() -> Result<String, JsValue> {
    let now = js_sys::Date::new_0();
    let date = chrono::NaiveDate::from_ymd_opt(
        now.get_utc_full_year() as i32,
        now.get_utc_month() + 1,
        now.get_utc_date(),
    )
    .ok_or_else(|| JsValue::from_str("invalid system date"))?;

    Ok(csv::file_name(date))
}

/// Format an amount for display (thousands separators, up to 3 decimals).
#[wasm_bindgen]
pub fn format_amount(amount: f64) -> String {
    match Decimal::try_from(amount) {
        Ok(value) => invex_core::format_amount(value),
        Err(_) => amount.to_string(),
    }
}

/// Consistency warnings for a record; an empty array when it adds up.
#[wasm_bindgen]
pub fn validate_record(record: JsValue) -> Result<JsValue, JsValue> {
    let record = record_from_js(record)?;
    let issues = record.validate();
    for issue in &issues {
        console::warn_1(&JsValue::from_str(issue));
    }

    serde_wasm_bindgen::to_value(&issues).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn record_from_js(value: JsValue) -> Result<InvoiceRecord, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("invalid invoice record: {}", e)))
}

/// `FileReader.readAsDataURL` yields `data:<mime>;base64,<payload>`.
fn strip_data_url(data: &str) -> &str {
    match data.split_once(";base64,") {
        Some((prefix, payload)) if prefix.starts_with("data:") => payload,
        _ => data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_data_url() {
        assert_eq!(strip_data_url("data:image/png;base64,iVBOR"), "iVBOR");
        assert_eq!(strip_data_url("iVBOR"), "iVBOR");
    }

    #[test]
    fn test_build_extraction_request() {
        let body = build_extraction_request("data:application/pdf;base64,JVBERi0=", "application/pdf")
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();

        let part = &json["contents"][0]["parts"][0]["inlineData"];
        assert_eq!(part["mimeType"], "application/pdf");
        assert_eq!(part["data"], "JVBERi0=");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1234.5), "1,234.5");
        assert_eq!(format_amount(0.0), "0");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const BODY: &str = r#"{"candidates":[{"content":{"parts":[{"text":"{\"vendorName\":\"Acme\",\"totalAmount\":90,\"items\":[{\"redCode\":\"00123\",\"descriptionEn\":\"Bolt\",\"descriptionAr\":\"برغي\",\"quantity\":3,\"unitPrice\":30,\"total\":90}]}"}]}}]}"#;

    #[wasm_bindgen_test]
    fn test_parse_then_generate_csv() {
        let record = parse_extraction_response(BODY).unwrap();
        let csv = generate_csv(record).unwrap();

        assert!(csv.starts_with('\u{FEFF}'));
        assert!(csv.ends_with(r#"="00123",,,,0,"Bolt","برغي",3,30,90"#));
    }

    #[wasm_bindgen_test]
    fn test_parse_failure_is_generic() {
        let err = parse_extraction_response(r#"{"candidates":[]}"#).unwrap_err();
        assert_eq!(err.as_string().as_deref(), Some(PROCESSING_FAILED_MESSAGE));
    }

    #[wasm_bindgen_test]
    fn test_export_file_name() {
        let name = export_file_name().unwrap();
        let iso: String = js_sys::Date::new_0().to_iso_string().into();
        assert_eq!(name, format!("invoice_extract_{}.csv", &iso[..10]));
    }

    #[wasm_bindgen_test]
    fn test_request_rejects_unsupported_type() {
        let err = build_extraction_request("aGVsbG8=", "text/plain").unwrap_err();
        assert_eq!(err.as_string().as_deref(), Some("unsupported file type: text/plain"));
    }

    #[wasm_bindgen_test]
    fn test_parsed_amounts_are_numbers() {
        let record = parse_extraction_response(BODY).unwrap();
        let total = js_sys::Reflect::get(&record, &JsValue::from_str("totalAmount")).unwrap();
        assert_eq!(total.as_f64(), Some(90.0));
    }

    #[wasm_bindgen_test]
    fn test_validate_record() {
        let record = parse_extraction_response(BODY).unwrap();
        let issues: Vec<String> =
            serde_wasm_bindgen::from_value(validate_record(record).unwrap()).unwrap();
        assert!(issues.is_empty());
    }
}
