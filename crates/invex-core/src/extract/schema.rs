//! Request/response contract of the Gemini `generateContent` endpoint.
//!
//! No I/O happens here, so the browser bindings build the same request and
//! decode the same response as the native client.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ExtractionError;
use crate::models::invoice::InvoiceRecord;

/// Instruction sent alongside the document.
pub const USER_PROMPT: &str = "Analyze this invoice document. Extract the data strictly according to the schema. \
Look for columns specifically named 'Red Code', 'LV TY UC', 'Supplier REF', 'FAM', and 'VAT'. \
For the item description, you MUST split it into 'descriptionEn' (English) and 'descriptionAr' (Arabic). \
If the invoice only has one language, provide a translation.";

/// System instruction for the model.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert accountant AI. Extract specific columns: \
Red Code, LV TY UC, Supplier REF, FAM, VAT, Qty, Unit Price, Total. \
Split descriptions into English and Arabic.";

/// Structured-output schema mirroring [`InvoiceRecord`].
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "invoiceNumber": { "type": "STRING", "description": "The invoice number or ID." },
            "date": { "type": "STRING", "description": "The invoice date in YYYY-MM-DD format." },
            "vendorName": { "type": "STRING", "description": "The name of the company or vendor issuing the invoice." },
            "currency": { "type": "STRING", "description": "Currency symbol or code (e.g., EGP, USD, SAR)." },
            "subtotal": { "type": "NUMBER", "description": "The total before tax." },
            "tax": { "type": "NUMBER", "description": "The total tax amount." },
            "totalAmount": { "type": "NUMBER", "description": "The final total amount to be paid." },
            "summary": { "type": "STRING", "description": "Optional one-sentence summary of the invoice." },
            "items": {
                "type": "ARRAY",
                "description": "List of items purchased. Look for columns like 'Red Code', 'LV TY UC', 'Supplier Ref', 'FAM', 'VAT'. Split description into English and Arabic.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "redCode": { "type": "STRING", "description": "The Red Code or product code." },
                        "lvTyUc": { "type": "STRING", "description": "The LV TY UC code or similar classification code." },
                        "supplierRef": { "type": "STRING", "description": "The Supplier Reference (REF)." },
                        "fam": { "type": "STRING", "description": "The FAM or Family code." },
                        "vat": { "type": "NUMBER", "description": "The VAT amount or percentage for this item." },
                        "descriptionEn": { "type": "STRING", "description": "Item name/description in English." },
                        "descriptionAr": { "type": "STRING", "description": "Item name/description in Arabic." },
                        "quantity": { "type": "NUMBER", "description": "Quantity purchased." },
                        "unitPrice": { "type": "NUMBER", "description": "Price per unit." },
                        "total": { "type": "NUMBER", "description": "Total line item price." }
                    },
                    "required": ["descriptionEn", "descriptionAr", "total"]
                }
            }
        },
        "required": ["vendorName", "totalAmount", "items"]
    })
}

/// Body of a `generateContent` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub generation_config: GenerationConfig,
}

/// A list of parts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Either inline file data or text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self { inline_data: None, text: Some(text.into()) }
    }
}

/// Base64 file payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateRequest {
    /// Build the request for one document. `data` is the base64-encoded file.
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: mime_type.into(),
                            data: data.into(),
                        }),
                        text: None,
                    },
                    Part::text(USER_PROMPT),
                ],
            }],
            system_instruction: Content {
                parts: vec![Part::text(SYSTEM_INSTRUCTION)],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        }
    }
}

/// Concatenated text of the first candidate, if any.
pub fn response_text(body: &str) -> Result<Option<String>, ExtractionError> {
    let response: GenerateResponse = serde_json::from_str(body)?;

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

/// Decode a record from model output text.
pub fn decode_record(text: &str) -> Result<InvoiceRecord, ExtractionError> {
    // Strip markdown fences if the model added them despite the JSON mime type
    let json_str = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    if json_str.is_empty() {
        return Err(ExtractionError::EmptyResponse);
    }

    Ok(serde_json::from_str(json_str)?)
}

/// Decode a full `generateContent` response body into a record.
pub fn parse_response(body: &str) -> Result<InvoiceRecord, ExtractionError> {
    let text = response_text(body)?.ok_or(ExtractionError::EmptyResponse)?;
    decode_record(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RECORD_JSON: &str = r#"{"vendorName":"Acme","totalAmount":150,"currency":"USD","items":[{"descriptionEn":"Bolt","descriptionAr":"برغي","quantity":10,"unitPrice":15,"total":150}]}"#;

    fn response_with(text: &str) -> String {
        json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }]
        })
        .to_string()
    }

    #[test]
    fn test_request_shape() {
        let request = GenerateRequest::new("QUJD", "application/pdf");
        let json = serde_json::to_value(&request).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "application/pdf");
        assert_eq!(parts[0]["inlineData"]["data"], "QUJD");
        assert!(parts[0].get("text").is_none());
        assert_eq!(parts[1]["text"], USER_PROMPT);

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], SYSTEM_INSTRUCTION);
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["responseSchema"], response_schema());
    }

    #[test]
    fn test_prompt_names_domain_columns() {
        for column in ["Red Code", "LV TY UC", "Supplier REF", "FAM", "VAT"] {
            assert!(USER_PROMPT.contains(column), "missing {column}");
            assert!(SYSTEM_INSTRUCTION.contains(column), "missing {column}");
        }
    }

    #[test]
    fn test_schema_required_fields() {
        let schema = response_schema();
        assert_eq!(schema["required"], json!(["vendorName", "totalAmount", "items"]));
        assert_eq!(
            schema["properties"]["items"]["items"]["required"],
            json!(["descriptionEn", "descriptionAr", "total"])
        );
    }

    #[test]
    fn test_parse_response() {
        let record = parse_response(&response_with(RECORD_JSON)).unwrap();
        assert_eq!(record.vendor_name, "Acme");
        assert_eq!(record.items.len(), 1);
        assert_eq!(record.items[0].description_ar, "برغي");
    }

    #[test]
    fn test_parse_response_joins_text_parts() {
        let (head, tail) = RECORD_JSON.split_at(20);
        let body = json!({
            "candidates": [{ "content": { "parts": [{ "text": head }, { "text": tail }] } }]
        })
        .to_string();
        assert_eq!(parse_response(&body).unwrap().vendor_name, "Acme");
    }

    #[test]
    fn test_parse_response_strips_fences() {
        let fenced = format!("```json\n{}\n```", RECORD_JSON);
        assert!(parse_response(&response_with(&fenced)).is_ok());
    }

    #[test]
    fn test_parse_response_without_candidates() {
        let err = parse_response(r#"{"candidates":[]}"#).unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyResponse));

        let err = parse_response(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyResponse));
    }

    #[test]
    fn test_parse_response_wrong_shape() {
        let err = parse_response(&response_with(r#"{"vendorName":"Acme"}"#)).unwrap_err();
        assert!(matches!(err, ExtractionError::Decode(_)));

        let err = parse_response(&response_with("not json")).unwrap_err();
        assert!(matches!(err, ExtractionError::Decode(_)));

        let err = parse_response("<html>").unwrap_err();
        assert!(matches!(err, ExtractionError::Decode(_)));
    }
}
