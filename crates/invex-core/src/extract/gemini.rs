//! Gemini `generateContent` client.

use std::time::{Duration, Instant};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::invoice::InvoiceRecord;

use super::schema::{self, GenerateRequest};
use super::{InvoiceExtractor, Result};

/// Production extractor backed by the Gemini REST API.
pub struct GeminiExtractor {
    client: Client,
    config: ExtractionConfig,
}

impl GeminiExtractor {
    /// Create a client for the given configuration. The credential is taken
    /// from `config.api_key` only.
    pub fn new(config: ExtractionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExtractionError::Configuration(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Endpoint URL for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait::async_trait]
impl InvoiceExtractor for GeminiExtractor {
    async fn extract(&self, file: &[u8], mime_type: &str) -> Result<InvoiceRecord> {
        let api_key = self
            .config
            .credential()
            .ok_or_else(|| ExtractionError::Configuration("API key is missing".to_string()))?;

        let start = Instant::now();
        let request = GenerateRequest::new(BASE64.encode(file), mime_type);

        info!(
            model = %self.config.model,
            mime_type,
            bytes = file.len(),
            "Sending document for extraction"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExtractionError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(status = %status, "Extraction service rejected the request");
            return Err(ExtractionError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let record = schema::parse_response(&body)?;

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            items = record.items.len(),
            vendor = %record.vendor_name,
            "Extraction response decoded"
        );

        Ok(record)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
