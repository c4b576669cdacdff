//! Invoice extraction through a document-understanding service.

#[cfg(feature = "native")]
mod gemini;
pub mod schema;
pub mod upload;

#[cfg(feature = "native")]
pub use gemini::GeminiExtractor;
pub use upload::{is_accepted_mime, UploadedFile};

#[cfg(feature = "native")]
use crate::error::ExtractionError;
#[cfg(feature = "native")]
use crate::models::invoice::InvoiceRecord;

/// Result type for extraction operations.
#[cfg(feature = "native")]
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for invoice extractors.
///
/// One call is one attempt: implementations do not retry.
#[cfg(feature = "native")]
#[async_trait::async_trait]
pub trait InvoiceExtractor: Send + Sync {
    /// Extract a record from raw file bytes of the given MIME type.
    async fn extract(&self, file: &[u8], mime_type: &str) -> Result<InvoiceRecord>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

#[cfg(feature = "native")]
#[async_trait::async_trait]
impl<T: InvoiceExtractor + ?Sized> InvoiceExtractor for Box<T> {
    async fn extract(&self, file: &[u8], mime_type: &str) -> Result<InvoiceRecord> {
        (**self).extract(file, mime_type).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
