//! Core library for AI-assisted invoice extraction.
//!
//! This crate provides:
//! - Invoice record models shared with the extraction service and the browser
//! - Spreadsheet-ready CSV export (BOM, text-preserving code columns)
//! - The Gemini extraction client behind the [`InvoiceExtractor`] trait
//! - The idle/processing/success/error workflow with a revocable file preview

pub mod error;
pub mod export;
pub mod extract;
pub mod models;
pub mod workflow;

pub use error::{ErrorKind, ExtractionError, InvexError, Result, WorkflowError};
pub use export::{csv, format_amount};
pub use extract::{is_accepted_mime, UploadedFile};
pub use models::config::InvexConfig;
pub use models::invoice::{InvoiceRecord, LineItem};
pub use workflow::{Status, WorkflowState, PROCESSING_FAILED_MESSAGE};

#[cfg(feature = "native")]
pub use extract::{GeminiExtractor, InvoiceExtractor};
#[cfg(feature = "native")]
pub use workflow::{FilePreview, PreviewKind, Ticket, Workflow};
