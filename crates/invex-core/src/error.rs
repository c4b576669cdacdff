//! Error types for the invex-core library.

use thiserror::Error;

use crate::workflow::Status;

/// Main error type for the invex library.
#[derive(Error, Debug)]
pub enum InvexError {
    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Workflow transition error.
    #[error("workflow error: {0}")]
    Workflow(#[from] WorkflowError),

    /// The submitted file type is not accepted by the upload surface.
    #[error("unsupported file: {0}")]
    UnsupportedFile(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Broad failure class of an [`ExtractionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No usable credential or endpoint configuration.
    Configuration,
    /// The service answered without a usable payload.
    Extraction,
    /// The request never completed.
    Transport,
}

/// Errors raised by an invoice extractor.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Missing credential or invalid client setup. Never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The service returned no text payload.
    #[error("no data returned from the extraction service")]
    EmptyResponse,

    /// The payload did not decode into an invoice record.
    #[error("failed to decode extraction payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// The service rejected the request.
    #[error("extraction service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    /// Network-level failure (connect, timeout, broken body).
    #[error("transport error: {0}")]
    Transport(String),
}

impl ExtractionError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractionError::Configuration(_) => ErrorKind::Configuration,
            ExtractionError::EmptyResponse
            | ExtractionError::Decode(_)
            | ExtractionError::Service { .. } => ErrorKind::Extraction,
            ExtractionError::Transport(_) => ErrorKind::Transport,
        }
    }
}

/// Errors related to workflow transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    /// A file can only be selected while the workflow is idle.
    #[error("cannot select a file while {0}")]
    NotIdle(Status),
}

/// Result type for the invex library.
pub type Result<T> = std::result::Result<T, InvexError>;
