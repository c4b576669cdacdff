//! A single submitted document.

use std::path::Path;

use crate::error::{InvexError, Result};

/// One uploaded file: name, raw bytes and declared MIME type.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl UploadedFile {
    /// Create from in-memory data.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Create from in-memory data, rejecting content types the upload
    /// surface does not accept.
    pub fn try_new(
        name: impl Into<String>,
        bytes: Vec<u8>,
        mime_type: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let mime_type = mime_type.into();
        if !is_accepted_mime(&mime_type) {
            return Err(InvexError::UnsupportedFile(format!(
                "{} has type {} (accepted: PDF and images)",
                name, mime_type
            )));
        }
        Ok(Self::new(name, bytes, mime_type))
    }

    /// Read a file from disk, inferring its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let mime_type = mime_for_extension(&extension).ok_or_else(|| {
            InvexError::UnsupportedFile(format!(
                "{} (accepted: PDF, JPG, PNG and other images)",
                path.display()
            ))
        })?;

        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("invoice")
            .to_string();

        Self::try_new(name, bytes, mime_type)
    }

    /// Whether this is a PDF document.
    pub fn is_pdf(&self) -> bool {
        self.mime_type == "application/pdf"
    }

    /// File size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// MIME type for a lowercase file extension accepted by the upload surface.
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension {
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "tif" | "tiff" => Some("image/tiff"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// Accepted content types: any image, or PDF.
pub fn is_accepted_mime(mime_type: &str) -> bool {
    let mime_type = mime_type.trim().to_ascii_lowercase();
    mime_type.starts_with("image/") || mime_type == "application/pdf"
}
