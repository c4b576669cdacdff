//! Local preview of the submitted file.
//!
//! A preview is a temporary copy of the upload that views can open while the
//! workflow is processing or showing results. Dropping it deletes the copy.

use std::io::{Cursor, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::extract::UploadedFile;

/// What the preview shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    /// Raster image with pixel dimensions.
    Image { width: u32, height: u32 },
    /// PDF document with page count.
    Pdf { pages: usize },
    /// Accepted file whose content could not be probed.
    Unknown,
}

/// Revocable local reference to an uploaded file.
#[derive(Debug)]
pub struct FilePreview {
    file: NamedTempFile,
    name: String,
    mime_type: String,
    kind: PreviewKind,
}

impl FilePreview {
    /// Copy the upload to a temporary file and probe its content.
    pub fn create(upload: &UploadedFile) -> std::io::Result<Self> {
        let suffix = Path::new(&upload.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();

        let mut file = tempfile::Builder::new()
            .prefix("invex-preview-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(&upload.bytes)?;
        file.flush()?;

        let kind = probe(upload);
        debug!(path = %file.path().display(), ?kind, "Created preview");

        Ok(Self {
            file,
            name: upload.name.clone(),
            mime_type: upload.mime_type.clone(),
            kind,
        })
    }

    /// Location of the preview copy. Valid until the preview is dropped.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Original file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn kind(&self) -> PreviewKind {
        self.kind
    }

    /// Short human-readable description.
    pub fn describe(&self) -> String {
        match self.kind {
            PreviewKind::Image { width, height } => format!("{} ({}x{} image)", self.name, width, height),
            PreviewKind::Pdf { pages: 1 } => format!("{} (PDF, 1 page)", self.name),
            PreviewKind::Pdf { pages } => format!("{} (PDF, {} pages)", self.name, pages),
            PreviewKind::Unknown => self.name.clone(),
        }
    }
}

fn probe(upload: &UploadedFile) -> PreviewKind {
    if upload.is_pdf() {
        match lopdf::Document::load_mem(&upload.bytes) {
            Ok(doc) => PreviewKind::Pdf { pages: doc.get_pages().len() },
            Err(e) => {
                debug!("Could not read PDF for preview: {}", e);
                PreviewKind::Unknown
            }
        }
    } else {
        let dimensions = image::ImageReader::new(Cursor::new(&upload.bytes))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.into_dimensions().ok());

        match dimensions {
            Some((width, height)) => PreviewKind::Image { width, height },
            None => PreviewKind::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_image_preview() {
        let upload = UploadedFile::new("scan.png", png_bytes(4, 3), "image/png");
        let preview = FilePreview::create(&upload).unwrap();

        assert_eq!(preview.kind(), PreviewKind::Image { width: 4, height: 3 });
        assert_eq!(preview.describe(), "scan.png (4x3 image)");
        assert!(preview.path().to_string_lossy().ends_with(".png"));
        assert_eq!(std::fs::read(preview.path()).unwrap(), upload.bytes);
    }

    #[test]
    fn test_unreadable_content_is_unknown() {
        let upload = UploadedFile::new("broken.pdf", b"not a pdf".to_vec(), "application/pdf");
        let preview = FilePreview::create(&upload).unwrap();
        assert_eq!(preview.kind(), PreviewKind::Unknown);
        assert_eq!(preview.describe(), "broken.pdf");
    }

    #[test]
    fn test_drop_revokes_preview() {
        let upload = UploadedFile::new("scan.jpg", vec![1, 2, 3], "image/jpeg");
        let preview = FilePreview::create(&upload).unwrap();
        let path = preview.path().to_path_buf();
        assert!(path.exists());

        drop(preview);
        assert!(!path.exists());
    }
}
