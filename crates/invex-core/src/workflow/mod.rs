//! Application workflow: idle, processing, success or error.
//!
//! The workflow owns the current record, the error message and the file
//! preview for one cycle. Every extraction failure collapses into one
//! generic message; the cause is only logged.

#[cfg(feature = "native")]
pub mod preview;

use std::fmt;

use crate::models::invoice::InvoiceRecord;

#[cfg(feature = "native")]
pub use preview::{FilePreview, PreviewKind};

/// Message shown for any failed extraction, in the interface language
/// (Arabic): "An error occurred while processing the invoice. Make sure the
/// file is clear and try again."
pub const PROCESSING_FAILED_MESSAGE: &str =
    "حدث خطأ أثناء معالجة الفاتورة. تأكد من أن الملف واضح وحاول مرة أخرى.";

/// Workflow state.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    /// Waiting for a file.
    Idle,
    /// Waiting for the extraction service.
    Processing,
    /// Extraction succeeded.
    Success(InvoiceRecord),
    /// Extraction failed; carries the user-facing message.
    Error(String),
}

/// Payload-free view of [`WorkflowState`], suitable for broadcasting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Processing,
    Success,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Idle => "idle",
            Status::Processing => "processing",
            Status::Success => "showing a result",
            Status::Error => "showing an error",
        };
        f.write_str(s)
    }
}

impl WorkflowState {
    pub fn status(&self) -> Status {
        match self {
            WorkflowState::Idle => Status::Idle,
            WorkflowState::Processing => Status::Processing,
            WorkflowState::Success(_) => Status::Success,
            WorkflowState::Error(_) => Status::Error,
        }
    }
}

#[cfg(feature = "native")]
pub use controller::{Ticket, Workflow};

#[cfg(feature = "native")]
mod controller {
    use tokio::sync::watch;
    use tracing::{debug, info, warn};

    use super::{FilePreview, Status, WorkflowState, PROCESSING_FAILED_MESSAGE};
    use crate::error::{ExtractionError, WorkflowError};
    use crate::extract::{InvoiceExtractor, UploadedFile};
    use crate::models::invoice::InvoiceRecord;

    /// Handle for one processing attempt, returned by [`Workflow::begin`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Ticket(u64);

    /// State controller driving one extraction at a time.
    pub struct Workflow<E> {
        extractor: E,
        state: WorkflowState,
        preview: Option<FilePreview>,
        attempt: u64,
        status_tx: watch::Sender<Status>,
    }

    impl<E: InvoiceExtractor> Workflow<E> {
        /// Create an idle workflow around an extractor.
        pub fn new(extractor: E) -> Self {
            let (status_tx, _) = watch::channel(Status::Idle);
            Self {
                extractor,
                state: WorkflowState::Idle,
                preview: None,
                attempt: 0,
                status_tx,
            }
        }

        pub fn state(&self) -> &WorkflowState {
            &self.state
        }

        pub fn status(&self) -> Status {
            self.state.status()
        }

        /// Extracted record, when in `Success`.
        pub fn record(&self) -> Option<&InvoiceRecord> {
            match &self.state {
                WorkflowState::Success(record) => Some(record),
                _ => None,
            }
        }

        /// User-facing error message, when in `Error`.
        pub fn error_message(&self) -> Option<&str> {
            match &self.state {
                WorkflowState::Error(message) => Some(message.as_str()),
                _ => None,
            }
        }

        pub fn preview(&self) -> Option<&FilePreview> {
            self.preview.as_ref()
        }

        pub fn extractor(&self) -> &E {
            &self.extractor
        }

        /// Receive every status transition.
        pub fn subscribe(&self) -> watch::Receiver<Status> {
            self.status_tx.subscribe()
        }

        /// Idle to Processing. Creates the preview for `file`.
        pub fn begin(&mut self, file: &UploadedFile) -> Result<Ticket, WorkflowError> {
            let status = self.status();
            if status != Status::Idle {
                return Err(WorkflowError::NotIdle(status));
            }

            // Release any earlier preview before creating its replacement
            self.preview = None;
            self.preview = match FilePreview::create(file) {
                Ok(preview) => Some(preview),
                Err(e) => {
                    warn!("Could not create preview for {}: {}", file.name, e);
                    None
                }
            };

            self.attempt += 1;
            info!(file = %file.name, mime_type = %file.mime_type, bytes = file.size(), "Processing invoice");
            self.transition(WorkflowState::Processing);
            Ok(Ticket(self.attempt))
        }

        /// Processing to Success or Error. Results for abandoned attempts are
        /// ignored.
        pub fn finish(&mut self, ticket: Ticket, result: Result<InvoiceRecord, ExtractionError>) {
            if ticket.0 != self.attempt || self.status() != Status::Processing {
                debug!(?ticket, status = %self.status(), "Ignoring result of an abandoned attempt");
                return;
            }

            match result {
                Ok(record) => {
                    info!(
                        vendor = %record.vendor_name,
                        items = record.items.len(),
                        "Extraction complete"
                    );
                    self.transition(WorkflowState::Success(record));
                }
                Err(e) => {
                    warn!(kind = ?e.kind(), extractor = self.extractor.name(), "Extraction failed: {}", e);
                    self.transition(WorkflowState::Error(PROCESSING_FAILED_MESSAGE.to_string()));
                }
            }
        }

        /// Run a full cycle for `file`: begin, extract once, finish.
        pub async fn select_file(&mut self, file: UploadedFile) -> Result<&WorkflowState, WorkflowError> {
            let ticket = self.begin(&file)?;
            let result = self.extractor.extract(&file.bytes, &file.mime_type).await;
            self.finish(ticket, result);
            Ok(&self.state)
        }

        /// Return to Idle, dropping record, message and preview. Calling this
        /// while Processing abandons the pending attempt.
        pub fn reset(&mut self) {
            if self.status() == Status::Processing {
                info!("Abandoning pending extraction");
            }
            self.preview = None;
            self.transition(WorkflowState::Idle);
        }

        fn transition(&mut self, state: WorkflowState) {
            debug!(from = %self.status(), to = %state.status(), "Workflow transition");
            self.state = state;
            self.status_tx.send_replace(self.state.status());
        }
    }

}
