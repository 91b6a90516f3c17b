//! Controller layer: form events in, state transitions, store calls and
//! navigation out.

pub mod events;

use std::sync::Arc;

use shared::domain::{Bill, FileId};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    assembler::{assemble_bill, BillFormFields},
    attachment::{validate_attachment, AttachmentCheck, SelectedFile},
    error::SubmissionError,
    navigation::{Navigator, Route},
    session::{require_employee, SessionStore},
    upload::{PendingUpload, UploadCoordinator},
    BillStore,
};

use events::{FormEvent, SubmissionEvent, SubmissionNotice};

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Uploading { attempt: u64 },
    Uploaded,
    UploadFailed { reason: String },
    Submitting,
    SubmitFailed { reason: String },
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSelection {
    /// Wrong extension; the file input was cleared and nothing was uploaded.
    Rejected { file_name: String },
    Uploaded(PendingUpload),
    /// The upload finished after a newer selection and was dropped.
    Superseded { attempt: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerOutcome {
    File(FileSelection),
    Submitted(Bill),
}

struct FormSession {
    state: SubmissionState,
    attempt: u64,
    pending: Option<PendingUpload>,
    file_input: Option<String>,
    /// Set while a persist call is outstanding; the form is locked until it
    /// resolves.
    submitting: bool,
}

/// Drives one new-bill (or edit-bill) form session.
pub struct SubmissionController {
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    store: Arc<dyn BillStore>,
    uploads: UploadCoordinator,
    inner: Mutex<FormSession>,
    events: broadcast::Sender<SubmissionEvent>,
}

impl SubmissionController {
    pub fn new(
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        store: Arc<dyn BillStore>,
    ) -> Self {
        Self::with_session(
            session,
            navigator,
            store,
            FormSession {
                state: SubmissionState::Idle,
                attempt: 0,
                pending: None,
                file_input: None,
                submitting: false,
            },
        )
    }

    /// Opens the form on an existing bill; its attachment stands in for an
    /// upload so a resubmission rewrites the same record.
    pub fn for_existing(
        bill: &Bill,
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        store: Arc<dyn BillStore>,
    ) -> Result<Self, SubmissionError> {
        let id = bill.id.as_ref().ok_or(SubmissionError::MissingAttachment)?;
        let pending = PendingUpload {
            file_url: bill.file_url.clone(),
            file_id: FileId(id.0.clone()),
            file_name: bill.file_name.clone(),
        };
        Ok(Self::with_session(
            session,
            navigator,
            store,
            FormSession {
                state: SubmissionState::Uploaded,
                attempt: 0,
                file_input: Some(pending.file_name.clone()),
                pending: Some(pending),
                submitting: false,
            },
        ))
    }

    fn with_session(
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        store: Arc<dyn BillStore>,
        form: FormSession,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            session,
            navigator,
            uploads: UploadCoordinator::new(Arc::clone(&store)),
            store,
            inner: Mutex::new(form),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SubmissionEvent> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> SubmissionState {
        self.inner.lock().await.state.clone()
    }

    pub async fn pending_upload(&self) -> Option<PendingUpload> {
        self.inner.lock().await.pending.clone()
    }

    /// Value currently shown by the attachment input; `None` means empty.
    pub async fn file_input_value(&self) -> Option<String> {
        self.inner.lock().await.file_input.clone()
    }

    pub async fn handle(&self, event: FormEvent) -> Result<ControllerOutcome, SubmissionError> {
        match event {
            FormEvent::FileSelected(file) => {
                self.select_file(file).await.map(ControllerOutcome::File)
            }
            FormEvent::Submit(fields) => {
                self.submit(fields).await.map(ControllerOutcome::Submitted)
            }
        }
    }

    pub async fn select_file(&self, file: SelectedFile) -> Result<FileSelection, SubmissionError> {
        let file_name = file.file_name.clone();
        let AttachmentCheck::Accepted(format) = validate_attachment(&file_name) else {
            let mut form = self.inner.lock().await;
            if form.submitting {
                return Err(SubmissionError::SubmitInProgress);
            }
            form.attempt += 1;
            form.pending = None;
            form.file_input = None;
            form.state = SubmissionState::Idle;
            drop(form);

            warn!(%file_name, "attachment rejected: unsupported extension");
            let err = SubmissionError::InvalidAttachment {
                file_name: file_name.clone(),
            };
            self.emit(SubmissionEvent::AttachmentRejected {
                file_name: file_name.clone(),
                notice: SubmissionNotice::from_error(&err),
            });
            return Ok(FileSelection::Rejected { file_name });
        };

        let owner = require_employee(self.session.as_ref())?;

        let attempt = {
            let mut form = self.inner.lock().await;
            if form.submitting {
                return Err(SubmissionError::SubmitInProgress);
            }
            form.attempt += 1;
            form.pending = None;
            form.file_input = Some(file_name.clone());
            form.state = SubmissionState::Uploading {
                attempt: form.attempt,
            };
            form.attempt
        };
        info!(attempt, %file_name, "attachment accepted, upload started");
        self.emit(SubmissionEvent::UploadStarted {
            attempt,
            file_name: file_name.clone(),
        });

        let result = self.uploads.upload(file, format, &owner.email).await;

        let mut form = self.inner.lock().await;
        if form.attempt != attempt {
            drop(form);
            debug!(attempt, %file_name, "discarding superseded upload");
            self.emit(SubmissionEvent::UploadDiscarded { attempt });
            return Ok(FileSelection::Superseded { attempt });
        }

        match result {
            Ok(upload) => {
                form.pending = Some(upload.clone());
                form.state = SubmissionState::Uploaded;
                drop(form);
                self.emit(SubmissionEvent::UploadCompleted {
                    attempt,
                    upload: upload.clone(),
                });
                Ok(FileSelection::Uploaded(upload))
            }
            Err(source) => {
                let err = SubmissionError::Upload { file_name, source };
                form.file_input = None;
                form.state = SubmissionState::UploadFailed {
                    reason: err.to_string(),
                };
                drop(form);
                warn!(attempt, error = %err, "attachment upload failed");
                self.emit(SubmissionEvent::UploadFailed {
                    attempt,
                    notice: SubmissionNotice::from_error(&err),
                });
                Err(err)
            }
        }
    }

    pub async fn submit(&self, fields: BillFormFields) -> Result<Bill, SubmissionError> {
        let owner = require_employee(self.session.as_ref())?;

        let (bill, selector) = {
            let mut form = self.inner.lock().await;
            if form.submitting {
                return Err(SubmissionError::SubmitInProgress);
            }
            let assembled = assemble_bill(&fields, form.pending.as_ref(), &owner.email)
                .and_then(|bill| {
                    let selector = bill.id.clone().ok_or(SubmissionError::MissingAttachment)?;
                    Ok((bill, selector))
                });
            let (bill, selector) = match assembled {
                Ok(assembled) => assembled,
                Err(err) => {
                    drop(form);
                    warn!(error = %err, "bill submission blocked");
                    return Err(err);
                }
            };
            form.submitting = true;
            form.state = SubmissionState::Submitting;
            (bill, selector)
        };
        info!(bill_id = %selector, "submitting bill");
        self.emit(SubmissionEvent::SubmitStarted {
            bill_id: selector.clone(),
        });

        match self.store.update(&selector, &bill).await {
            Ok(saved) => {
                {
                    let mut form = self.inner.lock().await;
                    form.submitting = false;
                    form.pending = None;
                    form.file_input = None;
                    form.state = SubmissionState::Done;
                }
                info!(bill_id = %selector, "bill submitted");
                self.navigator.navigate(Route::Bills);
                self.emit(SubmissionEvent::BillSubmitted {
                    bill: saved.clone(),
                });
                Ok(saved)
            }
            Err(source) => {
                let err = SubmissionError::Persist {
                    bill_id: selector,
                    source,
                };
                {
                    let mut form = self.inner.lock().await;
                    form.submitting = false;
                    form.state = SubmissionState::SubmitFailed {
                        reason: err.to_string(),
                    };
                }
                warn!(error = %err, "bill submission failed");
                self.emit(SubmissionEvent::SubmitFailed {
                    notice: SubmissionNotice::from_error(&err),
                });
                Err(err)
            }
        }
    }

    fn emit(&self, event: SubmissionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
