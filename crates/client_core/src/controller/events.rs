//! Form input events consumed by the controller and the notices it emits.

use shared::{
    domain::{Bill, BillId},
    error::{ApiException, ErrorCode},
};

use crate::{
    assembler::BillFormFields, attachment::SelectedFile, error::SubmissionError,
    upload::PendingUpload,
};

/// Inputs of the new-bill form.
#[derive(Debug, Clone)]
pub enum FormEvent {
    FileSelected(SelectedFile),
    Submit(BillFormFields),
}

#[derive(Debug, Clone)]
pub enum SubmissionEvent {
    AttachmentRejected {
        file_name: String,
        notice: SubmissionNotice,
    },
    UploadStarted {
        attempt: u64,
        file_name: String,
    },
    UploadCompleted {
        attempt: u64,
        upload: PendingUpload,
    },
    /// A newer file selection superseded this attempt.
    UploadDiscarded {
        attempt: u64,
    },
    UploadFailed {
        attempt: u64,
        notice: SubmissionNotice,
    },
    SubmitStarted {
        bill_id: BillId,
    },
    BillSubmitted {
        bill: Bill,
    },
    SubmitFailed {
        notice: SubmissionNotice,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

/// User-facing description of a workflow failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionNotice {
    category: NoticeCategory,
    message: String,
}

impl SubmissionNotice {
    pub fn from_error(error: &SubmissionError) -> Self {
        let category = match error {
            SubmissionError::InvalidAttachment { .. }
            | SubmissionError::MissingAttachment
            | SubmissionError::InvalidField(_)
            | SubmissionError::SubmitInProgress => NoticeCategory::Validation,
            SubmissionError::Session(_) => NoticeCategory::Auth,
            SubmissionError::Upload { source, .. } | SubmissionError::Persist { source, .. } => {
                classify_remote_failure(source)
            }
        };
        Self {
            category,
            message: error.to_string(),
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.category == NoticeCategory::Auth
    }

    pub fn category(&self) -> NoticeCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

fn classify_remote_failure(source: &anyhow::Error) -> NoticeCategory {
    if let Some(api) = source.downcast_ref::<ApiException>() {
        return match api.code {
            ErrorCode::Unauthorized | ErrorCode::Forbidden => NoticeCategory::Auth,
            ErrorCode::Validation => NoticeCategory::Validation,
            ErrorCode::NotFound | ErrorCode::Internal => NoticeCategory::Unknown,
        };
    }
    if let Some(http) = source.downcast_ref::<reqwest::Error>() {
        if http.is_connect() || http.is_timeout() || http.is_request() {
            return NoticeCategory::Transport;
        }
    }

    let message = source.to_string().to_ascii_lowercase();
    if message.contains("401")
        || message.contains("403")
        || message.contains("unauthorized")
        || message.contains("forbidden")
    {
        NoticeCategory::Auth
    } else if message.contains("timeout")
        || message.contains("timed out")
        || message.contains("connection")
        || message.contains("network")
        || message.contains("unavailable")
    {
        NoticeCategory::Transport
    } else {
        NoticeCategory::Unknown
    }
}
