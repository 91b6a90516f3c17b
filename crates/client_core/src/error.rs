use shared::domain::{BillId, UnknownExpenseType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("attachment '{file_name}' rejected: only jpg, jpeg and png files are accepted")]
    InvalidAttachment { file_name: String },
    #[error("attachment upload failed for '{file_name}': {source}")]
    Upload {
        file_name: String,
        source: anyhow::Error,
    },
    #[error("no uploaded attachment is available for this bill")]
    MissingAttachment,
    #[error(transparent)]
    InvalidField(#[from] FieldError),
    #[error("failed to persist bill {bill_id}: {source}")]
    Persist {
        bill_id: BillId,
        source: anyhow::Error,
    },
    #[error("a bill submission is already in progress")]
    SubmitInProgress,
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("field '{field}' is required")]
    Missing { field: &'static str },
    #[error("amount '{value}' is not a number")]
    InvalidAmount { value: String },
    #[error(transparent)]
    UnknownExpenseType(#[from] UnknownExpenseType),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no user is signed in")]
    NoUser,
    #[error("stored user record is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("user {email} is not an employee")]
    NotEmployee { email: String },
    #[error("failed to read session file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}
