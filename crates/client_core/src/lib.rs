//! Client-side bill submission workflow: attachment checks, upload
//! sequencing, bill assembly and the submit/navigate controller.

use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::{Bill, BillId},
    protocol::{AttachmentPayload, UploadResponse},
};

pub mod assembler;
pub mod attachment;
pub mod controller;
pub mod error;
pub mod http_store;
pub mod memory_store;
pub mod navigation;
pub mod session;
pub mod upload;

pub use assembler::{assemble_bill, BillFormFields};
pub use attachment::{validate_attachment, AttachmentCheck, ImageFormat, SelectedFile};
pub use controller::{
    events::{FormEvent, NoticeCategory, SubmissionEvent, SubmissionNotice},
    ControllerOutcome, FileSelection, SubmissionController, SubmissionState,
};
pub use error::{FieldError, SessionError, SubmissionError};
pub use http_store::HttpBillStore;
pub use memory_store::MemoryBillStore;
pub use navigation::{Navigator, RecordingNavigator, Route};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore};
pub use upload::{PendingUpload, UploadCoordinator};

/// Bills collection of the remote persistence API.
#[async_trait]
pub trait BillStore: Send + Sync {
    /// Stores an attachment and reserves the bill it belongs to.
    async fn create(&self, payload: AttachmentPayload) -> Result<UploadResponse>;
    /// Writes the full bill record under `selector`.
    async fn update(&self, selector: &BillId, bill: &Bill) -> Result<Bill>;
    async fn list(&self) -> Result<Vec<Bill>>;
}
