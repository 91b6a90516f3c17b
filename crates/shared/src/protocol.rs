use serde::{Deserialize, Serialize};

use crate::domain::FileId;

/// Body returned by `POST /bills` once the attachment is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_url: String,
    pub key: String,
}

impl UploadResponse {
    pub fn file_id(&self) -> FileId {
        FileId(self.key.clone())
    }
}

/// Attachment packaged for the bills collection `create` call.
#[derive(Debug, Clone)]
pub struct AttachmentPayload {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
    pub email: String,
}
