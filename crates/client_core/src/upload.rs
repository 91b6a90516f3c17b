use std::sync::Arc;

use anyhow::{anyhow, Result};
use shared::{domain::FileId, protocol::AttachmentPayload};
use tracing::{debug, info};

use crate::{attachment::ImageFormat, BillStore, SelectedFile};

/// Reference to a stored attachment that has not been folded into a bill yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub file_url: String,
    pub file_id: FileId,
    pub file_name: String,
}

/// Sends accepted attachments to the bills collection.
pub struct UploadCoordinator {
    store: Arc<dyn BillStore>,
}

impl UploadCoordinator {
    pub fn new(store: Arc<dyn BillStore>) -> Self {
        Self { store }
    }

    pub async fn upload(
        &self,
        file: SelectedFile,
        format: ImageFormat,
        owner_email: &str,
    ) -> Result<PendingUpload> {
        let file_name = file.file_name;
        debug!(
            %file_name,
            size_bytes = file.bytes.len(),
            "uploading bill attachment"
        );

        let response = self
            .store
            .create(AttachmentPayload {
                file_name: file_name.clone(),
                mime_type: Some(format.mime_type().to_string()),
                bytes: file.bytes,
                email: owner_email.to_string(),
            })
            .await?;

        if response.key.trim().is_empty() {
            return Err(anyhow!("store returned an empty key for '{file_name}'"));
        }

        info!(%file_name, key = %response.key, "bill attachment stored");
        Ok(PendingUpload {
            file_url: response.file_url.clone(),
            file_id: response.file_id(),
            file_name,
        })
    }
}
