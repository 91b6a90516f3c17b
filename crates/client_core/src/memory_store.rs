use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{Bill, BillId},
    protocol::{AttachmentPayload, UploadResponse},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::BillStore;

const DEFAULT_FILE_HOST: &str = "memory://bills";

#[derive(Debug, Clone)]
struct StoredAttachment {
    file_name: String,
    email: String,
    size_bytes: usize,
}

#[derive(Default)]
struct MemoryState {
    attachments: HashMap<String, StoredAttachment>,
    bills: Vec<Bill>,
}

/// Process-local bills collection.
pub struct MemoryBillStore {
    file_host: String,
    inner: Mutex<MemoryState>,
}

impl Default for MemoryBillStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBillStore {
    pub fn new() -> Self {
        Self {
            file_host: DEFAULT_FILE_HOST.to_string(),
            inner: Mutex::new(MemoryState::default()),
        }
    }

    pub fn with_bills(bills: Vec<Bill>) -> Self {
        Self {
            file_host: DEFAULT_FILE_HOST.to_string(),
            inner: Mutex::new(MemoryState {
                attachments: HashMap::new(),
                bills,
            }),
        }
    }

    pub async fn attachment_count(&self) -> usize {
        self.inner.lock().await.attachments.len()
    }
}

#[async_trait]
impl BillStore for MemoryBillStore {
    async fn create(&self, payload: AttachmentPayload) -> Result<UploadResponse> {
        let key = Uuid::new_v4().to_string();
        let file_url = format!("{}/{key}/{}", self.file_host, payload.file_name);
        self.inner.lock().await.attachments.insert(
            key.clone(),
            StoredAttachment {
                file_name: payload.file_name,
                email: payload.email,
                size_bytes: payload.bytes.len(),
            },
        );
        Ok(UploadResponse { file_url, key })
    }

    async fn update(&self, selector: &BillId, bill: &Bill) -> Result<Bill> {
        let mut state = self.inner.lock().await;
        let known_bill = state
            .bills
            .iter()
            .position(|stored| stored.id.as_ref() == Some(selector));
        if known_bill.is_none() && !state.attachments.contains_key(selector.as_str()) {
            return Err(anyhow!("no bill or attachment stored under {selector}"));
        }
        if let Some(attachment) = state.attachments.get(selector.as_str()) {
            if attachment.email != bill.email {
                return Err(anyhow!(
                    "attachment {selector} belongs to {}, not {}",
                    attachment.email,
                    bill.email
                ));
            }
            tracing::debug!(
                %selector,
                file_name = %attachment.file_name,
                size_bytes = attachment.size_bytes,
                "attaching stored file to bill"
            );
        }

        let mut saved = bill.clone();
        saved.id = Some(selector.clone());
        match known_bill {
            Some(index) => state.bills[index] = saved.clone(),
            None => state.bills.push(saved.clone()),
        }
        Ok(saved)
    }

    async fn list(&self) -> Result<Vec<Bill>> {
        Ok(self.inner.lock().await.bills.clone())
    }
}
