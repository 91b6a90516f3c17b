use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response};
use shared::{
    domain::{Bill, BillId},
    error::{ApiError, ApiException},
    protocol::{AttachmentPayload, UploadResponse},
};
use tracing::debug;
use url::Url;

use crate::BillStore;

/// Bills collection of the REST backend.
pub struct HttpBillStore {
    http: Client,
    api_url: Url,
    token: Option<String>,
}

impl HttpBillStore {
    pub fn new(api_url: &str) -> Result<Self> {
        let mut api_url =
            Url::parse(api_url).with_context(|| format!("invalid api url '{api_url}'"))?;
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            api_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path)
            .with_context(|| format!("invalid bills endpoint '{path}'"))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.json::<ApiError>().await.ok();
        Err(ApiException::from_response(status.as_u16(), body).into())
    }
}

#[async_trait]
impl BillStore for HttpBillStore {
    async fn create(&self, payload: AttachmentPayload) -> Result<UploadResponse> {
        let mut file = multipart::Part::bytes(payload.bytes).file_name(payload.file_name);
        if let Some(mime_type) = payload.mime_type {
            file = file.mime_str(&mime_type)?;
        }
        let form = multipart::Form::new()
            .part("file", file)
            .text("email", payload.email);

        let url = self.endpoint("bills")?;
        debug!(%url, "POST bill attachment");
        let response = self
            .authorized(self.http.post(url))
            .multipart(form)
            .send()
            .await?;
        Ok(Self::check_status(response).await?.json().await?)
    }

    async fn update(&self, selector: &BillId, bill: &Bill) -> Result<Bill> {
        let mut url = self.endpoint("bills")?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("api url cannot be a base: {}", self.api_url))?
            .push(selector.as_str());
        debug!(%url, "PATCH bill");
        let response = self
            .authorized(self.http.patch(url))
            .json(bill)
            .send()
            .await?;
        Ok(Self::check_status(response).await?.json().await?)
    }

    async fn list(&self) -> Result<Vec<Bill>> {
        let url = self.endpoint("bills")?;
        let response = self.authorized(self.http.get(url)).send().await?;
        Ok(Self::check_status(response).await?.json().await?)
    }
}

#[cfg(test)]
#[path = "tests/http_store_tests.rs"]
mod tests;
