// src/api.rs
//! Single HTTP transport for the resume-analyzer service. Every request
//! inherits the bearer credential currently held by the client; the
//! credential is written only through the session manager.

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::RwLock;
use tracing::trace;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Failure of a single API call. `Status` keeps the decoded error payload
/// (when the server sent JSON) so callers can extract field-level messages.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned HTTP {status}")]
    Status {
        status: StatusCode,
        body: Option<serde_json::Value>,
    },
}

impl ApiError {
    pub fn body(&self) -> Option<&serde_json::Value> {
        match self {
            ApiError::Status { body, .. } => body.as_ref(),
            ApiError::Transport(_) => None,
        }
    }

    /// First message under a named field of the error payload, e.g.
    /// `{"file": ["Only PDF and DOCX files are allowed"]}`.
    pub fn field_message(&self, field: &str) -> Option<String> {
        self.body()?
            .get(field)?
            .get(0)?
            .as_str()
            .map(str::to_string)
    }

    /// The `detail` message of the error payload, if present.
    pub fn detail(&self) -> Option<String> {
        self.body()?.get("detail")?.as_str().map(str::to_string)
    }
}

pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    bearer: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: String, timeout_seconds: u64) -> Result<Self> {
        let timeout = if timeout_seconds == 0 {
            DEFAULT_TIMEOUT_SECS
        } else {
            timeout_seconds
        };
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            bearer: RwLock::new(None),
        })
    }

    /// Current bearer credential, if any. Exposed so callers can display
    /// session status; mutation stays with the session manager.
    pub fn auth_token(&self) -> Option<String> {
        match self.bearer.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub(crate) fn set_auth_token(&self, token: &str) {
        let mut guard = match self.bearer.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(token.to_string());
    }

    pub(crate) fn clear_auth_token(&self) {
        let mut guard = match self.bearer.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = None;
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn read_json<R>(response: Response) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            Ok(response.json::<R>().await?)
        } else {
            Err(Self::status_error(status, response).await)
        }
    }

    async fn status_error(status: StatusCode, response: Response) -> ApiError {
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).ok();
        ApiError::Status { status, body }
    }

    pub async fn get<R>(&self, endpoint: &str) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        trace!("GET {}", url);

        let response = self.authorize(self.client.get(&url)).send().await?;
        Self::read_json(response).await
    }

    pub async fn post_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R, ApiError>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        trace!("POST {}", url);

        let response = self
            .authorize(self.client.post(&url))
            .json(payload)
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Binary upload as a multipart form with a single file field.
    pub async fn post_multipart<R>(
        &self,
        endpoint: &str,
        field: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
    {
        let url = self.url(endpoint);
        trace!("POST {} (multipart, {} bytes)", url, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type_for(file_name))?;
        let form = Form::new().part(field.to_string(), part);

        let response = self
            .authorize(self.client.post(&url))
            .multipart(form)
            .send()
            .await?;
        Self::read_json(response).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<(), ApiError> {
        let url = self.url(endpoint);
        trace!("DELETE {}", url);

        let response = self.authorize(self.client.delete(&url)).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::status_error(status, response).await)
        }
    }
}

/// Mime type for the multipart encoding. Unknown extensions are sent as
/// octet-stream; the server owns file-type validation.
fn content_type_for(file_name: &str) -> &'static str {
    let lower_name = file_name.to_lowercase();
    if lower_name.ends_with(".pdf") {
        "application/pdf"
    } else if lower_name.ends_with(".docx") {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    } else {
        "application/octet-stream"
    }
}
