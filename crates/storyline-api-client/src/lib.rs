//! HTTP client for the Storyline upload endpoint.
//!
//! [`ApiClient`] implements [`UploadTransport`]: it posts one file as
//! multipart form data and hands back the status and body untouched, leaving
//! interpretation to the upload controller.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use storyline_core::config::{ApiSettings, UploadConfig};
use storyline_core::models::{MediaKind, RawResponse, SelectedFile};
use storyline_upload::transport::{TransportError, UploadTransport};

/// Upload endpoint path, relative to the base URL
pub const UPLOAD_PATH: &str = "/uploads";

/// Multipart field carrying the file
const FILES_FIELD: &str = "files";

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        })
    }

    /// Create client from environment: STORYLINE_API_URL (or API_URL),
    /// STORYLINE_API_TOKEN, STORYLINE_HTTP_TIMEOUT_SECS.
    pub fn from_env() -> Result<Self> {
        let config = UploadConfig::from_env().context("Failed to load upload configuration")?;
        Self::new(&config.api)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    fn file_form(file: &SelectedFile) -> Result<Form, TransportError> {
        let mut part = Part::bytes(file.data.to_vec()).file_name(file.name.clone());
        if !file.content_type.is_empty() {
            part = part
                .mime_str(&file.content_type)
                .map_err(|e| TransportError::Request(format!("Invalid content type: {}", e)))?;
        }
        Ok(Form::new().part(FILES_FIELD, part))
    }
}

/// Parse a body as JSON, keeping non-JSON text as a string value.
fn body_value(text: String) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&text).unwrap_or(Value::String(text))
}

fn transport_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else if e.is_connect() {
        TransportError::Connection(e.to_string())
    } else {
        TransportError::Request(e.to_string())
    }
}

#[async_trait]
impl UploadTransport for ApiClient {
    async fn send_file(
        &self,
        file: &SelectedFile,
        kind: MediaKind,
    ) -> Result<RawResponse, TransportError> {
        let url = self.build_url(UPLOAD_PATH);
        let form = Self::file_form(file)?;
        let request = self.apply_auth(self.client.post(&url).multipart(form));

        tracing::debug!(url = %url, file_name = %file.name, kind = %kind, "Sending upload request");

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(transport_error)?;

        tracing::debug!(status, bytes = text.len(), "Upload endpoint responded");

        Ok(RawResponse::new(status, body_value(text)))
    }
}
