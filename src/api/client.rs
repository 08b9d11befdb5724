//! reqwest implementation of [`AnalystBackend`].
//!
//! Both requests are single-shot JSON round-trips. No timeouts are configured
//! and nothing is retried or cancelled: a request, once issued, runs to
//! completion or failure on the transport's own terms.

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use reqwest::multipart::{Form, Part};

use super::backend::{AnalystBackend, ApiError};
use super::types::{ChatReply, ChatRequest, UploadReply};

pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for the given server base URL (trailing slash tolerated).
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Checks the HTTP status and reads the body, mapping failures into the
    /// [`ApiError`] taxonomy.
    async fn read_body(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("backend returned HTTP {}: {}", status.as_u16(), message);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }
        response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))
    }
}

#[async_trait]
impl AnalystBackend for ApiClient {
    async fn chat(&self, message: &str) -> Result<ChatReply, ApiError> {
        let request = ChatRequest {
            message: message.to_string(),
        };
        debug!("POST {}/chat ({} bytes)", self.base_url, message.len());

        let response = self
            .http
            .post(format!("{}/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let body = Self::read_body(response).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadReply, ApiError> {
        debug!(
            "POST {}/upload ({}, {} bytes)",
            self.base_url,
            file_name,
            bytes.len()
        );
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let body = Self::read_body(response).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Joins the server base with a returned path and appends `t=<unix millis>`
    /// so a re-generated plot at the same path is never served stale.
    fn image_url(&self, path: &str) -> String {
        let sep = if path.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}t={}",
            self.base_url,
            path,
            sep,
            Utc::now().timestamp_millis()
        )
    }
}
