//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{AnalystBackend, ApiError, ChatReply, UploadReply};

/// A canned-reply backend for tests that don't need real HTTP.
pub struct StubBackend;

#[async_trait]
impl AnalystBackend for StubBackend {
    async fn chat(&self, _message: &str) -> Result<ChatReply, ApiError> {
        Ok(ChatReply {
            response: "stub response".to_string(),
            image: None,
        })
    }

    async fn upload(&self, _file_name: &str, _bytes: Vec<u8>) -> Result<UploadReply, ApiError> {
        Ok(UploadReply {
            message: "stub upload".to_string(),
        })
    }

    fn image_url(&self, path: &str) -> String {
        format!("{path}?t=0")
    }
}

/// Creates a test App wired to a StubBackend.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(Arc::new(StubBackend))
}
