use std::fmt;

use async_trait::async_trait;

use super::types::{ChatReply, UploadReply};

/// Errors that can occur while talking to the analyst backend.
///
/// The UI collapses all of these into one generic transcript message per
/// operation; the variants exist so logs can tell the cases apart.
#[derive(Debug)]
pub enum ApiError {
    /// Network-level failure (DNS, connection refused, broken transport).
    Network(String),
    /// The backend answered with a non-success HTTP status.
    Api { status: u16, message: String },
    /// The response body was not the JSON we expected.
    Parse(String),
    /// Local I/O failure (e.g. the upload file could not be read).
    Io(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Api { status, message } => {
                write!(f, "server error (HTTP {status}): {message}")
            }
            ApiError::Parse(msg) => write!(f, "parse error: {msg}"),
            ApiError::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// The two calls the chat controller makes, behind a trait so the TUI takes
/// an injected `Arc<dyn AnalystBackend>` instead of reaching for globals.
#[async_trait]
pub trait AnalystBackend: Send + Sync {
    /// `POST /chat` with `{"message": text}`.
    async fn chat(&self, message: &str) -> Result<ChatReply, ApiError>;

    /// `POST /upload` with the file packaged as multipart form data.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadReply, ApiError>;

    /// Resolve a server-relative image path into a fetchable URL.
    /// Implementations append a cache-busting timestamp parameter.
    fn image_url(&self, path: &str) -> String;
}
