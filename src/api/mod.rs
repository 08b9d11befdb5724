//! # API Boundary
//!
//! Everything that crosses HTTP lives here. The backend exposes exactly two
//! endpoints — `POST /chat` and `POST /upload` — and their implementation is
//! external and unknown to this crate; we only assume the response shapes in
//! [`types`].

pub mod backend;
pub mod client;
pub mod types;

pub use backend::{AnalystBackend, ApiError};
pub use client::ApiClient;
pub use types::{ChatReply, ChatRequest, UploadReply};
