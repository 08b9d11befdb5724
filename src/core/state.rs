//! # Application State
//!
//! Core controller state. This module contains domain logic only — no
//! ratatui types. Presentation state (scroll offsets, fade timers, the input
//! buffer) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn AnalystBackend>   // injected HTTP boundary
//! ├── transcript: Transcript             // append-only message log
//! ├── status_message: String             // status bar text
//! ├── is_typing: bool                    // a chat request is in flight
//! ├── upload_status: Option<UploadStatus>// filename panel, sticky once set
//! └── welcome_dismissed: bool            // welcome panel hidden after first send
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::api::AnalystBackend;
use crate::core::transcript::Transcript;

pub const DEFAULT_STATUS: &str = "Upload a CSV and ask about your data";

/// The upload status panel: set on the first file selection, never cleared
/// within a session except by reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadStatus {
    pub file_name: String,
}

pub struct App {
    pub backend: Arc<dyn AnalystBackend>,
    pub transcript: Transcript,
    pub status_message: String,
    pub is_typing: bool,
    pub upload_status: Option<UploadStatus>,
    pub welcome_dismissed: bool,
}

impl App {
    pub fn new(backend: Arc<dyn AnalystBackend>) -> Self {
        Self {
            backend,
            transcript: Transcript::new(),
            status_message: String::from(DEFAULT_STATUS),
            is_typing: false,
            upload_status: None,
            welcome_dismissed: false,
        }
    }

    /// The page-reload analog: every piece of conversation state is discarded
    /// and the welcome panel comes back. The backend handle survives.
    pub fn reset(&mut self) {
        self.transcript = Transcript::new();
        self.status_message = String::from(DEFAULT_STATUS);
        self.is_typing = false;
        self.upload_status = None;
        self.welcome_dismissed = false;
    }

    /// The welcome panel is shown exactly until the first send.
    pub fn show_welcome(&self) -> bool {
        !self.welcome_dismissed && self.transcript.is_empty()
    }
}
