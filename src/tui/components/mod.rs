//! # TUI Components
//!
//! All UI pieces for the terminal interface, following two patterns:
//!
//! - **Stateless (props-based)**: `StatusBar`, `UploadPanel`, `Message`,
//!   `WelcomePanel` — created fresh each frame from current data.
//! - **Stateful (event-driven)**: `InputBox`, `TranscriptViewState` — hold
//!   local state and emit high-level events.
//!
//! Components receive external data as props (struct fields), never by
//! reaching into global state; the dependencies stay explicit and each file
//! carries its own tests.

pub mod input_box;
pub mod message;
pub mod status_bar;
pub mod transcript_view;
pub mod welcome;

pub use input_box::{InputBox, InputEvent, Prompt};
pub use status_bar::{StatusBar, UploadPanel};
pub use transcript_view::{TranscriptView, TranscriptViewState};
pub use welcome::WelcomePanel;
