//! # Actions
//!
//! Everything that can happen in dana becomes an `Action`.
//! User presses Enter? That's `Action::Submit`.
//! The backend answers? That's `Action::ChatArrived(result)`.
//!
//! The `update()` function mutates the state and returns an `Effect` telling
//! the adapter what I/O to start. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  State' + Effect
//! ```
//!
//! Sends are deliberately not serialized: submitting while a chat request is
//! in flight starts a second, independent request, and the typing indicator
//! is cleared by whichever response arrives first.

use std::path::PathBuf;

use log::{info, warn};

use crate::api::{ApiError, ChatReply, UploadReply};
use crate::core::state::{App, UploadStatus};

/// Shown for any failed chat request, regardless of the failure kind.
pub const CHAT_ERROR_TEXT: &str = "Error generating response.";
/// Shown for any failed upload, regardless of the failure kind.
pub const UPLOAD_ERROR_TEXT: &str = "❌ Error uploading file.";
/// Announced when an upload starts.
pub const UPLOAD_START_TEXT: &str = "Uploading and processing data...";

#[derive(Debug)]
pub enum Action {
    /// Raw input text was submitted (manual entry and quick replies both land here).
    Submit(String),
    /// A chat request finished, successfully or not.
    ChatArrived(Result<ChatReply, ApiError>),
    /// The user picked a file to upload.
    UploadPicked(PathBuf),
    /// An upload request finished, successfully or not.
    UploadArrived(Result<UploadReply, ApiError>),
    /// Discard all conversation state (the page-reload analog).
    Reset,
    Quit,
}

/// What the adapter must do after an update.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    /// Issue a chat request carrying exactly this text.
    SendChat(String),
    /// Read the file and issue an upload request.
    SendUpload(PathBuf),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Effect::None;
            }
            app.welcome_dismissed = true;
            app.transcript.push_user(text.to_string());
            app.is_typing = true;
            app.status_message = String::from("Generating response...");
            Effect::SendChat(text.to_string())
        }
        Action::ChatArrived(result) => {
            app.is_typing = false;
            app.status_message = String::from(crate::core::state::DEFAULT_STATUS);
            match result {
                Ok(reply) => {
                    app.transcript.push_bot(reply.response, reply.image);
                }
                Err(e) => {
                    warn!("chat request failed: {e}");
                    app.transcript.push_system(CHAT_ERROR_TEXT.to_string());
                }
            }
            Effect::None
        }
        Action::UploadPicked(path) => {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned());
            info!("upload selected: {file_name}");
            app.upload_status = Some(UploadStatus { file_name });
            app.transcript.push_system(UPLOAD_START_TEXT.to_string());
            Effect::SendUpload(path)
        }
        Action::UploadArrived(result) => {
            match result {
                Ok(reply) => {
                    app.transcript.push_system(format!("✅ {}", reply.message));
                }
                Err(e) => {
                    warn!("upload failed: {e}");
                    app.transcript.push_system(UPLOAD_ERROR_TEXT.to_string());
                }
            }
            Effect::None
        }
        Action::Reset => {
            app.reset();
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transcript::Role;
    use crate::test_support::test_app;

    #[test]
    fn submit_appends_one_user_entry_and_one_send_effect() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("Hello".into()));

        assert_eq!(effect, Effect::SendChat("Hello".into()));
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.transcript.entries()[0].role, Role::User);
        assert_eq!(app.transcript.entries()[0].body, "Hello");
        assert!(app.is_typing);
        assert!(app.welcome_dismissed);
    }

    #[test]
    fn submit_trims_before_sending() {
        let mut app = test_app();
        let effect = update(&mut app, Action::Submit("  Hello  ".into()));
        assert_eq!(effect, Effect::SendChat("Hello".into()));
        assert_eq!(app.transcript.entries()[0].body, "Hello");
    }

    #[test]
    fn empty_submit_is_a_no_op() {
        let mut app = test_app();
        for input in ["", "   ", "\t\n"] {
            let effect = update(&mut app, Action::Submit(input.into()));
            assert_eq!(effect, Effect::None);
        }
        assert!(app.transcript.is_empty());
        assert!(!app.is_typing);
        assert!(app.show_welcome(), "welcome must survive empty submits");
    }

    #[test]
    fn chat_reply_without_image_appends_bot_entry() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hello".into()));

        let reply = ChatReply {
            response: "**hi**".into(),
            image: None,
        };
        let effect = update(&mut app, Action::ChatArrived(Ok(reply)));

        assert_eq!(effect, Effect::None);
        assert!(!app.is_typing);
        assert_eq!(app.transcript.len(), 2);
        let bot = &app.transcript.entries()[1];
        assert_eq!(bot.role, Role::Bot);
        assert_eq!(bot.body, "**hi**");
        assert_eq!(bot.image, None);
    }

    #[test]
    fn chat_reply_with_image_keeps_resolved_url() {
        let mut app = test_app();
        update(&mut app, Action::Submit("plot it".into()));

        let reply = ChatReply {
            response: "Here is the plot.".into(),
            image: Some("http://localhost:8000/static/plot_0.png?t=123".into()),
        };
        update(&mut app, Action::ChatArrived(Ok(reply)));

        let bot = &app.transcript.entries()[1];
        let url = bot.image.as_deref().unwrap();
        assert!(url.contains("/static/plot_0.png"));
        assert!(url.contains("t="));
    }

    #[test]
    fn failed_chat_appends_one_system_error_and_hides_typing() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hello".into()));
        assert!(app.is_typing);

        update(
            &mut app,
            Action::ChatArrived(Err(ApiError::Network("connection refused".into()))),
        );

        assert!(!app.is_typing);
        assert_eq!(app.transcript.len(), 2);
        let entry = &app.transcript.entries()[1];
        assert_eq!(entry.role, Role::System);
        assert!(entry.body.contains("Error"));
    }

    #[test]
    fn all_chat_failures_collapse_to_the_same_message() {
        for err in [
            ApiError::Network("dns".into()),
            ApiError::Api {
                status: 500,
                message: "boom".into(),
            },
            ApiError::Parse("bad json".into()),
        ] {
            let mut app = test_app();
            update(&mut app, Action::Submit("q".into()));
            update(&mut app, Action::ChatArrived(Err(err)));
            assert_eq!(app.transcript.entries()[1].body, CHAT_ERROR_TEXT);
        }
    }

    #[test]
    fn concurrent_sends_are_not_deduplicated() {
        // The documented race: a second submit while typing starts a second
        // request, and the first arrival clears the indicator for both.
        let mut app = test_app();
        let e1 = update(&mut app, Action::Submit("first".into()));
        let e2 = update(&mut app, Action::Submit("second".into()));
        assert_eq!(e1, Effect::SendChat("first".into()));
        assert_eq!(e2, Effect::SendChat("second".into()));
        assert_eq!(app.transcript.len(), 2);
        assert!(app.is_typing);

        update(
            &mut app,
            Action::ChatArrived(Ok(ChatReply {
                response: "answer to first".into(),
                image: None,
            })),
        );
        assert!(!app.is_typing, "first arrival hides the indicator");

        update(
            &mut app,
            Action::ChatArrived(Ok(ChatReply {
                response: "answer to second".into(),
                image: None,
            })),
        );
        assert_eq!(app.transcript.len(), 4);
    }

    #[test]
    fn upload_sets_status_panel_and_announces_start() {
        let mut app = test_app();
        let effect = update(&mut app, Action::UploadPicked(PathBuf::from("/tmp/data.csv")));

        assert_eq!(effect, Effect::SendUpload(PathBuf::from("/tmp/data.csv")));
        assert_eq!(
            app.upload_status.as_ref().unwrap().file_name,
            "data.csv"
        );
        assert_eq!(app.transcript.entries()[0].body, UPLOAD_START_TEXT);
        assert_eq!(app.transcript.entries()[0].role, Role::System);
    }

    #[test]
    fn upload_success_shows_server_message_verbatim() {
        let mut app = test_app();
        update(&mut app, Action::UploadPicked(PathBuf::from("data.csv")));
        update(
            &mut app,
            Action::UploadArrived(Ok(UploadReply {
                message: "Loaded 100 rows.".into(),
            })),
        );
        assert_eq!(app.transcript.entries()[1].body, "✅ Loaded 100 rows.");
    }

    #[test]
    fn upload_failure_shows_generic_error() {
        let mut app = test_app();
        update(&mut app, Action::UploadPicked(PathBuf::from("data.csv")));
        update(
            &mut app,
            Action::UploadArrived(Err(ApiError::Io("no such file".into()))),
        );
        assert_eq!(app.transcript.entries()[1].body, UPLOAD_ERROR_TEXT);
        // The status panel keeps showing the filename even after a failure.
        assert!(app.upload_status.is_some());
    }

    #[test]
    fn upload_status_persists_across_chat_traffic() {
        let mut app = test_app();
        update(&mut app, Action::UploadPicked(PathBuf::from("data.csv")));
        update(&mut app, Action::Submit("describe it".into()));
        update(
            &mut app,
            Action::ChatArrived(Ok(ChatReply {
                response: "ok".into(),
                image: None,
            })),
        );
        assert_eq!(app.upload_status.as_ref().unwrap().file_name, "data.csv");
    }

    #[test]
    fn reset_discards_everything() {
        let mut app = test_app();
        update(&mut app, Action::UploadPicked(PathBuf::from("data.csv")));
        update(&mut app, Action::Submit("hello".into()));

        let effect = update(&mut app, Action::Reset);

        assert_eq!(effect, Effect::None);
        assert!(app.transcript.is_empty());
        assert!(app.upload_status.is_none());
        assert!(!app.is_typing);
        assert!(app.show_welcome());
    }

    #[test]
    fn quit_yields_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
