//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI, and
//! translates keyboard events into `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (typing indicator, fade-in): draws every ~80ms.
//! - **Idle**: sleeps up to 500ms, only redraws on events or resize.
//!
//! ## Request model
//!
//! Chat and upload requests are independent fire-and-forget `tokio::spawn`
//! tasks that report back over an `mpsc` channel. There is no shared lock,
//! no cancellation, and no ordering guarantee between overlapping requests —
//! the typing indicator is cleared by whichever chat response arrives first.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use std::io::stdout;
use std::path::PathBuf;
use std::sync::{Arc, mpsc};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use log::{debug, info, warn};

use crate::api::{AnalystBackend, ApiClient, ApiError};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{InputBox, InputEvent, Prompt, TranscriptViewState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub transcript: TranscriptViewState,
    pub input_box: InputBox,
    pub server_url: String,
    pub quick_replies: Vec<String>,
}

impl TuiState {
    pub fn new(server_url: String, quick_replies: Vec<String>) -> Self {
        Self {
            transcript: TranscriptViewState::new(),
            input_box: InputBox::new(),
            server_url,
            quick_replies,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,                        // Show cursor for input editing
            SetCursorStyle::SteadyBlock, // Non-blinking: avoids blink timer reset from continuous redraws
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide // Hide cursor on exit
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn AnalystBackend> = Arc::new(ApiClient::new(config.server_url.clone()));
    let mut app = App::new(backend);
    let mut tui = TuiState::new(config.server_url, config.quick_replies);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background request tasks
    let (tx, rx) = mpsc::channel::<Action>();

    let start_time = std::time::Instant::now();
    let mut needs_redraw = true; // Force first frame
    let mut should_quit = false;

    loop {
        // Typing indicator and fade-in need a steady clock
        let animating = app.is_typing || tui.transcript.has_active_fade();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let elapsed = start_time.elapsed().as_secs_f32();
            let spinner_frame = (elapsed * 10.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Dynamic poll timeout: short when animating, long when idle
        let timeout = if animating {
            std::time::Duration::from_millis(80)
        } else {
            std::time::Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain all pending events before the next draw
        for ev in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match ev {
                // Resize just needs the redraw already flagged above
                TuiEvent::Resize => {}

                TuiEvent::ForceQuit => {
                    if dispatch(&mut app, Action::Quit, &tx) {
                        should_quit = true;
                    }
                }

                // The reload analog: core and presentation state both restart.
                // In-flight requests keep running (there is no cancellation);
                // a late response appends to the fresh transcript.
                TuiEvent::Reset => {
                    dispatch(&mut app, Action::Reset, &tx);
                    tui.transcript = TranscriptViewState::new();
                    tui.input_box = InputBox::new();
                }

                TuiEvent::OpenUploadPrompt => tui.input_box.begin_upload_prompt(),
                TuiEvent::Escape => tui.input_box.end_upload_prompt(),

                ev @ (TuiEvent::ScrollUp
                | TuiEvent::ScrollDown
                | TuiEvent::ScrollPageUp
                | TuiEvent::ScrollPageDown) => {
                    tui.transcript.handle_event(&ev);
                }

                // Welcome-panel quick replies: fill the input with the preset
                // and run the exact same submit path as manual entry.
                TuiEvent::InputChar(c)
                    if c.is_ascii_digit()
                        && app.show_welcome()
                        && tui.input_box.prompt == Prompt::Chat
                        && tui.input_box.buffer.is_empty()
                        && preset_index(c, &tui.quick_replies).is_some() =>
                {
                    let idx = preset_index(c, &tui.quick_replies).expect("guarded");
                    let preset = tui.quick_replies[idx].clone();
                    tui.input_box.set_text(&preset);
                    if let Some(InputEvent::Submit(text)) =
                        tui.input_box.handle_event(&TuiEvent::Submit)
                        && dispatch(&mut app, Action::Submit(text), &tx)
                    {
                        should_quit = true;
                    }
                }

                other => {
                    if let Some(InputEvent::Submit(text)) = tui.input_box.handle_event(&other) {
                        let action = match tui.input_box.prompt {
                            Prompt::Chat => Action::Submit(text),
                            Prompt::UploadPath => {
                                tui.input_box.end_upload_prompt();
                                Action::UploadPicked(PathBuf::from(text.trim()))
                            }
                        };
                        if dispatch(&mut app, action, &tx) {
                            should_quit = true;
                        }
                    }
                }
            }
        }

        // Handle completions from background request tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut app, action, &tx) {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }
    }

    ratatui::restore();
    Ok(())
}

/// `'1'` selects the first quick reply, and so on.
fn preset_index(c: char, quick_replies: &[String]) -> Option<usize> {
    let idx = (c as usize).checked_sub('1' as usize)?;
    (idx < quick_replies.len()).then_some(idx)
}

/// Run the reducer and start whatever I/O it asked for.
/// Returns true when the app should quit.
fn dispatch(app: &mut App, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    match update(app, action) {
        Effect::Quit => true,
        Effect::SendChat(message) => {
            spawn_chat(app.backend.clone(), message, tx.clone());
            false
        }
        Effect::SendUpload(path) => {
            spawn_upload(app.backend.clone(), path, tx.clone());
            false
        }
        Effect::None => false,
    }
}

/// Fire-and-forget chat request: no abort handle, no timeout. Overlapping
/// sends all run to completion and report back in arrival order.
fn spawn_chat(backend: Arc<dyn AnalystBackend>, message: String, tx: mpsc::Sender<Action>) {
    info!("Spawning chat request ({} bytes)", message.len());
    tokio::spawn(async move {
        let result = backend.chat(&message).await.map(|mut reply| {
            // Resolve the image path into a fetchable, cache-busted URL here
            // so the reducer stays clock-free.
            if let Some(path) = reply.image.take() {
                reply.image = Some(backend.image_url(&path));
            }
            reply
        });
        if tx.send(Action::ChatArrived(result)).is_err() {
            warn!("Chat result dropped: receiver gone");
        }
    });
}

/// Read the file and post it as multipart form data. A read failure surfaces
/// through the same generic upload error as a network failure.
fn spawn_upload(backend: Arc<dyn AnalystBackend>, path: PathBuf, tx: mpsc::Sender<Action>) {
    info!("Spawning upload for {}", path.display());
    tokio::spawn(async move {
        let result = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "upload.csv".to_string());
                backend.upload(&file_name, bytes).await
            }
            Err(e) => Err(ApiError::Io(e.to_string())),
        };
        if tx.send(Action::UploadArrived(result)).is_err() {
            warn!("Upload result dropped: receiver gone");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_index_maps_digits_to_replies() {
        let replies = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(preset_index('1', &replies), Some(0));
        assert_eq!(preset_index('3', &replies), Some(2));
        assert_eq!(preset_index('4', &replies), None);
        assert_eq!(preset_index('0', &replies), None);
    }
}
