//! # InputBox Component
//!
//! Single-line text input. Enter submits, and the buffer is cleared only
//! when something non-blank was actually sent. The same box doubles as the
//! Ctrl+U upload prompt: the chat draft is stashed while the user types a
//! file path and restored afterwards.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// High-level events emitted by the InputBox.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed with a non-blank buffer; carries the raw text.
    Submit(String),
    ContentChanged,
}

/// What the box is currently asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Chat,
    UploadPath,
}

pub struct InputBox {
    pub buffer: String,
    pub prompt: Prompt,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    cursor: usize,
    /// First visible display column for horizontal scrolling.
    scroll_col: u16,
    /// Chat draft parked while the upload prompt is active.
    stashed_chat: Option<(String, usize)>,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            prompt: Prompt::Chat,
            cursor: 0,
            scroll_col: 0,
            stashed_chat: None,
        }
    }

    /// Programmatically fill the buffer (quick replies go through here before
    /// taking the exact same submit path as manual input).
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.len();
    }

    /// Switch to the upload-path prompt, parking the chat draft.
    pub fn begin_upload_prompt(&mut self) {
        if self.prompt == Prompt::UploadPath {
            return;
        }
        self.stashed_chat = Some((std::mem::take(&mut self.buffer), self.cursor));
        self.cursor = 0;
        self.scroll_col = 0;
        self.prompt = Prompt::UploadPath;
    }

    /// Return to the chat prompt, restoring any parked draft.
    pub fn end_upload_prompt(&mut self) {
        if self.prompt != Prompt::UploadPath {
            return;
        }
        let (buffer, cursor) = self.stashed_chat.take().unwrap_or_default();
        self.buffer = buffer;
        self.cursor = cursor.min(self.buffer.len());
        self.scroll_col = 0;
        self.prompt = Prompt::Chat;
    }

    fn title(&self) -> &'static str {
        match self.prompt {
            Prompt::Chat => "Ask about your data",
            Prompt::UploadPath => "CSV path (Enter to upload · Esc to cancel)",
        }
    }

    fn style(&self) -> Style {
        match self.prompt {
            Prompt::Chat => Style::default().fg(Color::Cyan),
            Prompt::UploadPath => Style::default().fg(Color::Yellow),
        }
    }

    fn prev_boundary(&self, from: usize) -> usize {
        let mut i = from;
        while i > 0 {
            i -= 1;
            if self.buffer.is_char_boundary(i) {
                break;
            }
        }
        i
    }

    fn next_boundary(&self, from: usize) -> usize {
        let mut i = from + 1;
        while i < self.buffer.len() && !self.buffer.is_char_boundary(i) {
            i += 1;
        }
        i.min(self.buffer.len())
    }

    /// Display column of the cursor within the full (unscrolled) buffer.
    fn cursor_col(&self) -> u16 {
        self.buffer[..self.cursor].width() as u16
    }

    /// Keep the cursor inside the visible window of `inner_width` columns.
    fn follow_cursor(&mut self, inner_width: u16) {
        if inner_width == 0 {
            return;
        }
        let col = self.cursor_col();
        if col < self.scroll_col {
            self.scroll_col = col;
        } else if col >= self.scroll_col + inner_width {
            self.scroll_col = col - inner_width + 1;
        }
    }

    /// The slice of the buffer starting at `scroll_col` display columns.
    fn visible_text(&self) -> &str {
        let mut skipped: u16 = 0;
        for (i, ch) in self.buffer.char_indices() {
            if skipped >= self.scroll_col {
                return &self.buffer[i..];
            }
            skipped += unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0) as u16;
        }
        ""
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(2);
        self.follow_cursor(inner_width);

        let block = Block::bordered()
            .border_type(ratatui::widgets::BorderType::Rounded)
            .title(self.title());

        let paragraph = Paragraph::new(self.visible_text())
            .block(block)
            .style(self.style());
        frame.render_widget(paragraph, area);

        let cursor_x =
            area.x + 1 + self.cursor_col().saturating_sub(self.scroll_col).min(inner_width);
        frame.set_cursor_position((cursor_x, area.y + 1));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single-line input: pasted newlines become spaces.
                let flat = text.replace(['\r', '\n'], " ");
                self.buffer.insert_str(self.cursor, &flat);
                self.cursor += flat.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.cursor > 0 {
                    let prev = self.prev_boundary(self.cursor);
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor < self.buffer.len() {
                    let next = self.next_boundary(self.cursor);
                    self.buffer.drain(self.cursor..next);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                if self.cursor > 0 {
                    self.cursor = self.prev_boundary(self.cursor);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorRight => {
                if self.cursor < self.buffer.len() {
                    self.cursor = self.next_boundary(self.cursor);
                    Some(InputEvent::ContentChanged)
                } else {
                    None
                }
            }
            TuiEvent::CursorHome => {
                (self.cursor != 0).then(|| {
                    self.cursor = 0;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorEnd => {
                (self.cursor != self.buffer.len()).then(|| {
                    self.cursor = self.buffer.len();
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::Submit => {
                // Blank input is a no-op and the buffer is left as-is.
                if self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                self.scroll_col = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn typing_and_backspace() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::InputChar('h'));
        input.handle_event(&TuiEvent::InputChar('i'));
        assert_eq!(input.buffer, "hi");
        input.handle_event(&TuiEvent::Backspace);
        assert_eq!(input.buffer, "h");
    }

    #[test]
    fn backspace_on_empty_is_none() {
        let mut input = InputBox::new();
        assert_eq!(input.handle_event(&TuiEvent::Backspace), None);
    }

    #[test]
    fn submit_takes_buffer_and_clears() {
        let mut input = InputBox::new();
        input.set_text("hello");
        match input.handle_event(&TuiEvent::Submit) {
            Some(InputEvent::Submit(text)) => assert_eq!(text, "hello"),
            other => panic!("expected Submit, got {other:?}"),
        }
        assert!(input.buffer.is_empty());
    }

    #[test]
    fn blank_submit_is_no_op_and_keeps_buffer() {
        let mut input = InputBox::new();
        input.set_text("   ");
        assert_eq!(input.handle_event(&TuiEvent::Submit), None);
        assert_eq!(input.buffer, "   ");
    }

    #[test]
    fn cursor_moves_respect_multibyte_boundaries() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::InputChar('é'));
        input.handle_event(&TuiEvent::InputChar('x'));
        input.handle_event(&TuiEvent::CursorLeft);
        input.handle_event(&TuiEvent::CursorLeft);
        assert_eq!(input.cursor, 0);
        input.handle_event(&TuiEvent::Delete);
        assert_eq!(input.buffer, "x");
    }

    #[test]
    fn paste_flattens_newlines() {
        let mut input = InputBox::new();
        input.handle_event(&TuiEvent::Paste("a\nb\r\nc".to_string()));
        assert_eq!(input.buffer, "a b  c");
    }

    #[test]
    fn upload_prompt_stashes_and_restores_chat_draft() {
        let mut input = InputBox::new();
        input.set_text("half-typed question");
        input.begin_upload_prompt();
        assert_eq!(input.prompt, Prompt::UploadPath);
        assert!(input.buffer.is_empty());

        input.handle_event(&TuiEvent::InputChar('x'));
        input.end_upload_prompt();
        assert_eq!(input.prompt, Prompt::Chat);
        assert_eq!(input.buffer, "half-typed question");
    }

    #[test]
    fn render_shows_prompt_title() {
        let backend = TestBackend::new(50, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut input = InputBox::new();

        terminal.draw(|f| input.render(f, f.area())).unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Ask about your data"));
    }
}
