//! # StatusBar and UploadPanel
//!
//! Two stateless single-line components. The status bar always shows which
//! server the client talks to plus the current status text. The upload panel
//! appears once a file has been picked and then never leaves (only a reset
//! clears it).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub struct StatusBar<'a> {
    pub server_url: &'a str,
    pub status_message: &'a str,
}

impl<'a> Component for StatusBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled("dana", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!(" · {}", self.server_url),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw(" · "),
            Span::styled(self.status_message, Style::default().fg(Color::Gray)),
        ]);
        frame.render_widget(line, area);
    }
}

/// The upload status panel: filename of the selected file.
pub struct UploadPanel<'a> {
    pub file_name: &'a str,
}

impl<'a> Component for UploadPanel<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled("data: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                self.file_name,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(line, area);
    }
}
