//! # Welcome Panel
//!
//! Shown exactly until the first send, then never again (Ctrl+L brings it
//! back by resetting the whole session). Lists the quick replies the user
//! can fire with a single keypress.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub struct WelcomePanel<'a> {
    pub quick_replies: &'a [String],
}

impl<'a> WelcomePanel<'a> {
    pub fn new(quick_replies: &'a [String]) -> Self {
        Self { quick_replies }
    }
}

impl<'a> Component for WelcomePanel<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();

        lines.push(Line::from(Span::styled(
            "Autonomous Data Analyst",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            "Upload a CSV and ask complex questions. The analyst writes its own code to answer.",
            Style::default().fg(Color::Gray),
        )));
        lines.push(Line::default());

        for (i, reply) in self.quick_replies.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("[{}] ", i + 1),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(reply.clone()),
            ]));
        }

        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Ctrl+U upload CSV · Enter send · Ctrl+L clear · Ctrl+C quit",
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(Span::styled(
            format!("dana v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        )));

        let height = lines.len() as u16;
        let [centered] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);

        let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
        frame.render_widget(paragraph, centered);
    }
}
