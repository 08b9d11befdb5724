use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::core::transcript::{Entry, Role};
use crate::tui::component::Component;
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Fade progress below which the entry renders as a dark ghost.
const FADE_GHOST_THRESHOLD: f32 = 0.35;
/// Fade progress below which the entry renders dimmed in its own color.
const FADE_DIM_THRESHOLD: f32 = 0.7;

/// Renders a single transcript entry.
///
/// `Message` is a transient component: it is created fresh each frame with
/// the entry it needs to render plus its fade progress (0.0 = just appended,
/// 1.0 = fully revealed — the TUI's stand-in for the opacity ramp). User text
/// is inserted verbatim; Bot and System bodies go through the markdown
/// renderer, which never emits raw markup.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub entry: &'a Entry,
    /// Reveal progress in `0.0..=1.0`.
    pub fade: f32,
}

impl<'a> Message<'a> {
    pub fn new(entry: &'a Entry, fade: f32) -> Self {
        Self { entry, fade }
    }

    fn role_label(role: Role) -> &'static str {
        match role {
            Role::User => "you",
            Role::Bot => "analyst",
            Role::System => "status",
        }
    }

    fn role_style(role: Role) -> Style {
        match role {
            Role::User => Style::default().fg(Color::Cyan),
            Role::Bot => Style::default().fg(Color::Green),
            Role::System => Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        }
    }

    /// The styled body: markdown for Bot/System, plain text for User, plus an
    /// image reference line when the backend attached a plot.
    pub fn build_text(entry: &Entry) -> Text<'static> {
        let style = Self::role_style(entry.role);
        let mut text = match entry.role {
            Role::User => Text::styled(entry.body.trim().to_owned(), style),
            Role::Bot | Role::System => {
                markdown::render(entry.body.trim(), style.fg.unwrap_or(Color::Reset))
            }
        };

        if let Some(url) = &entry.image {
            if !text.lines.is_empty() {
                text.lines.push(Line::default());
            }
            text.lines.push(Line::from(vec![
                Span::styled("image: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    url.clone(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED),
                ),
            ]));
        }

        text
    }

    /// Predict the rendered height for a given width without drawing.
    ///
    /// Uses `Paragraph::line_count` on the same text and wrap settings as the
    /// render path, so the parent view can lay out scroll positions exactly.
    pub fn calculate_height(entry: &Entry, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Terminal narrower than borders + padding; still occupy a row.
            return 1;
        }

        if entry.body.trim().is_empty() && entry.image.is_none() {
            return VERTICAL_OVERHEAD;
        }

        let text = Self::build_text(entry);
        if text.lines.is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let lines = Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .line_count(content_width);
        (lines as u16).max(1) + VERTICAL_OVERHEAD
    }

    /// Apply the reveal ramp to a style: dark ghost → dimmed → full color.
    fn faded(&self, style: Style) -> Style {
        if self.fade < FADE_GHOST_THRESHOLD {
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM)
        } else if self.fade < FADE_DIM_THRESHOLD {
            style.add_modifier(Modifier::DIM)
        } else {
            style
        }
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let role_style = Self::role_style(self.entry.role);
        let border_style = self.faded(role_style.add_modifier(Modifier::DIM));

        let block = Block::bordered()
            .title(Self::role_label(self.entry.role))
            .border_type(ratatui::widgets::BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(area);
        block.render(area, buf);

        let mut text = Self::build_text(self.entry);
        if self.fade < FADE_DIM_THRESHOLD {
            // Mid-fade the whole body inherits the ramp style, markdown
            // styling included: content "materializes" rather than popping in.
            let overlay = self.faded(role_style);
            for line in &mut text.lines {
                for span in &mut line.spans {
                    span.style = span.style.patch(overlay);
                }
            }
        }

        Paragraph::new(text)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
