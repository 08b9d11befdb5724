use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{StatusBar, TranscriptView, UploadPanel, WelcomePanel};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const INPUT_HEIGHT: u16 = 3;

/// Lay out and draw one frame.
///
/// Rows from top to bottom: status bar, upload panel (only once a file was
/// picked), the main area (welcome panel until the first send, transcript
/// after), the typing indicator (only while a chat request is in flight),
/// and the input box.
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let mut constraints = vec![Length(1)];
    if app.upload_status.is_some() {
        constraints.push(Length(1));
    }
    constraints.push(Min(0));
    if app.is_typing {
        constraints.push(Length(1));
    }
    constraints.push(Length(INPUT_HEIGHT));

    let areas = Layout::vertical(constraints).split(frame.area());
    let mut next = areas.iter().copied();

    let title_area = next.next().expect("status bar area");
    StatusBar {
        server_url: tui.server_url.as_str(),
        status_message: app.status_message.as_str(),
    }
    .render(frame, title_area);

    if let Some(upload) = &app.upload_status {
        let upload_area = next.next().expect("upload panel area");
        UploadPanel {
            file_name: upload.file_name.as_str(),
        }
        .render(frame, upload_area);
    }

    let main_area = next.next().expect("main area");
    if app.show_welcome() {
        WelcomePanel::new(&tui.quick_replies).render(frame, main_area);
    } else {
        TranscriptView::new(&mut tui.transcript, &app.transcript).render(frame, main_area);
    }

    if app.is_typing {
        let typing_area = next.next().expect("typing indicator area");
        let spinner = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];
        let line = Line::from(Span::styled(
            format!(" {spinner} analyst is typing"),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
        frame.render_widget(Paragraph::new(line), typing_area);
    }

    let input_area = next.next().expect("input area");
    tui.input_box.render(frame, input_area);
}
