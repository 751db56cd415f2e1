use crate::commands::help_text;
use crate::core::app::App;
use crate::core::mode::Mode;
use crate::ui::transcript;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const MAX_INPUT_LINES: u16 = 8;

pub fn ui(f: &mut Frame, app: &mut App) {
    let input_height = (app.input.line_count() as u16).clamp(1, MAX_INPUT_LINES);
    let attachment_height = if app.mode.accepts_image() { 1 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(attachment_height),
            Constraint::Length(input_height + 2), // +2 for borders
            Constraint::Length(1),
        ])
        .split(f.area());

    render_title(f, app, chunks[0]);
    render_transcript(f, app, chunks[1]);
    if attachment_height > 0 {
        render_attachment(f, app, chunks[2]);
    }
    render_input(f, app, chunks[3]);
    render_status(f, app, chunks[4]);

    if app.help_visible {
        render_help(f, f.area());
    }
}

fn render_title(f: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        "VistaChat v{} - {} • {} • Logging: {}",
        env!("CARGO_PKG_VERSION"),
        app.mode.label(),
        app.base_url,
        app.logging.get_status_string()
    );
    let paragraph = Paragraph::new(title).style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(paragraph, area);
}

fn render_transcript(f: &mut Frame, app: &mut App, area: Rect) {
    let lines = transcript::build_lines(&app.messages, app.is_pending(), area.width);

    // Clamp the stored offset against what fits now; u16::MAX means "bottom"
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let max_offset = total.saturating_sub(area.height);
    app.scroll.max_offset = max_offset;
    if app.scroll.auto_scroll {
        app.scroll.offset = max_offset;
    } else {
        app.scroll.offset = app.scroll.offset.min(max_offset);
    }

    let paragraph = Paragraph::new(lines).scroll((app.scroll.offset, 0));
    f.render_widget(paragraph, area);
}

fn render_attachment(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.input.staged_image {
        Some(image) => Line::from(vec![
            Span::styled("Image: ", Style::default().fg(Color::Magenta)),
            Span::raw(image.file_name.clone()),
            Span::styled(" (/unimage to remove)", Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::styled(
            "No image attached (/image <path> to attach)",
            Style::default().fg(Color::DarkGray),
        ),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_input(f: &mut Frame, app: &mut App, area: Rect) {
    let title = match (app.mode, app.is_pending()) {
        (_, true) => "Waiting for response (Esc to cancel, Ctrl+C to quit)",
        (Mode::Chat, false) => {
            "Chat (Enter to send, Alt+Enter for new line, F3 image mode, /help for help)"
        }
        (Mode::ImageGeneration, false) => {
            "Image generation (Enter to generate, F2 chat mode, /help for help)"
        }
    };
    let border = if app.is_pending() {
        Color::DarkGray
    } else {
        Color::Cyan
    };

    app.input.textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title),
    );
    f.render_widget(&app.input.textarea, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    if let Some(status) = &app.status {
        let paragraph =
            Paragraph::new(status.as_str()).style(Style::default().fg(Color::Yellow));
        f.render_widget(paragraph, area);
    }
}

fn render_help(f: &mut Frame, area: Rect) {
    let text = help_text();
    let height = (text.lines().count() as u16 + 2).min(area.height.saturating_sub(2));
    let width = 76.min(area.width.saturating_sub(4));
    let popup = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );

    f.render_widget(Clear, popup);
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (Esc to close) "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::{apply_action, AppAction};
    use crate::core::message::Message;
    use crate::utils::test_utils::create_test_app;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
        terminal.draw(|f| ui(f, app)).expect("draw");
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn image_affordance_only_in_chat_mode() {
        let mut app = create_test_app();
        assert!(screen(&mut app, 100, 20).contains("No image attached"));

        apply_action(
            &mut app,
            AppAction::SwitchMode {
                mode: Mode::ImageGeneration,
            },
        );
        let text = screen(&mut app, 100, 20);
        assert!(!text.contains("image attached"));
        assert!(text.contains("Image generation"));
    }

    #[test]
    fn auto_scroll_pins_to_last_line() {
        let mut app = create_test_app();
        for n in 0..30 {
            app.push_message(Message::assistant(format!("reply {n}")));
        }
        let text = screen(&mut app, 60, 20);
        assert!(text.contains("reply 29"));
        assert!(!text.contains("reply 0 "));
        assert_eq!(app.scroll.offset, app.scroll.max_offset);
        assert!(app.scroll.max_offset > 0);
    }

    #[test]
    fn help_overlay_lists_commands() {
        let mut app = create_test_app();
        apply_action(&mut app, AppAction::ShowHelp);
        let text = screen(&mut app, 100, 30);
        assert!(text.contains("Help (Esc to close)"));
        assert!(text.contains("/export [file]"));
    }
}
