//! Terminal rendering of the conversation.
//!
//! Lines are wrapped here rather than by `Paragraph`, so the number of rows
//! the transcript occupies is known exactly when computing scroll bounds.

use std::collections::VecDeque;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use unicode_width::UnicodeWidthChar;

use crate::core::format::{unescape_html, Segment};
use crate::core::message::{ImageRef, Message, Sender};

pub const PENDING_INDICATOR: &str = "...";
const CODE_GUTTER: &str = "│ ";

fn user_header_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn assistant_header_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

fn code_style() -> Style {
    Style::default().fg(Color::Yellow)
}

fn code_frame_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn image_style() -> Style {
    Style::default()
        .fg(Color::Magenta)
        .add_modifier(Modifier::ITALIC)
}

fn error_style() -> Style {
    Style::default().fg(Color::Red)
}

/// Build the wrapped transcript for a viewport `width` columns wide.
pub fn build_lines(
    messages: &VecDeque<Message>,
    pending: bool,
    width: u16,
) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();

    for message in messages {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        push_message(&mut lines, message, width);
    }

    if pending {
        if !lines.is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::styled("Assistant", assistant_header_style()));
        lines.push(Line::styled(
            PENDING_INDICATOR,
            Style::default().fg(Color::DarkGray),
        ));
    }

    lines
}

fn push_message(lines: &mut Vec<Line<'static>>, message: &Message, width: usize) {
    match message.sender {
        Sender::User => {
            lines.push(Line::styled("You", user_header_style()));
            if !message.content.is_empty() {
                push_wrapped(lines, &message.content, Style::default(), width);
            }
        }
        Sender::Assistant => {
            lines.push(Line::styled("Assistant", assistant_header_style()));
            let text_style = if message.content.starts_with("Error: ") {
                error_style()
            } else {
                Style::default()
            };
            if let Some(formatted) = message.formatted() {
                let mut block_number = 0;
                for segment in &formatted.segments {
                    match segment {
                        Segment::Text(text) => {
                            let text = unescape_html(text);
                            let text = text.trim_matches('\n');
                            if !text.is_empty() {
                                push_wrapped(lines, text, text_style, width);
                            }
                        }
                        Segment::Code(block) => {
                            block_number += 1;
                            lines.push(Line::styled(
                                format!("┌─ {} [#{block_number}]", block.language),
                                code_frame_style(),
                            ));
                            let code_width = width.saturating_sub(2).max(1);
                            let rows = block
                                .code
                                .split('\n')
                                .flat_map(|line| wrap_text(line, code_width));
                            for row in rows {
                                lines.push(Line::styled(
                                    format!("{CODE_GUTTER}{row}"),
                                    code_style(),
                                ));
                            }
                            lines.push(Line::styled("└─", code_frame_style()));
                        }
                    }
                }
            }
        }
    }

    match &message.image {
        Some(ImageRef::Uploaded { file_name, .. }) => {
            push_wrapped(lines, &format!("[image: {file_name}]"), image_style(), width);
        }
        Some(ImageRef::Generated { url }) => {
            push_wrapped(
                lines,
                &format!("[generated image: {url}]"),
                image_style(),
                width,
            );
        }
        None => {}
    }
}

fn push_wrapped(lines: &mut Vec<Line<'static>>, text: &str, style: Style, width: usize) {
    for logical in text.split('\n') {
        for row in wrap_text(logical, width) {
            lines.push(Line::styled(row, style));
        }
    }
}

/// Greedy word wrap by display width. Words longer than `width` are split.
/// Always yields at least one row, so blank lines are kept.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut row_width = 0;

    for word in split_keeping_spaces(text) {
        let word_width: usize = word.chars().map(char_width).sum();
        if row_width + word_width <= width {
            row.push_str(word);
            row_width += word_width;
            continue;
        }
        if word.trim().is_empty() {
            // Break at the space and drop it.
            rows.push(std::mem::take(&mut row));
            row_width = 0;
            continue;
        }
        if row_width > 0 && word_width <= width {
            rows.push(std::mem::take(&mut row));
            row.push_str(word);
            row_width = word_width;
            continue;
        }
        for ch in word.chars() {
            let w = char_width(ch);
            if row_width + w > width && row_width > 0 {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            row.push(ch);
            row_width += w;
        }
    }

    if !row.is_empty() || rows.is_empty() {
        rows.push(row);
    }
    rows
}

fn char_width(ch: char) -> usize {
    if ch == '\t' {
        4
    } else {
        ch.width().unwrap_or(0)
    }
}

/// Split into alternating runs of spaces and non-spaces.
fn split_keeping_spaces(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let is_space = first == ' ';
        let end = rest
            .char_indices()
            .find(|(_, ch)| (*ch == ' ') != is_space)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some(run)
    })
}
