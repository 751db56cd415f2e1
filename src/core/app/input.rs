use std::path::{Path, PathBuf};

use ratatui::style::{Color, Style};
use tui_textarea::TextArea;

use crate::core::mode::Mode;

/// Extensions accepted for chat attachments.
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// An image selected for the next chat submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
    pub path: PathBuf,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageImageError {
    #[error("Invalid file type")]
    InvalidType,
    #[error("Image not found: {}", .0.display())]
    NotFound(PathBuf),
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
}

impl StagedImage {
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, StageImageError> {
        let path = path.into();
        let allowed = extension_of(&path)
            .is_some_and(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()));
        if !allowed {
            return Err(StageImageError::InvalidType);
        }
        if !path.is_file() {
            return Err(StageImageError::NotFound(path));
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { path, file_name })
    }

    pub fn mime_type(&self) -> &'static str {
        match extension_of(&self.path).as_deref() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

/// Prompt editor plus the staged attachment.
pub struct InputState {
    pub textarea: TextArea<'static>,
    pub staged_image: Option<StagedImage>,
}

impl InputState {
    pub fn new(mode: Mode) -> Self {
        let mut input = Self {
            textarea: TextArea::default(),
            staged_image: None,
        };
        input.clear(mode);
        input
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.textarea.lines().iter().all(|line| line.is_empty())
    }

    pub fn line_count(&self) -> usize {
        self.textarea.lines().len().max(1)
    }

    pub fn insert_str(&mut self, text: &str) {
        self.textarea.insert_str(text);
    }

    /// Reset the prompt and attachment, re-applying the mode's placeholder.
    pub fn clear(&mut self, mode: Mode) {
        self.clear_text(mode);
        self.staged_image = None;
    }

    /// Reset the prompt only; a staged attachment survives.
    pub fn clear_text(&mut self, mode: Mode) {
        let mut textarea = TextArea::default();
        textarea.set_placeholder_text(mode.placeholder());
        textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));
        textarea.set_cursor_line_style(Style::default());
        self.textarea = textarea;
    }
}
