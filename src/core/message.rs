use std::path::PathBuf;

use crate::core::format::{format_response, FormattedResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// An image the user attached to a chat submission.
    Uploaded { file_name: String, path: PathBuf },
    /// An image returned by the generation endpoint.
    Generated { url: String },
}

impl ImageRef {
    /// Value suitable for an `src` attribute or a terminal caption.
    pub fn source(&self) -> String {
        match self {
            ImageRef::Uploaded { path, .. } => path.display().to_string(),
            ImageRef::Generated { url } => url.clone(),
        }
    }
}

/// One entry in the conversation view. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub sender: Sender,
    pub content: String,
    pub image: Option<ImageRef>,
}

impl Message {
    pub fn user(content: impl Into<String>, image: Option<ImageRef>) -> Self {
        Self {
            sender: Sender::User,
            content: content.into(),
            image,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            content: content.into(),
            image: None,
        }
    }

    pub fn assistant_error(message: impl AsRef<str>) -> Self {
        Self::assistant(format!("Error: {}", message.as_ref()))
    }

    pub fn generated_image(url: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            content: String::new(),
            image: Some(ImageRef::Generated { url: url.into() }),
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_assistant(&self) -> bool {
        self.sender == Sender::Assistant
    }

    /// Assistant text goes through the response formatter; user text never
    /// contains structured blocks.
    pub fn formatted(&self) -> Option<FormattedResponse> {
        (self.is_assistant() && !self.content.is_empty()).then(|| format_response(&self.content))
    }
}
