use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which backend a submission targets and which input affordances are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    #[default]
    Chat,
    #[serde(rename = "image", alias = "image-generation")]
    ImageGeneration,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Chat => "chat",
            Mode::ImageGeneration => "image",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Chat => "Chat",
            Mode::ImageGeneration => "Image generation",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Mode::Chat => "Ask with text and/or image...",
            Mode::ImageGeneration => "Describe the image you want to generate...",
        }
    }

    /// Image attachments are only offered while chatting.
    pub fn accepts_image(self) -> bool {
        matches!(self, Mode::Chat)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "chat" => Ok(Mode::Chat),
            "image" | "image-generation" | "imagine" => Ok(Mode::ImageGeneration),
            other => Err(format!("unknown mode: {other} (expected 'chat' or 'image')")),
        }
    }
}
