pub mod client;

pub use client::{ApiError, ChatUpload, HttpTransport, Transport};

use serde::{Deserialize, Serialize};

/// Routes served by the assistant service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Chat,
    GenerateImage,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Chat => "chat",
            Endpoint::GenerateImage => "generate-image",
        }
    }

    /// Full URL of this route under `base_url`. Trailing slashes on the base
    /// are ignored, so `http://host:5000/` and `http://host:5000` agree.
    ///
    /// ```
    /// use vistachat::api::Endpoint;
    ///
    /// assert_eq!(
    ///     Endpoint::Chat.url("http://127.0.0.1:5000/"),
    ///     "http://127.0.0.1:5000/chat"
    /// );
    /// ```
    pub fn url(self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.path())
    }
}

#[derive(Serialize)]
pub struct ImageGenerationRequest {
    pub prompt: String,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    pub response: Option<String>,
}

#[derive(Deserialize)]
pub struct ImageGenerationResponse {
    pub image_url: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct ErrorResponse {
    pub error: Option<String>,
}

impl ErrorResponse {
    /// The server-supplied message, if the body carried a non-empty one.
    /// Whitespace-only messages are kept as sent.
    pub fn message(&self) -> Option<&str> {
        self.error.as_deref().filter(|message| !message.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_urls_ignore_trailing_slashes() {
        for base in ["http://localhost:5000", "http://localhost:5000///"] {
            assert_eq!(Endpoint::Chat.url(base), "http://localhost:5000/chat");
            assert_eq!(
                Endpoint::GenerateImage.url(base),
                "http://localhost:5000/generate-image"
            );
        }
        assert_eq!(
            Endpoint::Chat.url("https://chat.example.com/api/"),
            "https://chat.example.com/api/chat"
        );
    }

    #[test]
    fn error_message_keeps_whitespace_only_text() {
        let parse = |body: &str| serde_json::from_str::<ErrorResponse>(body).expect("error body");
        assert_eq!(parse(r#"{"error":"rate limited"}"#).message(), Some("rate limited"));
        assert_eq!(parse(r#"{"error":"  "}"#).message(), Some("  "));
        assert_eq!(parse(r#"{"error":""}"#).message(), None);
        assert_eq!(parse(r#"{}"#).message(), None);
    }
}
