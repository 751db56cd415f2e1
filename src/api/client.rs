//! HTTP transport for the chat and image-generation endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use tracing::debug;

use super::{
    ChatResponse, Endpoint, ErrorResponse, ImageGenerationRequest, ImageGenerationResponse,
};

pub const CHAT_FALLBACK_ERROR: &str = "Network response was not ok";
pub const IMAGE_FALLBACK_ERROR: &str = "Failed to generate image";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The request never produced a response (connection refused, timeout, ...).
    #[error("{0}")]
    Transport(String),

    /// A success status with a body that lacks the expected field.
    #[error("Malformed response from server")]
    Malformed,

    #[error("Could not read image file: {0}")]
    Attachment(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Transport("Request timed out".to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Binary image part of a chat submission.
#[derive(Debug, Clone)]
pub struct ChatUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// The two outbound request flows. Implemented over HTTP in production and by
/// canned responders in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn chat(&self, prompt: &str, image: Option<ChatUpload>) -> Result<String, ApiError>;

    async fn generate_image(&self, prompt: &str) -> Result<String, ApiError>;
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.to_string(),
        })
    }
}

async fn failure_from_response(response: Response, fallback: &str) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .ok()
        .and_then(|parsed| parsed.message().map(str::to_owned))
        .unwrap_or_else(|| fallback.to_string());
    debug!(status, %message, "request failed");
    ApiError::Status { status, message }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn chat(&self, prompt: &str, image: Option<ChatUpload>) -> Result<String, ApiError> {
        let url = Endpoint::Chat.url(&self.base_url);
        let mut form = Form::new().text("prompt", prompt.to_string());
        let has_image = image.is_some();
        if let Some(upload) = image {
            let part = Part::bytes(upload.bytes)
                .file_name(upload.file_name)
                .mime_str(&upload.mime_type)?;
            form = form.part("image", part);
        }

        debug!(%url, prompt_len = prompt.len(), has_image, "sending chat request");
        let response = self.client.post(url).multipart(form).send().await?;
        if !response.status().is_success() {
            return Err(failure_from_response(response, CHAT_FALLBACK_ERROR).await);
        }

        let body = response.text().await?;
        serde_json::from_str::<ChatResponse>(&body)
            .ok()
            .and_then(|parsed| parsed.response)
            .ok_or(ApiError::Malformed)
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, ApiError> {
        let url = Endpoint::GenerateImage.url(&self.base_url);
        let request = ImageGenerationRequest {
            prompt: prompt.to_string(),
        };

        debug!(%url, prompt_len = prompt.len(), "sending image generation request");
        let response = self.client.post(url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(failure_from_response(response, IMAGE_FALLBACK_ERROR).await);
        }

        let body = response.text().await?;
        serde_json::from_str::<ImageGenerationResponse>(&body)
            .ok()
            .and_then(|parsed| parsed.image_url)
            .ok_or(ApiError::Malformed)
    }
}
