//! Executes submissions against a [`Transport`] on background tasks and feeds
//! the outcome back to the controller as an [`AppAction`].

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{ApiError, ChatUpload, Transport};
use crate::core::app::{AppAction, AppActionDispatcher, StagedImage};

#[derive(Debug, Clone)]
pub enum SubmissionKind {
    Chat {
        prompt: String,
        image: Option<StagedImage>,
    },
    GenerateImage {
        prompt: String,
    },
}

#[derive(Debug)]
pub struct SubmissionRequest {
    pub request_id: u64,
    pub kind: SubmissionKind,
    pub cancel_token: CancellationToken,
}

async fn read_upload(image: &StagedImage) -> Result<ChatUpload, ApiError> {
    let bytes = tokio::fs::read(&image.path)
        .await
        .map_err(|e| ApiError::Attachment(e.to_string()))?;
    Ok(ChatUpload {
        file_name: image.file_name.clone(),
        mime_type: image.mime_type().to_string(),
        bytes,
    })
}

async fn run(
    transport: &dyn Transport,
    request_id: u64,
    kind: SubmissionKind,
) -> Result<AppAction, ApiError> {
    match kind {
        SubmissionKind::Chat { prompt, image } => {
            let upload = match image {
                Some(image) => Some(read_upload(&image).await?),
                None => None,
            };
            let response = transport.chat(&prompt, upload).await?;
            Ok(AppAction::ChatCompleted {
                request_id,
                response,
            })
        }
        SubmissionKind::GenerateImage { prompt } => {
            let image_url = transport.generate_image(&prompt).await?;
            Ok(AppAction::ImageGenerated {
                request_id,
                image_url,
            })
        }
    }
}

/// Run one submission to completion. Returns `None` when it was cancelled.
pub async fn execute(transport: &dyn Transport, request: SubmissionRequest) -> Option<AppAction> {
    let SubmissionRequest {
        request_id,
        kind,
        cancel_token,
    } = request;

    let outcome = tokio::select! {
        outcome = run(transport, request_id, kind) => outcome,
        _ = cancel_token.cancelled() => {
            debug!(request_id, "submission cancelled before completion");
            return None;
        }
    };

    Some(outcome.unwrap_or_else(|err| {
        warn!(request_id, error = %err, "submission failed");
        AppAction::RequestFailed {
            request_id,
            message: err.to_string(),
        }
    }))
}

#[derive(Clone)]
pub struct SubmissionService {
    transport: Arc<dyn Transport>,
    dispatcher: AppActionDispatcher,
}

impl SubmissionService {
    pub fn new(transport: Arc<dyn Transport>, dispatcher: AppActionDispatcher) -> Self {
        Self {
            transport,
            dispatcher,
        }
    }

    pub fn spawn(&self, request: SubmissionRequest) -> tokio::task::JoinHandle<()> {
        let transport = Arc::clone(&self.transport);
        let dispatcher = self.dispatcher.clone();
        tokio::spawn(async move {
            if let Some(action) = execute(transport.as_ref(), request).await {
                dispatcher.dispatch(action);
            }
        })
    }
}
