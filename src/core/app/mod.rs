//! The chat controller: mode, input, conversation view-model and the single
//! pending request. Everything here is driven through [`AppAction`]s.

use std::collections::VecDeque;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::core::format::CodeBlock;
use crate::core::message::{ImageRef, Message};
use crate::core::mode::Mode;
use crate::ui::html::render_transcript_document;
use crate::utils::logging::LoggingState;

pub mod actions;
pub mod input;

pub use actions::{
    apply_action, apply_actions, AppAction, AppActionDispatcher, AppActionEnvelope, AppCommand,
};
pub use input::{InputState, StageImageError, StagedImage, ALLOWED_IMAGE_EXTENSIONS};

/// Configuration parameters for initializing an App
pub struct AppInitConfig {
    pub mode: Mode,
    pub base_url: String,
    pub log_file: Option<String>,
}

/// The request currently awaiting a response. At most one exists.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub id: u64,
    pub mode: Mode,
    pub cancel_token: CancellationToken,
}

#[derive(Debug, Clone, Copy)]
pub struct ScrollState {
    pub offset: u16,
    /// Largest valid offset as of the last draw.
    pub max_offset: u16,
    pub auto_scroll: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            max_offset: 0,
            auto_scroll: true,
        }
    }
}

pub struct App {
    pub mode: Mode,
    pub messages: VecDeque<Message>,
    pub input: InputState,
    pub pending: Option<PendingRequest>,
    pub status: Option<String>,
    pub help_visible: bool,
    pub scroll: ScrollState,
    pub logging: LoggingState,
    pub base_url: String,
    pub exit_requested: bool,
    next_request_id: u64,
}

impl App {
    pub fn new(config: AppInitConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let logging = LoggingState::new(config.log_file)?;
        Ok(Self {
            mode: config.mode,
            messages: VecDeque::new(),
            input: InputState::new(config.mode),
            pending: None,
            status: None,
            help_visible: false,
            scroll: ScrollState::default(),
            logging,
            base_url: config.base_url,
            exit_requested: false,
            next_request_id: 1,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Append a message to the view and the transcript log.
    pub fn push_message(&mut self, message: Message) {
        if let Err(e) = self.logging.log_message(&transcript_line(&message)) {
            warn!(error = %e, "failed to write transcript log");
            self.set_status(format!("Log error: {e}"));
        }
        self.messages.push_back(message);
        if self.scroll.auto_scroll {
            self.scroll.offset = u16::MAX;
        }
    }

    /// Register a new pending request and return it.
    pub(crate) fn begin_request(&mut self) -> PendingRequest {
        let request = PendingRequest {
            id: self.next_request_id,
            mode: self.mode,
            cancel_token: CancellationToken::new(),
        };
        self.next_request_id += 1;
        self.pending = Some(request.clone());
        self.scroll.auto_scroll = true;
        self.scroll.offset = u16::MAX;
        request
    }

    /// Clear the pending request if `request_id` is the one in flight.
    pub(crate) fn finish_request(&mut self, request_id: u64) -> bool {
        match &self.pending {
            Some(pending) if pending.id == request_id => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Code blocks of the most recent assistant reply that has any.
    pub fn latest_code_blocks(&self) -> Vec<CodeBlock> {
        self.messages
            .iter()
            .rev()
            .filter_map(Message::formatted)
            .map(|formatted| formatted.code_blocks().cloned().collect::<Vec<_>>())
            .find(|blocks| !blocks.is_empty())
            .unwrap_or_default()
    }

    pub fn transcript_html(&self) -> String {
        render_transcript_document(&self.messages, self.is_pending())
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll.auto_scroll = false;
        self.scroll.offset = self
            .scroll
            .offset
            .min(self.scroll.max_offset)
            .saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let offset = self
            .scroll
            .offset
            .min(self.scroll.max_offset)
            .saturating_add(lines);
        if offset >= self.scroll.max_offset {
            self.scroll_to_bottom();
        } else {
            self.scroll.offset = offset;
        }
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll.auto_scroll = true;
        self.scroll.offset = self.scroll.max_offset;
    }
}

fn transcript_line(message: &Message) -> String {
    let mut line = if message.is_user() {
        format!("You: {}", message.content)
    } else {
        message.content.clone()
    };
    match &message.image {
        Some(ImageRef::Uploaded { file_name, .. }) => {
            line.push_str(&format!("\n[image: {file_name}]"));
        }
        Some(ImageRef::Generated { url }) => {
            if !line.is_empty() {
                line.push('\n');
            }
            line.push_str(&format!("[generated image: {url}]"));
        }
        None => {}
    }
    line
}
