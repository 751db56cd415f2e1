//! The action table: every user intent and every request outcome is an
//! [`AppAction`] applied by [`apply_action`]. Side effects that leave the
//! process (HTTP, clipboard) come back out as [`AppCommand`]s.

use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::{debug, info};
use tui_textarea::Input;

use super::{App, StagedImage};
use crate::commands::{process_input, CommandResult};
use crate::core::message::{ImageRef, Message};
use crate::core::mode::Mode;
use crate::core::submission::{SubmissionKind, SubmissionRequest};

pub const WAITING_STATUS: &str = "Waiting for the previous response...";

#[derive(Debug, Clone)]
pub enum AppAction {
    SwitchMode { mode: Mode },
    ToggleMode,
    EditInput { input: Input },
    InsertIntoInput { text: String },
    StageImage { path: String },
    ClearImage,
    Submit,
    CancelRequest,
    ChatCompleted { request_id: u64, response: String },
    ImageGenerated { request_id: u64, image_url: String },
    RequestFailed { request_id: u64, message: String },
    CopyCodeBlock { index: Option<usize> },
    ExportTranscript { filename: Option<String> },
    ToggleLogging { filename: Option<String> },
    ScrollUp { lines: u16 },
    ScrollDown { lines: u16 },
    ScrollToBottom,
    ShowHelp,
    HideHelp,
    SetStatus { message: String },
    ClearStatus,
    Quit,
}

pub struct AppActionEnvelope {
    pub action: AppAction,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppActionEnvelope>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppActionEnvelope>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction) {
        let _ = self.tx.send(AppActionEnvelope { action });
    }
}

#[derive(Debug)]
pub enum AppCommand {
    Submit(SubmissionRequest),
    CopyToClipboard { text: String },
}

pub fn apply_actions(
    app: &mut App,
    envelopes: impl IntoIterator<Item = AppActionEnvelope>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for envelope in envelopes {
        if let Some(cmd) = apply_action(app, envelope.action) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::SwitchMode { mode } => {
            switch_mode(app, mode);
            None
        }
        AppAction::ToggleMode => {
            let next = match app.mode {
                Mode::Chat => Mode::ImageGeneration,
                Mode::ImageGeneration => Mode::Chat,
            };
            switch_mode(app, next);
            None
        }
        AppAction::EditInput { input } => {
            app.input.textarea.input(input);
            None
        }
        AppAction::InsertIntoInput { text } => {
            app.input.insert_str(&text);
            None
        }
        AppAction::StageImage { path } => {
            stage_image(app, &path);
            None
        }
        AppAction::ClearImage => {
            if app.input.staged_image.take().is_some() {
                app.set_status("Image removed");
            }
            None
        }
        AppAction::Submit => submit(app),
        AppAction::CancelRequest => {
            if app.help_visible {
                app.help_visible = false;
            } else if let Some(pending) = app.pending.take() {
                pending.cancel_token.cancel();
                info!(request_id = pending.id, "request cancelled");
                app.set_status("Request cancelled");
            }
            None
        }
        AppAction::ChatCompleted {
            request_id,
            response,
        } => {
            if complete_request(app, request_id) {
                app.push_message(Message::assistant(response));
            }
            None
        }
        AppAction::ImageGenerated {
            request_id,
            image_url,
        } => {
            if complete_request(app, request_id) {
                app.push_message(Message::generated_image(image_url));
            }
            None
        }
        AppAction::RequestFailed {
            request_id,
            message,
        } => {
            if complete_request(app, request_id) {
                app.push_message(Message::assistant_error(message));
            }
            None
        }
        AppAction::CopyCodeBlock { index } => copy_code_block(app, index),
        AppAction::ExportTranscript { filename } => {
            export_transcript(app, filename);
            None
        }
        AppAction::ToggleLogging { filename } => {
            toggle_logging(app, filename);
            None
        }
        AppAction::ScrollUp { lines } => {
            app.scroll_up(lines);
            None
        }
        AppAction::ScrollDown { lines } => {
            app.scroll_down(lines);
            None
        }
        AppAction::ScrollToBottom => {
            app.scroll_to_bottom();
            None
        }
        AppAction::ShowHelp => {
            app.help_visible = true;
            None
        }
        AppAction::HideHelp => {
            app.help_visible = false;
            None
        }
        AppAction::SetStatus { message } => {
            app.set_status(message);
            None
        }
        AppAction::ClearStatus => {
            app.clear_status();
            None
        }
        AppAction::Quit => {
            if let Some(pending) = app.pending.take() {
                pending.cancel_token.cancel();
            }
            app.exit_requested = true;
            None
        }
    }
}

fn switch_mode(app: &mut App, mode: Mode) {
    app.mode = mode;
    app.input.clear(mode);
    app.clear_status();
    debug!(%mode, "mode switched");
}

fn stage_image(app: &mut App, path: &str) {
    if !app.mode.accepts_image() {
        app.set_status("Images can only be attached in chat mode");
        return;
    }
    match StagedImage::from_path(expand_home(path)) {
        Ok(staged) => {
            app.set_status(format!("Attached {}", staged.file_name));
            app.input.staged_image = Some(staged);
        }
        Err(e) => app.set_status(e.to_string()),
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

fn complete_request(app: &mut App, request_id: u64) -> bool {
    let current = app.finish_request(request_id);
    if !current {
        debug!(request_id, "dropping outcome for a request that is no longer pending");
    }
    current
}

fn submit(app: &mut App) -> Option<AppCommand> {
    let text = app.input.text();
    let prompt = text.trim();

    if prompt.starts_with('/') {
        match process_input(prompt) {
            CommandResult::Actions(actions) => {
                app.input.clear_text(app.mode);
                let mut command = None;
                for action in actions {
                    if let Some(cmd) = apply_action(app, action) {
                        command = Some(cmd);
                    }
                }
                return command;
            }
            CommandResult::ProcessAsMessage(_) => {}
        }
    }

    let prompt = prompt.to_string();
    let staged = app.input.staged_image.clone();
    if prompt.is_empty() && staged.is_none() {
        return None;
    }
    if app.is_pending() {
        app.set_status(WAITING_STATUS);
        return None;
    }

    let (user_message, kind) = match app.mode {
        Mode::Chat => {
            let image = staged.as_ref().map(|staged| ImageRef::Uploaded {
                file_name: staged.file_name.clone(),
                path: staged.path.clone(),
            });
            (
                Message::user(prompt.clone(), image),
                SubmissionKind::Chat {
                    prompt,
                    image: staged,
                },
            )
        }
        Mode::ImageGeneration => {
            if prompt.is_empty() {
                return None;
            }
            (
                Message::user(format!("Generate an image of: {prompt}"), None),
                SubmissionKind::GenerateImage { prompt },
            )
        }
    };

    app.push_message(user_message);
    app.input.clear(app.mode);
    app.clear_status();
    let pending = app.begin_request();
    info!(request_id = pending.id, mode = %pending.mode, "submitting");

    Some(AppCommand::Submit(SubmissionRequest {
        request_id: pending.id,
        kind,
        cancel_token: pending.cancel_token,
    }))
}

fn copy_code_block(app: &mut App, index: Option<usize>) -> Option<AppCommand> {
    let blocks = app.latest_code_blocks();
    if blocks.is_empty() {
        app.set_status("No code block to copy");
        return None;
    }
    let position = match index {
        Some(index) => index,
        None => blocks.len() - 1,
    };
    match blocks.into_iter().nth(position) {
        Some(block) => Some(AppCommand::CopyToClipboard { text: block.code }),
        None => {
            app.set_status(format!("No code block #{}", position + 1));
            None
        }
    }
}

fn export_transcript(app: &mut App, filename: Option<String>) {
    let filename = filename.unwrap_or_else(|| {
        format!("vistachat-{}.html", chrono::Local::now().format("%Y-%m-%d"))
    });
    let html = app.transcript_html();
    match fs::write(Path::new(&filename), html) {
        Ok(()) => app.set_status(format!("Transcript exported to {filename}")),
        Err(e) => app.set_status(format!("Error exporting transcript: {e}")),
    }
}

fn toggle_logging(app: &mut App, filename: Option<String>) {
    let result = match filename {
        Some(path) => app.logging.set_log_file(path),
        None => app.logging.toggle_logging(),
    };
    match result {
        Ok(message) => app.set_status(message),
        Err(e) => app.set_status(format!("Log error: {e}")),
    }
}
