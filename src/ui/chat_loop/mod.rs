//! The interactive session: terminal events and request outcomes both become
//! [`AppAction`]s applied on this task, which owns the [`App`].

pub mod keybindings;
pub mod lifecycle;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::event::{self, Event};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{HttpTransport, Transport};
use crate::core::app::{
    apply_action, apply_actions, App, AppActionDispatcher, AppActionEnvelope, AppCommand,
    AppInitConfig,
};
use crate::core::config::Settings;
use crate::core::submission::SubmissionService;
use crate::ui::renderer::ui;
use crate::utils::clipboard::copy_to_clipboard;

use keybindings::action_for_event;
use lifecycle::{restore_terminal, setup_terminal, ChatTerminal};

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub async fn run_chat(settings: Settings, log: Option<String>) -> Result<(), Box<dyn Error>> {
    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::new(&settings.base_url, settings.timeout)?);
    let mut app = App::new(AppInitConfig {
        mode: settings.mode,
        base_url: settings.base_url.clone(),
        log_file: log,
    })?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppActionEnvelope>();
    let dispatcher = AppActionDispatcher::new(action_tx);
    let submissions = SubmissionService::new(transport, dispatcher);

    info!(base_url = %settings.base_url, mode = %settings.mode, "starting chat session");

    let mut terminal = setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    spawn_event_reader(event_tx);

    let result = event_loop(
        &mut terminal,
        &mut app,
        &mut event_rx,
        &mut action_rx,
        &submissions,
    )
    .await;

    // Dropping the receiver stops the reader thread on its next poll
    drop(event_rx);
    restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<Event>,
    action_rx: &mut mpsc::UnboundedReceiver<AppActionEnvelope>,
    submissions: &SubmissionService,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(f, app))?;
        if app.exit_requested {
            return Ok(());
        }
        if let LoopControl::Exit = next_step(app, event_rx, action_rx, submissions).await {
            return Ok(());
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum LoopControl {
    Continue,
    Exit,
}

/// Wait for the next batch of terminal events or request outcomes and apply
/// it. The session ends once the terminal event stream closes, since no more
/// input can arrive.
async fn next_step(
    app: &mut App,
    event_rx: &mut mpsc::UnboundedReceiver<Event>,
    action_rx: &mut mpsc::UnboundedReceiver<AppActionEnvelope>,
    submissions: &SubmissionService,
) -> LoopControl {
    tokio::select! {
        event = event_rx.recv() => {
            let Some(event) = event else {
                warn!("terminal event stream closed");
                return LoopControl::Exit;
            };
            let mut events = vec![event];
            while let Ok(event) = event_rx.try_recv() {
                events.push(event);
            }
            for event in events {
                if let Some(action) = action_for_event(event, app) {
                    if let Some(command) = apply_action(app, action) {
                        run_command(app, command, submissions);
                    }
                }
            }
        }
        Some(envelope) = action_rx.recv() => {
            let mut envelopes = vec![envelope];
            while let Ok(envelope) = action_rx.try_recv() {
                envelopes.push(envelope);
            }
            for command in apply_actions(app, envelopes) {
                run_command(app, command, submissions);
            }
        }
    }
    LoopControl::Continue
}

fn run_command(app: &mut App, command: AppCommand, submissions: &SubmissionService) {
    match command {
        AppCommand::Submit(request) => {
            submissions.spawn(request);
        }
        AppCommand::CopyToClipboard { text } => match copy_to_clipboard(&text) {
            Ok(()) => app.set_status("Copied!"),
            Err(e) => {
                warn!(error = %e, "clipboard copy failed");
                app.set_status(format!("Copy failed: {e}"));
            }
        },
    }
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<Event>) {
    tokio::task::spawn_blocking(move || {
        while !event_tx.is_closed() {
            match event::poll(EVENT_POLL_INTERVAL) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if event_tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(e) => debug!(error = %e, "failed to read terminal event"),
                },
                Ok(false) => {}
                Err(e) => {
                    warn!(error = %e, "terminal event polling failed");
                    break;
                }
            }
        }
    });
}
