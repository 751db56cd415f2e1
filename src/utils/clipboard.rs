//! System clipboard access through the platform's copy command.

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("No clipboard command found (install wl-copy, xclip, or xsel)")]
    Unavailable,
    #[error("Clipboard command `{0}` failed")]
    Failed(String),
}

/// Commands tried in order; the first one that runs successfully wins.
#[cfg(target_os = "macos")]
const CANDIDATES: &[(&str, &[&str])] = &[("pbcopy", &[])];
#[cfg(target_os = "windows")]
const CANDIDATES: &[(&str, &[&str])] = &[("cmd", &["/C", "clip"])];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const CANDIDATES: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    copy_with(CANDIDATES, text)
}

fn copy_with(candidates: &[(&str, &[&str])], text: &str) -> Result<(), ClipboardError> {
    let mut last_failure = None;
    for (cmd, args) in candidates {
        match run_with_stdin(cmd, args, text) {
            Ok(()) => return Ok(()),
            Err(ClipboardError::Unavailable) => debug!(cmd, "clipboard command not installed"),
            Err(err) => last_failure = Some(err),
        }
    }
    Err(last_failure.unwrap_or(ClipboardError::Unavailable))
}

fn run_with_stdin(cmd: &str, args: &[&str], input: &str) -> Result<(), ClipboardError> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|_| ClipboardError::Unavailable)?;

    if let Some(mut stdin) = child.stdin.take() {
        let _ = stdin.write_all(input.as_bytes());
    }
    match child.wait() {
        Ok(status) if status.success() => Ok(()),
        _ => Err(ClipboardError::Failed(cmd.to_string())),
    }
}
