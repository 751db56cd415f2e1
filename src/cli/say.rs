//! TUI-less `say` and `imagine` commands

use std::error::Error;
use std::path::PathBuf;

use tracing::debug;

use crate::api::{ApiError, ChatUpload, HttpTransport, Transport};
use crate::core::app::StagedImage;
use crate::core::config::Settings;
use crate::core::format::{format_response, unescape_html, Segment};

pub async fn run_say(
    prompt: Vec<String>,
    image: Option<PathBuf>,
    settings: &Settings,
) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() && image.is_none() {
        eprintln!("Usage: vistachat say [--image <path>] <prompt>");
        std::process::exit(1);
    }

    let transport = HttpTransport::new(&settings.base_url, settings.timeout)?;
    match say(&transport, &prompt, image).await {
        Ok(reply) => {
            println!("{reply}");
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ Error: {err}");
            std::process::exit(1);
        }
    }
}

pub async fn run_imagine(prompt: Vec<String>, settings: &Settings) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("Usage: vistachat imagine <prompt>");
        std::process::exit(1);
    }

    let transport = HttpTransport::new(&settings.base_url, settings.timeout)?;
    match transport.generate_image(prompt.trim()).await {
        Ok(url) => {
            println!("{url}");
            Ok(())
        }
        Err(err) => {
            eprintln!("❌ Error: {err}");
            std::process::exit(1);
        }
    }
}

/// Send one chat message and return the reply rendered for a plain terminal.
pub async fn say(
    transport: &dyn Transport,
    prompt: &str,
    image: Option<PathBuf>,
) -> Result<String, Box<dyn Error>> {
    let upload = match image {
        Some(path) => {
            let staged = StagedImage::from_path(path)?;
            let bytes = tokio::fs::read(&staged.path)
                .await
                .map_err(|e| ApiError::Attachment(e.to_string()))?;
            debug!(file = %staged.file_name, size = bytes.len(), "attaching image");
            Some(ChatUpload {
                mime_type: staged.mime_type().to_string(),
                file_name: staged.file_name,
                bytes,
            })
        }
        None => None,
    };

    let reply = transport.chat(prompt.trim(), upload).await?;
    Ok(render_plain(&reply))
}

/// Reply text with code blocks set off by labeled rules.
pub fn render_plain(reply: &str) -> String {
    let mut out = String::new();
    for segment in format_response(reply).segments {
        match segment {
            Segment::Text(text) => out.push_str(&unescape_html(&text)),
            Segment::Code(block) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&format!("--- {} ---\n{}\n---\n", block.language, block.code));
            }
        }
    }
    out.trim_end().to_string()
}
