//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::say::{run_imagine, run_say};
use crate::core::config::{Config, SettingsOverrides, BASE_URL_ENV, DEFAULT_BASE_URL};
use crate::core::mode::Mode;
use crate::ui::chat_loop::run_chat;
use crate::utils::diagnostics::{init_debug_log, LOG_FILTER_ENV};

#[derive(Parser)]
#[command(name = "vistachat")]
#[command(version)]
#[command(about = "A terminal chat client for text, image questions and image generation")]
#[command(
    long_about = "VistaChat is a full-screen terminal client for a small assistant service. \
Chat mode sends text with an optional image; image generation mode turns a prompt into a \
generated image URL. Replies with fenced code blocks are shown as labeled, copyable blocks.\n\n\
Environment Variables:\n\
  VISTACHAT_BASE_URL  Server base URL (overrides the config file)\n\
  VISTACHAT_LOG       Filter for --debug-log output (default: vistachat=debug)\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a new line\n\
  F2 / F3           Chat mode / Image generation mode\n\
  Ctrl+Y            Copy the last code block\n\
  Esc               Cancel the pending request\n\
  PgUp/PgDn         Scroll the conversation\n\
  Ctrl+C            Quit the application\n\n\
Commands:\n\
  /help             Show all commands and key bindings\n\
  /image <path>     Attach an image to the next chat message\n\
  /export [file]    Save the conversation as HTML"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the chat server
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Mode to start in (chat or image)
    #[arg(short = 'm', long, global = true, value_name = "MODE")]
    pub mode: Option<Mode>,

    /// Enable transcript logging to the specified file
    #[arg(short = 'l', long, global = true)]
    pub log: Option<String>,

    /// Write diagnostic logs to the specified file
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send a single chat message and print the reply
    Say {
        /// Image to attach (png, jpg, jpeg, gif or webp)
        #[arg(short = 'i', long, value_name = "PATH")]
        image: Option<PathBuf>,
        /// Prompt text
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Generate an image and print its URL
    Imagine {
        /// Description of the image
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Set configuration values
    Set {
        /// Configuration key to set (base-url, default-mode, timeout-secs)
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Print the current configuration
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    if let Some(path) = &args.debug_log {
        init_debug_log(path)?;
        tracing::debug!(filter_env = LOG_FILTER_ENV, "debug logging enabled");
    }

    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let overrides = SettingsOverrides {
        base_url: args.base_url.clone(),
        mode: args.mode,
    };

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let settings = load_config_or_exit().resolve(&overrides);
            run_chat(settings, args.log).await
        }
        Commands::Say { image, prompt } => {
            let settings = load_config_or_exit().resolve(&overrides);
            run_say(prompt, image, &settings).await
        }
        Commands::Imagine { prompt } => {
            let settings = load_config_or_exit().resolve(&overrides);
            run_imagine(prompt, &settings).await
        }
        Commands::Set { key, value } => {
            let mut config = load_config_or_exit();
            let Some(key) = key.filter(|_| !value.is_empty()) else {
                config.print_all();
                return Ok(());
            };
            match config.set_value(&key, &value.join(" ")) {
                Ok(message) => {
                    config.save()?;
                    println!("✅ {message}");
                    Ok(())
                }
                Err(e) => {
                    eprintln!("❌ {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Unset { key } => {
            let mut config = load_config_or_exit();
            match config.unset_value(&key) {
                Ok(message) => {
                    config.save()?;
                    println!("✅ {message}");
                    Ok(())
                }
                Err(e) => {
                    eprintln!("❌ {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Config => {
            let config = load_config_or_exit();
            config.print_all();
            if let Ok(url) = std::env::var(BASE_URL_ENV) {
                println!("  ({BASE_URL_ENV} is set and overrides base-url: {url})");
            }
            if config.base_url.is_none() && std::env::var(BASE_URL_ENV).is_err() {
                println!("  Requests go to {DEFAULT_BASE_URL}");
            }
            Ok(())
        }
    }
}

fn load_config_or_exit() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: {e}");
            std::process::exit(1);
        }
    }
}
