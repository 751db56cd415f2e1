//! VistaChat is a terminal client for a small assistant service that answers
//! text (optionally with an image) and generates images from prompts.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the controller state, the mode, the response formatter,
//!   configuration, and request orchestration.
//! - [`api`] defines the wire payloads and the HTTP transport.
//! - [`ui`] renders the terminal interface and the HTML export, and runs the
//!   interactive event loop.
//! - [`commands`] implements slash-command parsing used by the controller.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which resolves settings and dispatches into
//! [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
