//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: terminal setup, the event loop, and key bindings that
//!   translate input into [`crate::core::app::AppAction`]s.
//! - [`renderer`] and [`transcript`]: frame composition.
//! - [`html`]: markup rendering of the conversation for export.
//!
//! Ownership boundary: this layer presents and captures interaction state, while
//! [`crate::core`] owns domain logic and request coordination.

pub mod chat_loop;
pub mod html;
pub mod renderer;
pub mod transcript;
