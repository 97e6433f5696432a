//! # barbella_core
//!
//! Core domain logic for the Barbella support chat: the conversation model,
//! the history adapter that shapes it for the model provider, the completion
//! client, and the client-side conversation view with its rendering decision.

pub mod adapter;
pub mod completion;
pub mod hello;
pub mod prompt;
pub mod render;
pub mod turn;
pub mod view;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
