//! Anthropic Claude client.
//!
//! Implements `CompletionClient` for Claude models via the Anthropic
//! Messages API (`/v1/messages`).

mod api;
mod client;
mod config;

pub use client::ClaudeClient;
pub use config::{AuthMethod, ClaudeConfig};
