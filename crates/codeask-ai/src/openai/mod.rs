//! OpenAI chat-completions client.
//!
//! Implements `CompletionClient` against `POST /v1/chat/completions` with
//! bearer authentication from `OPENAI_API_KEY`.

mod api;
mod client;
mod config;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;
