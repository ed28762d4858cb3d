//! Completion engine for codeask.
//!
//! Provides:
//! - The pure prompt assembler that turns a question and file set into one
//!   deterministic request
//! - The `CompletionClient` seam used by sessions
//! - OpenAI chat-completions and Anthropic Messages clients
//! - A factory that builds the configured client

pub mod claude;
pub mod factory;
mod http;
pub mod openai;
pub mod prompt;

use async_trait::async_trait;
use tracing::{debug, warn};

pub use claude::{ClaudeClient, ClaudeConfig};
pub use factory::build_client;
pub use openai::{OpenAiClient, OpenAiConfig};
pub use prompt::{AssembledPrompt, FileBlock, PromptAssembler, PromptRequest, SYSTEM_INSTRUCTION};

/// Sends an assembled prompt to a completion service.
///
/// Every call is single-turn and stateless: one system instruction and one
/// user message, no history carried between calls, no retry.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Short provider name for logging.
    fn name(&self) -> &str;

    /// Provider-specific request/response exchange.
    async fn send(&self, prompt: &AssembledPrompt) -> Result<Completion, AiError>;

    /// Send once and fold the outcome into a `PromptResult`.
    async fn complete(&self, prompt: &AssembledPrompt) -> PromptResult {
        match self.send(prompt).await {
            Ok(completion) => {
                debug!(
                    provider = self.name(),
                    input_tokens = completion.usage.input_tokens,
                    output_tokens = completion.usage.output_tokens,
                    total_tokens = completion.usage.total_tokens(),
                    "completion received"
                );
                PromptResult::Success {
                    answer_text: completion.content,
                }
            }
            Err(e) => {
                warn!(provider = self.name(), error = %e, "completion failed");
                PromptResult::from_error(&e)
            }
        }
    }
}

/// A successful completion: the first answer choice.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Outcome of one submission. Exactly one of answer or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResult {
    Success { answer_text: String },
    Failure { message: String },
}

impl PromptResult {
    /// Failure carrying the error's description verbatim.
    pub fn from_error(error: &AiError) -> Self {
        Self::Failure {
            message: format!(
                "Failed to get a response from the completion service. Error: {error}"
            ),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    Api(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("response contained no answer choices")]
    NoChoices,
    #[error("not configured: {0}")]
    NotConfigured(String),
}
