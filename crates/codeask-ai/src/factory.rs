//! Builds the completion client named in the config.

use std::sync::Arc;

use codeask_config::{AiConfig, AiProvider};
use tracing::info;

use crate::{AiError, ClaudeClient, ClaudeConfig, CompletionClient, OpenAiClient, OpenAiConfig};

/// Build the configured provider, resolving credentials from the environment.
pub fn build_client(ai: &AiConfig) -> Result<Arc<dyn CompletionClient>, AiError> {
    match ai.provider {
        AiProvider::OpenAi => {
            let config = OpenAiConfig::from_env()?.configured(ai);
            info!(model = %config.model, "using OpenAI completion provider");
            Ok(Arc::new(OpenAiClient::new(config)?))
        }
        AiProvider::Claude => {
            let config = ClaudeConfig::from_env()?.configured(ai);
            info!(model = %config.model, "using Claude completion provider");
            Ok(Arc::new(ClaudeClient::new(config)?))
        }
    }
}
