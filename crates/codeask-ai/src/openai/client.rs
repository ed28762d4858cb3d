//! OpenAI client struct, request building, and response parsing.

use crate::http::build_http;
use crate::{AiError, AssembledPrompt, Completion, TokenUsage};

use super::config::OpenAiConfig;

pub(crate) const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

pub struct OpenAiClient {
    pub(crate) config: OpenAiConfig,
    pub(crate) http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, AiError> {
        let http = build_http(config.request_timeout)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    pub(crate) fn api_url(&self) -> String {
        format!("{}{}", self.config.base_url, CHAT_COMPLETIONS_PATH)
    }

    /// Single-turn body: one system message, one user message.
    pub(crate) fn build_request_body(&self, prompt: &AssembledPrompt) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user },
            ],
        })
    }

    /// Take the first choice's message content.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<Completion, AiError> {
        if let Some(message) = json["error"]["message"].as_str() {
            return Err(AiError::Api(message.to_string()));
        }

        let first = json["choices"]
            .as_array()
            .and_then(|choices| choices.first())
            .ok_or(AiError::NoChoices)?;

        let content = first["message"]["content"]
            .as_str()
            .ok_or(AiError::NoChoices)?
            .to_string();

        let usage = TokenUsage {
            input_tokens: json["usage"]["prompt_tokens"].as_u64().unwrap_or(0),
            output_tokens: json["usage"]["completion_tokens"].as_u64().unwrap_or(0),
        };

        Ok(Completion { content, usage })
    }
}
