//! Claude client struct, request building, and response parsing.

use reqwest::header::{HeaderMap, HeaderValue};

use crate::http::build_http;
use crate::{AiError, AssembledPrompt, Completion, TokenUsage};

use super::config::{AuthMethod, ClaudeConfig};

pub(crate) const MESSAGES_PATH: &str = "/v1/messages";
pub(crate) const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct ClaudeClient {
    pub(crate) config: ClaudeConfig,
    pub(crate) http: reqwest::Client,
}

impl ClaudeClient {
    pub fn new(config: ClaudeConfig) -> Result<Self, AiError> {
        let http = build_http(config.request_timeout)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClaudeConfig {
        &self.config
    }

    pub(crate) fn api_url(&self) -> String {
        format!("{}{}", self.config.base_url, MESSAGES_PATH)
    }

    /// Build auth headers for the configured auth method.
    pub(crate) fn auth_headers(&self) -> Result<HeaderMap, AiError> {
        let mut headers = HeaderMap::new();
        match self.config.auth_method {
            AuthMethod::ApiKey => {
                headers.insert("x-api-key", header_value(&self.config.token)?);
            }
            AuthMethod::OAuth => {
                headers.insert(
                    "Authorization",
                    header_value(&format!("Bearer {}", self.config.token))?,
                );
            }
        }
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        Ok(headers)
    }

    /// The system instruction is a top-level field; the user content is
    /// the only message.
    pub(crate) fn build_request_body(&self, prompt: &AssembledPrompt) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": prompt.system,
            "messages": [
                { "role": "user", "content": prompt.user },
            ],
        })
    }

    /// Concatenate the response's text blocks.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<Completion, AiError> {
        if json["type"] == "error" {
            let message = json["error"]["message"].as_str().unwrap_or("unknown error");
            return Err(AiError::Api(message.to_string()));
        }

        let texts: Vec<&str> = json["content"]
            .as_array()
            .map(|blocks| {
                blocks
                    .iter()
                    .filter(|b| b["type"] == "text")
                    .filter_map(|b| b["text"].as_str())
                    .collect()
            })
            .unwrap_or_default();

        if texts.is_empty() {
            return Err(AiError::NoChoices);
        }

        let usage = TokenUsage {
            input_tokens: json["usage"]["input_tokens"].as_u64().unwrap_or(0),
            output_tokens: json["usage"]["output_tokens"].as_u64().unwrap_or(0),
        };

        Ok(Completion {
            content: texts.concat(),
            usage,
        })
    }
}

fn header_value(raw: &str) -> Result<HeaderValue, AiError> {
    HeaderValue::from_str(raw)
        .map_err(|e| AiError::NotConfigured(format!("invalid credential header: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PromptAssembler;

    fn client(auth: AuthMethod) -> ClaudeClient {
        ClaudeClient::new(ClaudeConfig::new("tok", auth)).unwrap()
    }

    #[test]
    fn request_body_puts_system_at_top_level() {
        let prompt = PromptAssembler::assemble("How?", &[]);
        let body = client(AuthMethod::ApiKey).build_request_body(&prompt);
        assert_eq!(body["system"], crate::SYSTEM_INSTRUCTION);
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0]["role"], "user");
        assert_eq!(messages[0]["content"], "How?");
    }

    #[test]
    fn api_key_auth_uses_x_api_key() {
        let headers = client(AuthMethod::ApiKey).auth_headers().unwrap();
        assert_eq!(headers["x-api-key"], "tok");
        assert!(headers.get("Authorization").is_none());
        assert_eq!(headers["anthropic-version"], ANTHROPIC_VERSION);
    }

    #[test]
    fn oauth_auth_uses_bearer() {
        let headers = client(AuthMethod::OAuth).auth_headers().unwrap();
        assert_eq!(headers["Authorization"], "Bearer tok");
    }

    #[test]
    fn invalid_token_is_reported_not_panicked() {
        let client = ClaudeClient::new(ClaudeConfig::new("bad\ntoken", AuthMethod::ApiKey)).unwrap();
        assert!(matches!(
            client.auth_headers(),
            Err(AiError::NotConfigured(_))
        ));
    }

    #[test]
    fn parse_text_blocks() {
        let json = serde_json::json!({
            "content": [
                { "type": "text", "text": "Here is " },
                { "type": "text", "text": "the answer." }
            ],
            "usage": { "input_tokens": 40, "output_tokens": 7 }
        });
        let completion = client(AuthMethod::ApiKey).parse_response(json).unwrap();
        assert_eq!(completion.content, "Here is the answer.");
        assert_eq!(completion.usage.total_tokens(), 47);
    }

    #[test]
    fn parse_without_text_is_no_choices() {
        let json = serde_json::json!({ "content": [] });
        assert!(matches!(
            client(AuthMethod::ApiKey).parse_response(json),
            Err(AiError::NoChoices)
        ));
    }

    #[test]
    fn parse_error_envelope() {
        let json = serde_json::json!({
            "type": "error",
            "error": { "type": "overloaded_error", "message": "Overloaded" }
        });
        let err = client(AuthMethod::ApiKey).parse_response(json).unwrap_err();
        assert_eq!(err.to_string(), "API error: Overloaded");
    }
}
