//! Claude client configuration.

use std::fmt;
use std::time::Duration;

use codeask_config::AiConfig;

use crate::AiError;

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub(crate) const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// How the client authenticates with the Claude API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// Anthropic API key (`x-api-key` header).
    ApiKey,
    /// OAuth bearer token (`Authorization: Bearer`).
    OAuth,
}

#[derive(Clone)]
pub struct ClaudeConfig {
    pub token: String,
    pub auth_method: AuthMethod,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub base_url: String,
    pub request_timeout: Option<Duration>,
}

impl fmt::Debug for ClaudeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClaudeConfig")
            .field("auth_method", &self.auth_method)
            .field("token", &"[REDACTED]")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl ClaudeConfig {
    pub fn new(token: impl Into<String>, auth_method: AuthMethod) -> Self {
        Self {
            token: token.into(),
            auth_method,
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }

    /// Resolve credentials from the environment.
    ///
    /// Resolution order:
    /// 1. `ANTHROPIC_API_KEY` (API key auth)
    /// 2. `CLAUDE_CODE_OAUTH_TOKEN` (OAuth auth)
    pub fn from_env() -> Result<Self, AiError> {
        if let Some(key) = non_empty_env("ANTHROPIC_API_KEY") {
            return Ok(Self::new(key, AuthMethod::ApiKey));
        }
        if let Some(token) = non_empty_env("CLAUDE_CODE_OAUTH_TOKEN") {
            return Ok(Self::new(token, AuthMethod::OAuth));
        }
        Err(AiError::NotConfigured(
            "Claude API not configured. Set ANTHROPIC_API_KEY or CLAUDE_CODE_OAUTH_TOKEN.".into(),
        ))
    }

    /// Apply the `[ai]` section of the config file.
    pub fn configured(mut self, ai: &AiConfig) -> Self {
        if let Some(model) = ai.model_override() {
            self.model = model.to_string();
        }
        if let Some(ref url) = ai.base_url {
            self.base_url = url.trim_end_matches('/').to_string();
        }
        self.max_tokens = ai.max_tokens;
        self.temperature = ai.temperature;
        self.request_timeout = ai.request_timeout_secs.map(Duration::from_secs);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_token() {
        let config = ClaudeConfig::new("sk-ant-secret", AuthMethod::ApiKey);
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-ant-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn configured_applies_model_and_limits() {
        let ai = AiConfig {
            model: "claude-3-5-haiku-latest".into(),
            max_tokens: 2048,
            ..AiConfig::default()
        };
        let config = ClaudeConfig::new("t", AuthMethod::OAuth).configured(&ai);
        assert_eq!(config.model, "claude-3-5-haiku-latest");
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.auth_method, AuthMethod::OAuth);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
