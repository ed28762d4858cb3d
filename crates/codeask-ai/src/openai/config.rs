//! OpenAI client configuration.

use std::fmt;
use std::time::Duration;

use codeask_config::AiConfig;

use crate::AiError;

pub(crate) const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub(crate) const DEFAULT_MODEL: &str = "gpt-3.5-turbo-16k";

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub base_url: String,
    pub request_timeout: Option<Duration>,
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
        }
    }

    /// Read the API key from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self, AiError> {
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key.trim())),
            _ => Err(AiError::NotConfigured(
                "OpenAI API not configured. Set OPENAI_API_KEY.".into(),
            )),
        }
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

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
