//! Completion provider configuration.

use serde::{Deserialize, Serialize};

/// Which completion service answers questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    OpenAi,
    Claude,
}

/// Completion request settings.
///
/// Credentials are never stored here; they come from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub provider: AiProvider,
    /// Model name. Empty means the provider's default.
    pub model: String,
    /// Valid range: 1-200000.
    pub max_tokens: u32,
    /// Valid range: 0.0-2.0.
    pub temperature: f64,
    /// Override the provider's API base URL (proxies, local gateways).
    pub base_url: Option<String>,
    /// Whole-request timeout in seconds. Unset means wait indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::OpenAi,
            model: String::new(),
            max_tokens: 4096,
            temperature: 0.7,
            base_url: None,
            request_timeout_secs: None,
        }
    }
}

impl AiConfig {
    /// The configured model, or `None` when the provider default applies.
    pub fn model_override(&self) -> Option<&str> {
        let model = self.model.trim();
        (!model.is_empty()).then_some(model)
    }
}
