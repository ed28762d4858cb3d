//! CompletionClient implementation for OpenAiClient.

use async_trait::async_trait;
use tracing::debug;

use crate::http::send_json;
use crate::{AiError, AssembledPrompt, Completion, CompletionClient};

use super::client::OpenAiClient;

#[async_trait]
impl CompletionClient for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    async fn send(&self, prompt: &AssembledPrompt) -> Result<Completion, AiError> {
        let body = self.build_request_body(prompt);

        debug!(
            model = %self.config.model,
            files = prompt.file_ids.len(),
            "OpenAI chat completion request"
        );

        let request = self
            .http
            .post(self.api_url())
            .bearer_auth(&self.config.api_key)
            .json(&body);

        let json = send_json(request).await?;
        self.parse_response(json)
    }
}
