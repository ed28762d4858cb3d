//! CompletionClient implementation for ClaudeClient.

use async_trait::async_trait;
use tracing::debug;

use crate::http::send_json;
use crate::{AiError, AssembledPrompt, Completion, CompletionClient};

use super::client::ClaudeClient;

#[async_trait]
impl CompletionClient for ClaudeClient {
    fn name(&self) -> &str {
        "claude"
    }

    async fn send(&self, prompt: &AssembledPrompt) -> Result<Completion, AiError> {
        let body = self.build_request_body(prompt);

        debug!(
            model = %self.config.model,
            files = prompt.file_ids.len(),
            "Claude API request"
        );

        let request = self
            .http
            .post(self.api_url())
            .headers(self.auth_headers()?)
            .json(&body);

        let json = send_json(request).await?;
        self.parse_response(json)
    }
}
