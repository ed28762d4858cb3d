//! Render instructions sent to a session's surface.

use codeask_ai::PromptResult;
use serde::{Deserialize, Serialize};

use crate::store::TrackedFile;

/// What the answer area shows.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "camelCase")]
pub enum ResponseView {
    #[default]
    None,
    Answer(String),
    Error(String),
}

impl From<PromptResult> for ResponseView {
    fn from(result: PromptResult) -> Self {
        match result {
            PromptResult::Success { answer_text } => Self::Answer(answer_text),
            PromptResult::Failure { message } => Self::Error(message),
        }
    }
}

impl ResponseView {
    pub fn answer(&self) -> Option<&str> {
        match self {
            Self::Answer(text) => Some(text),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// The full render payload for one session. Markup is the surface's job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderView {
    pub question: String,
    pub response: ResponseView,
    /// A submission is in flight for this session.
    pub pending: bool,
    pub files: Vec<TrackedFile>,
}
