//! Message protocol between a session surface and its controller.
//!
//! Inbound messages are JSON objects tagged by `command`:
//! `{"command": "toggleFileSelection", "uri": "src/main.rs"}`.
//! Outbound messages are tagged by `kind`.

use codeask_common::Notification;
use serde::{Deserialize, Serialize};

use crate::store::TrackedFile;
use crate::view::RenderView;

/// Commands a surface may send. Anything else is rejected.
const ALLOWED_COMMANDS: &[&str] = &[
    "submitQuestion",
    "toggleFileSelection",
    "clearSelectedFiles",
    "refreshFiles",
    "codeCopied",
];

pub fn is_command_allowed(command: &str) -> bool {
    ALLOWED_COMMANDS.contains(&command)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum InboundMessage {
    /// The UI sends the full checked set with every submission.
    SubmitQuestion {
        text: String,
        #[serde(default, rename = "selectedUris")]
        selected_uris: Vec<String>,
    },
    ToggleFileSelection {
        uri: String,
    },
    ClearSelectedFiles,
    RefreshFiles,
    CodeCopied,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(String),
    #[error("message has no command")]
    MissingCommand,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

impl InboundMessage {
    /// Parse a raw message body from a surface.
    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| ProtocolError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    /// Parse an already-decoded message, e.g. one lifted out of an envelope.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ProtocolError> {
        let command = value
            .get("command")
            .and_then(|c| c.as_str())
            .ok_or(ProtocolError::MissingCommand)?;

        if !is_command_allowed(command) {
            return Err(ProtocolError::UnknownCommand(command.to_string()));
        }

        serde_json::from_value(value).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }

    pub fn command(&self) -> &'static str {
        match self {
            Self::SubmitQuestion { .. } => "submitQuestion",
            Self::ToggleFileSelection { .. } => "toggleFileSelection",
            Self::ClearSelectedFiles => "clearSelectedFiles",
            Self::RefreshFiles => "refreshFiles",
            Self::CodeCopied => "codeCopied",
        }
    }
}

/// Messages from the core to a surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OutboundMessage {
    Render(RenderView),
    FilesChanged { files: Vec<TrackedFile> },
    /// Only the selected files, for a host's side list.
    SelectedFiles { files: Vec<TrackedFile> },
    Notify(Notification),
}
