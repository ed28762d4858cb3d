//! JSON-lines framing over stdio.
//!
//! Every inbound line names its session and carries either a UI message
//! (`{"session": "main", "command": "refreshFiles"}`) or a host command
//! (`{"session": "main", "host": "trackActive", "uri": "src/main.rs"}`).
//! Outbound lines are the session's `OutboundMessage` plus its `session` tag.

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use codeask_common::Notification;
use codeask_session::{InboundMessage, OutboundMessage, ProtocolError, RenderSink, RenderView, TrackedFile};
use serde::Deserialize;
use tracing::warn;

/// Editor-side commands that manage the tracked set and sessions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "host", rename_all = "camelCase")]
pub enum HostCommand {
    TrackActive { uri: String },
    AddFile { uri: String },
    Untrack { uri: String },
    RescanWorkspace,
    ClearSelection,
    Refresh,
    /// Reply with the selected files only.
    SelectedFiles,
    CloseSession,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Ui(InboundMessage),
    Host(HostCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub session: String,
    pub payload: Payload,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("malformed line: {0}")]
    Malformed(String),
    #[error("line has no session")]
    MissingSession,
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl Envelope {
    pub fn parse(line: &str) -> Result<Self, TransportError> {
        let value: serde_json::Value =
            serde_json::from_str(line).map_err(|e| TransportError::Malformed(e.to_string()))?;
        let session = value
            .get("session")
            .and_then(|s| s.as_str())
            .filter(|s| !s.is_empty())
            .ok_or(TransportError::MissingSession)?
            .to_string();

        let payload = if value.get("host").is_some() {
            let command = serde_json::from_value(value)
                .map_err(|e| TransportError::Malformed(e.to_string()))?;
            Payload::Host(command)
        } else {
            Payload::Ui(InboundMessage::from_value(value)?)
        };

        Ok(Self { session, payload })
    }
}

/// Shared line writer for every session.
pub type Output = Rc<RefCell<dyn Write>>;

/// Write one outbound message, tagged with its session, as a single line.
pub fn write_message(out: &Output, session: &str, message: &OutboundMessage) {
    let mut value = match serde_json::to_value(message) {
        Ok(value) => value,
        Err(e) => {
            warn!(session, error = %e, "failed to encode outbound message");
            return;
        }
    };
    if let Some(obj) = value.as_object_mut() {
        obj.insert("session".into(), serde_json::Value::String(session.to_string()));
    }

    let mut out = out.borrow_mut();
    let written = writeln!(out, "{value}").and_then(|_| out.flush());
    if let Err(e) = written {
        warn!(session, error = %e, "failed to write outbound message");
    }
}

/// A session surface backed by the stdout line stream.
pub struct StdioSink {
    session: String,
    out: Output,
}

impl StdioSink {
    pub fn new(session: impl Into<String>, out: Output) -> Self {
        Self {
            session: session.into(),
            out,
        }
    }

    fn send(&self, message: OutboundMessage) {
        write_message(&self.out, &self.session, &message);
    }
}

impl RenderSink for StdioSink {
    fn render(&self, view: &RenderView) {
        self.send(OutboundMessage::Render(view.clone()));
    }

    fn files_changed(&self, files: &[TrackedFile]) {
        self.send(OutboundMessage::FilesChanged {
            files: files.to_vec(),
        });
    }

    fn notify(&self, notification: &Notification) {
        self.send(OutboundMessage::Notify(notification.clone()));
    }
}
