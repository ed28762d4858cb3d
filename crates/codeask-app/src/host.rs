//! The host side of the session core: owns the hub and the open sessions,
//! and routes transport lines to them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use codeask_ai::CompletionClient;
use codeask_common::{CodeaskError, Notification, SessionId, TrackingPolicy};
use codeask_session::{
    InboundMessage, OutboundMessage, RenderSink, SelectionError, SessionController, SessionHub,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::documents::FsDocumentSource;
use crate::transport::{write_message, Envelope, HostCommand, Output, Payload, StdioSink};
use crate::workspace::WorkspaceScanner;

struct OpenSession {
    controller: Rc<SessionController>,
    sink: Rc<StdioSink>,
}

pub struct Host {
    hub: Rc<SessionHub>,
    documents: Rc<FsDocumentSource>,
    scanner: WorkspaceScanner,
    client: Arc<dyn CompletionClient>,
    out: Output,
    sessions: RefCell<HashMap<String, OpenSession>>,
}

impl Host {
    pub fn new(
        policy: TrackingPolicy,
        documents: FsDocumentSource,
        scanner: WorkspaceScanner,
        client: Arc<dyn CompletionClient>,
        out: Output,
    ) -> Rc<Self> {
        Rc::new(Self {
            hub: SessionHub::new(policy),
            documents: Rc::new(documents),
            scanner,
            client,
            out,
            sessions: RefCell::new(HashMap::new()),
        })
    }

    #[cfg(test)]
    pub fn hub(&self) -> &Rc<SessionHub> {
        &self.hub
    }

    /// Populate the store from the workspace when running the workspace policy.
    pub fn start(&self) -> Result<(), CodeaskError> {
        if self.hub.policy() == TrackingPolicy::Workspace {
            self.rescan()?;
        }
        Ok(())
    }

    fn rescan(&self) -> Result<(), CodeaskError> {
        let ids = self.scanner.scan();
        self.hub
            .replace_workspace(ids)
            .map_err(|e| CodeaskError::Selection(e.to_string()))
    }

    /// The session's controller, opening the session on first use.
    fn session(&self, name: &str) -> Rc<SessionController> {
        if let Some(open) = self.sessions.borrow().get(name) {
            return Rc::clone(&open.controller);
        }

        let sink = Rc::new(StdioSink::new(name, Rc::clone(&self.out)));
        let controller = self.hub.open_session(
            SessionId::named(name),
            sink.clone(),
            self.documents.clone(),
            Arc::clone(&self.client),
        );
        self.sessions.borrow_mut().insert(
            name.to_string(),
            OpenSession {
                controller: Rc::clone(&controller),
                sink,
            },
        );
        controller
    }

    /// Parse one line; return the UI message to run, or run the host command
    /// in place.
    pub fn route(&self, line: &str) -> Option<(Rc<SessionController>, InboundMessage)> {
        let envelope = match Envelope::parse(line) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(error = %e, "ignoring line");
                return None;
            }
        };

        match envelope.payload {
            Payload::Ui(message) => Some((self.session(&envelope.session), message)),
            Payload::Host(command) => {
                if let Err(e) = self.run_host_command(&envelope.session, command) {
                    warn!(session = %envelope.session, error = %e, "host command failed");
                    self.notify(&envelope.session, Notification::warning(e.to_string()));
                }
                None
            }
        }
    }

    fn notify(&self, name: &str, notification: Notification) {
        if let Some(open) = self.sessions.borrow().get(name) {
            open.sink.notify(&notification);
        }
    }

    pub fn run_host_command(&self, name: &str, command: HostCommand) -> Result<(), CodeaskError> {
        debug!(session = name, ?command, "host command");
        let selection = |e: SelectionError| CodeaskError::Selection(e.to_string());
        match command {
            HostCommand::TrackActive { uri } => {
                self.session(name);
                self.hub.track_active(&uri).map_err(selection)?;
            }
            HostCommand::AddFile { uri } => {
                self.session(name);
                self.hub.add_file(&uri);
            }
            HostCommand::Untrack { uri } => {
                self.session(name);
                self.hub.untrack(&uri).map_err(selection)?;
            }
            HostCommand::RescanWorkspace => self.rescan()?,
            HostCommand::ClearSelection => {
                self.hub.clear_selection();
            }
            HostCommand::Refresh => self.hub.refresh_all(),
            HostCommand::SelectedFiles => {
                self.session(name);
                let files = self.hub.with_store(|store| store.selected_snapshot());
                write_message(&self.out, name, &OutboundMessage::SelectedFiles { files });
            }
            HostCommand::CloseSession => {
                let removed = self.sessions.borrow_mut().remove(name);
                if let Some(open) = removed {
                    self.hub.close_session(open.controller.id());
                }
            }
        }
        Ok(())
    }
}

/// Read stdin line by line until EOF. Each UI message runs as its own local
/// task so a pending submission never blocks the next line.
pub async fn run(host: Rc<Host>) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if let Some((controller, message)) = host.route(&line) {
            tokio::task::spawn_local(async move {
                controller.handle(message).await;
            });
        }
    }
    info!("stdin closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use codeask_ai::{AiError, AssembledPrompt, Completion, TokenUsage};
    use std::fs;
    use std::sync::Mutex;

    #[derive(Default)]
    struct EchoClient {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CompletionClient for EchoClient {
        fn name(&self) -> &str {
            "echo"
        }

        async fn send(&self, prompt: &AssembledPrompt) -> Result<Completion, AiError> {
            self.prompts.lock().unwrap().push(prompt.user.clone());
            Ok(Completion {
                content: format!("{} file(s)", prompt.file_ids.len()),
                usage: TokenUsage::default(),
            })
        }
    }

    struct Harness {
        _dir: tempfile::TempDir,
        buf: Rc<RefCell<Vec<u8>>>,
        client: Arc<EchoClient>,
        host: Rc<Host>,
    }

    fn harness(policy: TrackingPolicy) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "alpha").unwrap();
        fs::write(dir.path().join("b.txt"), "beta").unwrap();

        let buf = Rc::new(RefCell::new(Vec::new()));
        let out: Output = buf.clone();
        let client = Arc::new(EchoClient::default());
        let host = Host::new(
            policy,
            FsDocumentSource::new(dir.path(), 1024),
            WorkspaceScanner::new(dir.path(), false),
            client.clone(),
            out,
        );
        Harness {
            _dir: dir,
            buf,
            client,
            host,
        }
    }

    fn output(h: &Harness) -> Vec<serde_json::Value> {
        String::from_utf8(h.buf.borrow().clone())
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    async fn send(h: &Harness, line: &str) {
        if let Some((controller, message)) = h.host.route(line) {
            controller.handle(message).await;
        }
    }

    #[tokio::test]
    async fn manual_flow_end_to_end() {
        let h = harness(TrackingPolicy::Manual);
        send(&h, r#"{"session":"s","host":"trackActive","uri":"a.txt"}"#).await;
        send(&h, r#"{"session":"s","host":"addFile","uri":"b.txt"}"#).await;
        send(
            &h,
            r#"{"session":"s","command":"submitQuestion","text":"What?","selectedUris":["a.txt"]}"#,
        )
        .await;

        let prompts = h.client.prompts.lock().unwrap().clone();
        assert_eq!(prompts, vec!["What?\na.txt\n\talpha".to_string()]);

        let out = output(&h);
        let last = out.last().unwrap();
        assert_eq!(last["session"], "s");
        assert_eq!(last["kind"], "render");
        assert_eq!(last["response"]["type"], "answer");
        assert_eq!(last["response"]["text"], "1 file(s)");
        assert_eq!(last["pending"], false);
    }

    #[tokio::test]
    async fn workspace_policy_scans_on_start() {
        let h = harness(TrackingPolicy::Workspace);
        h.host.start().unwrap();
        assert_eq!(
            h.host.hub().with_store(|s| s.snapshot().into_iter().map(|f| f.id).collect::<Vec<_>>()),
            vec!["a.txt", "b.txt"]
        );
    }

    #[tokio::test]
    async fn policy_mismatch_is_reported_to_the_session() {
        let h = harness(TrackingPolicy::Workspace);
        h.host.start().unwrap();
        send(&h, r#"{"session":"s","command":"refreshFiles"}"#).await;
        send(&h, r#"{"session":"s","host":"trackActive","uri":"c.txt"}"#).await;

        let out = output(&h);
        let last = out.last().unwrap();
        assert_eq!(last["kind"], "notify");
        assert_eq!(last["level"], "warning");
        assert!(h.host.hub().with_store(|s| !s.contains("c.txt")));
    }

    #[tokio::test]
    async fn untrack_mismatch_is_reported_to_unopened_session() {
        let h = harness(TrackingPolicy::Workspace);
        h.host.start().unwrap();
        send(&h, r#"{"session":"fresh","host":"untrack","uri":"a.txt"}"#).await;

        let out = output(&h);
        let last = out.last().unwrap();
        assert_eq!(last["session"], "fresh");
        assert_eq!(last["kind"], "notify");
        assert_eq!(last["level"], "warning");
        assert!(h.host.hub().with_store(|s| s.contains("a.txt")));
    }

    #[tokio::test]
    async fn selected_files_lists_only_checked_entries() {
        let h = harness(TrackingPolicy::Manual);
        send(&h, r#"{"session":"s","host":"trackActive","uri":"a.txt"}"#).await;
        send(&h, r#"{"session":"s","host":"addFile","uri":"b.txt"}"#).await;
        send(&h, r#"{"session":"s","host":"selectedFiles"}"#).await;

        let out = output(&h);
        assert_eq!(
            out.last().unwrap(),
            &serde_json::json!({
                "session": "s",
                "kind": "selectedFiles",
                "files": [{ "id": "a.txt", "selected": true }]
            })
        );
    }

    #[tokio::test]
    async fn close_session_stops_output() {
        let h = harness(TrackingPolicy::Manual);
        send(&h, r#"{"session":"s","command":"refreshFiles"}"#).await;
        send(&h, r#"{"session":"s","host":"closeSession"}"#).await;
        assert_eq!(h.host.hub().session_count(), 0);

        let before = output(&h).len();
        send(&h, r#"{"session":"other","host":"addFile","uri":"a.txt"}"#).await;
        let out = output(&h);
        assert_eq!(out.len(), before + 1);
        assert!(out.iter().skip(before).all(|line| line["session"] == "other"));
    }

    #[tokio::test]
    async fn bad_lines_are_ignored() {
        let h = harness(TrackingPolicy::Manual);
        send(&h, "garbage").await;
        send(&h, r#"{"session":"s","command":"formatDisk"}"#).await;
        assert!(output(&h).is_empty());
        assert_eq!(h.host.hub().session_count(), 0);
    }
}
