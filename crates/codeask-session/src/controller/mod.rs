//! Per-session controller.
//!
//! Routes one surface's messages to the shared store and runs submissions
//! through the assembler and completion client. Every input of a submission
//! is captured before its single await, so selection edits that arrive
//! while a completion is in flight never change what was sent.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use codeask_ai::{CompletionClient, FileBlock, PromptAssembler, PromptResult};
use codeask_common::{Notification, SessionId};
use tracing::{debug, info, warn};

use crate::collab::{DocumentSource, RenderSink};
use crate::hub::SessionHub;
use crate::protocol::InboundMessage;
use crate::view::{RenderView, ResponseView};


pub const CODE_COPIED_MESSAGE: &str = "Code copied to clipboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    AwaitingCompletion,
}

/// What became of one `submitQuestion`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Whitespace-only question; nothing was sent.
    Rejected,
    /// The result was rendered to the session.
    Rendered(PromptResult),
    /// A later submission was issued before this one resolved.
    Superseded,
    /// The session closed before the result arrived.
    Closed(PromptResult),
}

pub struct SessionController {
    id: SessionId,
    hub: Rc<SessionHub>,
    sink: Rc<dyn RenderSink>,
    documents: Rc<dyn DocumentSource>,
    client: Arc<dyn CompletionClient>,
    phase: Cell<SessionPhase>,
    question: RefCell<String>,
    response: RefCell<ResponseView>,
    /// Sequence number of the most recently issued submission.
    issued: Cell<u64>,
}

impl SessionController {
    pub(crate) fn new(
        id: SessionId,
        hub: Rc<SessionHub>,
        sink: Rc<dyn RenderSink>,
        documents: Rc<dyn DocumentSource>,
        client: Arc<dyn CompletionClient>,
    ) -> Self {
        Self {
            id,
            hub,
            sink,
            documents,
            client,
            phase: Cell::new(SessionPhase::Idle),
            question: RefCell::new(String::new()),
            response: RefCell::new(ResponseView::None),
            issued: Cell::new(0),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase.get()
    }

    pub fn current_view(&self) -> RenderView {
        RenderView {
            question: self.question.borrow().clone(),
            response: self.response.borrow().clone(),
            pending: self.phase.get() == SessionPhase::AwaitingCompletion,
            files: self.hub.snapshot(),
        }
    }

    fn render(&self) {
        let view = self.current_view();
        self.sink.render(&view);
    }

    // =========================================================================
    // DISPATCH
    // =========================================================================

    /// Parse a raw message body and dispatch it. Bad input is logged and dropped.
    pub async fn handle_raw(&self, body: &str) {
        match InboundMessage::from_json(body) {
            Ok(msg) => self.handle(msg).await,
            Err(e) => warn!(session = %self.id, error = %e, "ignoring message"),
        }
    }

    pub async fn handle(&self, msg: InboundMessage) {
        debug!(session = %self.id, command = msg.command(), "dispatching message");
        match msg {
            InboundMessage::SubmitQuestion {
                text,
                selected_uris,
            } => {
                self.submit_question(&text, &selected_uris).await;
            }
            InboundMessage::ToggleFileSelection { uri } => self.toggle_selection(&uri),
            InboundMessage::ClearSelectedFiles => self.clear_selection(),
            InboundMessage::RefreshFiles => self.refresh(),
            InboundMessage::CodeCopied => self.code_copied(),
        }
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    pub fn toggle_selection(&self, id: &str) {
        if !self.hub.toggle(id) {
            debug!(session = %self.id, id, "toggle ignored, file not tracked");
        }
        self.render();
    }

    /// Unselect every file and reset this session's question and answer.
    pub fn clear_selection(&self) {
        self.hub.clear_selection();
        self.question.borrow_mut().clear();
        *self.response.borrow_mut() = ResponseView::None;
        self.render();
    }

    pub fn refresh(&self) {
        self.render();
    }

    pub fn code_copied(&self) {
        self.sink.notify(&Notification::info(CODE_COPIED_MESSAGE));
    }

    // =========================================================================
    // SUBMISSION
    // =========================================================================

    /// Sync the selection, then send the question with every selected file the
    /// document source can resolve.
    pub async fn submit_question(&self, text: &str, selected: &[String]) -> SubmitOutcome {
        if text.trim().is_empty() {
            warn!(session = %self.id, "rejected empty question");
            return SubmitOutcome::Rejected;
        }

        self.hub.set_selected(selected);

        let ids = self.hub.with_store(|store| store.selected_ids());
        let files: Vec<FileBlock> = ids
            .into_iter()
            .filter_map(|id| match self.documents.resolve(&id) {
                Some(content) => Some(FileBlock::new(id, content)),
                None => {
                    debug!(session = %self.id, id = %id, "omitting unresolved file");
                    None
                }
            })
            .collect();
        let prompt = PromptAssembler::assemble(text, &files);

        let seq = self.issued.get() + 1;
        self.issued.set(seq);
        self.phase.set(SessionPhase::AwaitingCompletion);
        *self.question.borrow_mut() = text.to_string();
        *self.response.borrow_mut() = ResponseView::None;
        self.render();

        info!(
            session = %self.id,
            seq,
            files = prompt.file_ids.len(),
            provider = self.client.name(),
            "submitting question"
        );
        let result = self.client.complete(&prompt).await;

        if self.issued.get() != seq {
            debug!(session = %self.id, seq, latest = self.issued.get(), "discarding superseded result");
            return SubmitOutcome::Superseded;
        }

        info!(session = %self.id, seq, success = result.is_success(), "completion resolved");
        // A clear while awaiting resets the question; the result still belongs to it.
        *self.question.borrow_mut() = text.to_string();
        *self.response.borrow_mut() = ResponseView::from(result.clone());
        self.phase.set(SessionPhase::Idle);

        if !self.hub.is_open(&self.id) {
            debug!(session = %self.id, seq, "session closed, dropping result");
            return SubmitOutcome::Closed(result);
        }
        self.render();
        SubmitOutcome::Rendered(result)
    }
}
