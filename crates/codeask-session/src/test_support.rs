//! Fakes for the session collaborators.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::Poll;

use async_trait::async_trait;
use codeask_ai::{AiError, AssembledPrompt, Completion, CompletionClient, TokenUsage};
use codeask_common::Notification;
use tokio::sync::oneshot;

use crate::collab::{DocumentSource, RenderSink};
use crate::store::TrackedFile;
use crate::view::RenderView;

#[derive(Default)]
pub struct MapDocuments {
    docs: RefCell<HashMap<String, String>>,
}

impl MapDocuments {
    pub fn set(&self, id: &str, text: &str) {
        self.docs.borrow_mut().insert(id.to_string(), text.to_string());
    }
}

impl DocumentSource for MapDocuments {
    fn resolve(&self, id: &str) -> Option<String> {
        self.docs.borrow().get(id).cloned()
    }
}

#[derive(Default)]
pub struct RecordingSink {
    renders: RefCell<Vec<RenderView>>,
    files: RefCell<Vec<Vec<TrackedFile>>>,
    notes: RefCell<Vec<Notification>>,
}

impl RecordingSink {
    pub fn renders(&self) -> Vec<RenderView> {
        self.renders.borrow().clone()
    }

    pub fn last_render(&self) -> Option<RenderView> {
        self.renders.borrow().last().cloned()
    }

    pub fn file_events(&self) -> Vec<Vec<TrackedFile>> {
        self.files.borrow().clone()
    }

    pub fn last_files(&self) -> Option<Vec<TrackedFile>> {
        self.files.borrow().last().cloned()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notes.borrow().clone()
    }
}

impl RenderSink for RecordingSink {
    fn render(&self, view: &RenderView) {
        self.renders.borrow_mut().push(view.clone());
    }

    fn files_changed(&self, files: &[TrackedFile]) {
        self.files.borrow_mut().push(files.to_vec());
    }

    fn notify(&self, notification: &Notification) {
        self.notes.borrow_mut().push(notification.clone());
    }
}

pub enum Reply {
    Now(Result<String, AiError>),
    Gated(oneshot::Receiver<Result<String, AiError>>),
}

/// Completion client that answers from a queue of scripted replies and
/// records every prompt it receives. An empty queue answers "ok".
#[derive(Default)]
pub struct FakeClient {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<AssembledPrompt>>,
}

impl FakeClient {
    pub fn answering(text: &str) -> Self {
        let client = Self::default();
        client.push(Reply::Now(Ok(text.to_string())));
        client
    }

    pub fn failing(error: AiError) -> Self {
        let client = Self::default();
        client.push(Reply::Now(Err(error)));
        client
    }

    pub fn push(&self, reply: Reply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Queue a reply that resolves when the returned sender fires.
    pub fn gate(&self) -> oneshot::Sender<Result<String, AiError>> {
        let (tx, rx) = oneshot::channel();
        self.push(Reply::Gated(rx));
        tx
    }

    pub fn prompts(&self) -> Vec<AssembledPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FakeClient {
    fn name(&self) -> &str {
        "fake"
    }

    async fn send(&self, prompt: &AssembledPrompt) -> Result<Completion, AiError> {
        let reply = {
            self.prompts.lock().unwrap().push(prompt.clone());
            self.replies.lock().unwrap().pop_front()
        };
        let outcome = match reply {
            None => Ok("ok".to_string()),
            Some(Reply::Now(outcome)) => outcome,
            Some(Reply::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(AiError::Network("gate dropped".into()))),
        };
        outcome.map(|content| Completion {
            content,
            usage: TokenUsage::default(),
        })
    }
}

/// Poll a future once, returning its output if it completed.
pub async fn poll_once<F: Future + Unpin>(fut: &mut F) -> Option<F::Output> {
    std::future::poll_fn(|cx| match Pin::new(&mut *fut).poll(cx) {
        Poll::Ready(out) => Poll::Ready(Some(out)),
        Poll::Pending => Poll::Ready(None),
    })
    .await
}
