//! Shared selection state and the registry of open sessions.
//!
//! The hub is single-threaded: the store lives in a `RefCell` and every
//! borrow ends before control returns to the caller, so no borrow spans an
//! await in a session's submission.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use codeask_ai::CompletionClient;
use codeask_common::{SessionId, TrackingPolicy};
use tracing::{debug, info, warn};

use crate::collab::{DocumentSource, RenderSink};
use crate::controller::SessionController;
use crate::store::{SelectionError, SelectionStore, TrackChange, TrackedFile};

pub struct SessionHub {
    store: RefCell<SelectionStore>,
    /// Open sessions in the order they were opened.
    sinks: RefCell<Vec<(SessionId, Rc<dyn RenderSink>)>>,
}

impl SessionHub {
    pub fn new(policy: TrackingPolicy) -> Rc<Self> {
        Self::from_store(SelectionStore::new(policy))
    }

    pub fn from_store(store: SelectionStore) -> Rc<Self> {
        Rc::new(Self {
            store: RefCell::new(store),
            sinks: RefCell::new(Vec::new()),
        })
    }

    // =========================================================================
    // SESSIONS
    // =========================================================================

    /// Register a surface and return its controller.
    pub fn open_session(
        self: &Rc<Self>,
        id: SessionId,
        sink: Rc<dyn RenderSink>,
        documents: Rc<dyn DocumentSource>,
        client: Arc<dyn CompletionClient>,
    ) -> Rc<SessionController> {
        {
            let mut sinks = self.sinks.borrow_mut();
            if let Some(entry) = sinks.iter_mut().find(|(sid, _)| *sid == id) {
                warn!(session = %id, "session reopened, replacing its surface");
                entry.1 = Rc::clone(&sink);
            } else {
                sinks.push((id.clone(), Rc::clone(&sink)));
            }
        }
        info!(session = %id, sessions = self.session_count(), "session opened");
        Rc::new(SessionController::new(
            id,
            Rc::clone(self),
            sink,
            documents,
            client,
        ))
    }

    pub fn close_session(&self, id: &SessionId) -> bool {
        let mut sinks = self.sinks.borrow_mut();
        let before = sinks.len();
        sinks.retain(|(sid, _)| sid != id);
        let removed = sinks.len() != before;
        if removed {
            info!(session = %id, "session closed");
        }
        removed
    }

    pub fn session_count(&self) -> usize {
        self.sinks.borrow().len()
    }

    pub fn is_open(&self, id: &SessionId) -> bool {
        self.sinks.borrow().iter().any(|(sid, _)| sid == id)
    }

    // =========================================================================
    // STORE ACCESS
    // =========================================================================

    pub fn with_store<R>(&self, f: impl FnOnce(&SelectionStore) -> R) -> R {
        f(&self.store.borrow())
    }

    pub fn snapshot(&self) -> Vec<TrackedFile> {
        self.store.borrow().snapshot()
    }

    pub fn policy(&self) -> TrackingPolicy {
        self.store.borrow().policy()
    }

    /// Run a mutation and broadcast when it reports a change.
    fn mutate(&self, f: impl FnOnce(&mut SelectionStore) -> bool) -> bool {
        let changed = f(&mut self.store.borrow_mut());
        if changed {
            self.broadcast_files_changed();
        }
        changed
    }

    /// Send the current tracked set to every open session.
    pub fn broadcast_files_changed(&self) {
        let files = self.snapshot();
        let sinks: Vec<Rc<dyn RenderSink>> =
            self.sinks.borrow().iter().map(|(_, s)| Rc::clone(s)).collect();
        debug!(files = files.len(), sessions = sinks.len(), "broadcasting files changed");
        for sink in sinks {
            sink.files_changed(&files);
        }
    }

    // =========================================================================
    // SELECTION (session-mediated)
    // =========================================================================

    pub(crate) fn toggle(&self, id: &str) -> bool {
        self.mutate(|store| store.toggle(id))
    }

    pub(crate) fn set_selected(&self, ids: &[String]) -> bool {
        self.mutate(|store| store.set_selected(ids))
    }

    // =========================================================================
    // HOST COMMANDS
    // =========================================================================

    /// Add the active document, or remove it if already tracked (manual policy).
    pub fn track_active(&self, id: &str) -> Result<TrackChange, SelectionError> {
        let change = self.store.borrow_mut().toggle_tracked(id)?;
        debug!(id, ?change, "active document toggled");
        self.broadcast_files_changed();
        Ok(change)
    }

    pub fn add_file(&self, id: &str) -> bool {
        self.mutate(|store| store.add(id))
    }

    pub fn untrack(&self, id: &str) -> Result<bool, SelectionError> {
        let removed = self.store.borrow_mut().untrack(id)?;
        if removed {
            self.broadcast_files_changed();
        }
        Ok(removed)
    }

    /// Repopulate the tracked set from a workspace enumeration (workspace policy).
    pub fn replace_workspace(&self, ids: Vec<String>) -> Result<(), SelectionError> {
        let count = ids.len();
        self.store.borrow_mut().replace_all(ids)?;
        info!(files = count, "workspace files enumerated");
        self.broadcast_files_changed();
        Ok(())
    }

    pub fn clear_selection(&self) -> bool {
        self.mutate(|store| store.clear_selection())
    }

    /// Re-send the tracked set to every session without changing it.
    pub fn refresh_all(&self) {
        self.broadcast_files_changed();
    }
}
