//! The tracked-file set and its selection flags.

use std::collections::HashSet;

use codeask_common::TrackingPolicy;
use serde::{Deserialize, Serialize};

/// One tracked file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedFile {
    pub id: String,
    pub selected: bool,
}

impl TrackedFile {
    pub fn new(id: impl Into<String>, selected: bool) -> Self {
        Self {
            id: id.into(),
            selected,
        }
    }
}

/// Result of a manual toggle-track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackChange {
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("{operation} is not available under the {policy_name} tracking policy", policy_name = .policy.as_str())]
    PolicyMismatch {
        operation: &'static str,
        policy: TrackingPolicy,
    },
}

/// Ordered set of tracked files, unique by id, in insertion order.
///
/// Ids that are not tracked are ignored by every selection operation.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    policy: TrackingPolicy,
    files: Vec<TrackedFile>,
}

impl SelectionStore {
    pub fn new(policy: TrackingPolicy) -> Self {
        Self {
            policy,
            files: Vec::new(),
        }
    }

    pub fn policy(&self) -> TrackingPolicy {
        self.policy
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.files.iter().position(|f| f.id == id)
    }

    fn require(&self, policy: TrackingPolicy, operation: &'static str) -> Result<(), SelectionError> {
        if self.policy == policy {
            Ok(())
        } else {
            Err(SelectionError::PolicyMismatch {
                operation,
                policy: self.policy,
            })
        }
    }

    /// Flip one file's flag. Returns `false` when the id is not tracked.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.position(id) {
            Some(i) => {
                self.files[i].selected = !self.files[i].selected;
                true
            }
            None => false,
        }
    }

    /// Make the selection exactly `ids ∩ tracked`. Returns whether any flag changed.
    pub fn set_selected<I, S>(&mut self, ids: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let wanted: HashSet<String> = ids.into_iter().map(|s| s.as_ref().to_string()).collect();
        let mut changed = false;
        for file in &mut self.files {
            let selected = wanted.contains(&file.id);
            if file.selected != selected {
                file.selected = selected;
                changed = true;
            }
        }
        changed
    }

    /// Track a file, unselected. Returns `false` if it was already tracked.
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.position(&id).is_some() {
            return false;
        }
        self.files.push(TrackedFile::new(id, false));
        true
    }

    /// Manual policy: add the file selected, or remove it if already tracked.
    pub fn toggle_tracked(&mut self, id: impl Into<String>) -> Result<TrackChange, SelectionError> {
        self.require(TrackingPolicy::Manual, "toggle_tracked")?;
        let id = id.into();
        match self.position(&id) {
            Some(i) => {
                self.files.remove(i);
                Ok(TrackChange::Removed)
            }
            None => {
                self.files.push(TrackedFile::new(id, true));
                Ok(TrackChange::Added)
            }
        }
    }

    /// Manual policy: stop tracking a file. Returns `false` if it was not tracked.
    pub fn untrack(&mut self, id: &str) -> Result<bool, SelectionError> {
        self.require(TrackingPolicy::Manual, "untrack")?;
        Ok(match self.position(id) {
            Some(i) => {
                self.files.remove(i);
                true
            }
            None => false,
        })
    }

    /// Workspace policy: discard every tracked file and track `ids`,
    /// unselected, in the given order. Repeated ids collapse to one.
    pub fn replace_all<I, S>(&mut self, ids: I) -> Result<(), SelectionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.require(TrackingPolicy::Workspace, "replace_all")?;
        let mut seen = HashSet::new();
        self.files = ids
            .into_iter()
            .map(Into::<String>::into)
            .filter(|id| seen.insert(id.clone()))
            .map(|id| TrackedFile::new(id, false))
            .collect();
        Ok(())
    }

    /// Unselect everything; files stay tracked. Returns whether any flag changed.
    pub fn clear_selection(&mut self) -> bool {
        let mut changed = false;
        for file in &mut self.files {
            changed |= file.selected;
            file.selected = false;
        }
        changed
    }

    pub fn snapshot(&self) -> Vec<TrackedFile> {
        self.files.clone()
    }

    /// Only the selected files, in order.
    pub fn selected_snapshot(&self) -> Vec<TrackedFile> {
        self.files.iter().filter(|f| f.selected).cloned().collect()
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.files
            .iter()
            .filter(|f| f.selected)
            .map(|f| f.id.clone())
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new(TrackingPolicy::default())
    }
}
