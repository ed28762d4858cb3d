//! Workspace enumeration for the workspace tracking policy.

use std::path::{Component, Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{info, warn};

/// Lists the files under a root as root-relative ids (`/`-separated),
/// honouring `.gitignore` and friends.
pub struct WorkspaceScanner {
    root: PathBuf,
    include_hidden: bool,
}

impl WorkspaceScanner {
    pub fn new(root: impl AsRef<Path>, include_hidden: bool) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            include_hidden,
        }
    }

    /// Sorted ids of every regular file in the workspace.
    pub fn scan(&self) -> Vec<String> {
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(!self.include_hidden)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .require_git(false);

        let mut ids = Vec::new();
        for result in builder.build() {
            match result {
                Ok(entry) => {
                    if !entry.file_type().is_some_and(|t| t.is_file()) {
                        continue;
                    }
                    if let Some(id) = self.relative_id(entry.path()) {
                        ids.push(id);
                    }
                }
                Err(e) => warn!("Failed to read entry: {e}"),
            }
        }
        ids.sort();

        info!(root = %self.root.display(), files = ids.len(), "workspace scanned");
        ids
    }

    fn relative_id(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<_> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("/"))
        }
    }
}
