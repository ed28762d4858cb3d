//! Resolves file ids to their text on disk.

use std::fs;
use std::path::{Path, PathBuf};

use codeask_session::DocumentSource;
use tracing::debug;

/// Reads files relative to a workspace root.
///
/// A file is unresolved when it is missing, not a regular file, larger than
/// `max_bytes`, or not valid UTF-8.
pub struct FsDocumentSource {
    root: PathBuf,
    max_bytes: u64,
}

impl FsDocumentSource {
    pub fn new(root: impl AsRef<Path>, max_bytes: u64) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            max_bytes,
        }
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        let path = Path::new(id);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl DocumentSource for FsDocumentSource {
    fn resolve(&self, id: &str) -> Option<String> {
        let path = self.path_for(id);
        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(e) => {
                debug!(id, error = %e, "document not readable");
                return None;
            }
        };
        if !meta.is_file() {
            debug!(id, "document is not a regular file");
            return None;
        }
        if meta.len() > self.max_bytes {
            debug!(id, bytes = meta.len(), max = self.max_bytes, "document too large");
            return None;
        }

        match fs::read(&path).map(String::from_utf8) {
            Ok(Ok(text)) => Some(text),
            Ok(Err(_)) => {
                debug!(id, "document is not UTF-8");
                None
            }
            Err(e) => {
                debug!(id, error = %e, "document read failed");
                None
            }
        }
    }
}
