//! File tracking configuration.

use std::path::PathBuf;

use codeask_common::TrackingPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    pub policy: TrackingPolicy,
    /// Root that relative file ids resolve against. Unset means the
    /// current directory.
    pub workspace_root: Option<PathBuf>,
    /// Files larger than this are treated as unresolved (valid range: 1-67108864).
    pub max_file_bytes: u64,
    /// Include hidden files in workspace scans.
    pub include_hidden: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            policy: TrackingPolicy::Manual,
            workspace_root: None,
            max_file_bytes: 1024 * 1024,
            include_hidden: false,
        }
    }
}
