//! Configuration schema types for codeask.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod ai;
mod system;
mod tracking;

pub use ai::*;
pub use system::*;
pub use tracking::*;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeaskConfig {
    pub ai: AiConfig,
    pub tracking: TrackingConfig,
    pub logging: LoggingConfig,
}
