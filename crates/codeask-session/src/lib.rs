//! Session core for codeask.
//!
//! - `SelectionStore`: the process-wide tracked-file set and selection flags
//! - `protocol`: inbound UI messages and outbound render/refresh messages
//! - `SessionHub`: shared store plus the registry of open sessions
//! - `SessionController`: per-session state machine that routes UI events
//!   to the store and runs submissions through the assembler and client

pub mod collab;
pub mod controller;
pub mod hub;
pub mod protocol;
pub mod store;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use collab::{DocumentSource, RenderSink};
pub use controller::{SessionController, SessionPhase, SubmitOutcome};
pub use hub::SessionHub;
pub use protocol::{InboundMessage, OutboundMessage, ProtocolError};
pub use store::{SelectionError, SelectionStore, TrackChange, TrackedFile};
pub use view::{RenderView, ResponseView};
