pub mod errors;
pub mod id;
pub mod notifications;
pub mod types;

pub use errors::{CodeaskError, ConfigError};
pub use id::SessionId;
pub use notifications::{Notification, NotificationLevel};
pub use types::TrackingPolicy;

pub type Result<T> = std::result::Result<T, CodeaskError>;
