//! External collaborators the session core talks to.

use codeask_common::Notification;

use crate::store::TrackedFile;
use crate::view::RenderView;

/// Resolves a file id to its current full text.
///
/// `None` means unresolved (not open, unreadable, too large); the file is
/// left out of the submission.
pub trait DocumentSource {
    fn resolve(&self, id: &str) -> Option<String>;
}

/// The surface of one open session.
pub trait RenderSink {
    /// Replace the session's view.
    fn render(&self, view: &RenderView);

    /// The shared tracked set changed.
    fn files_changed(&self, files: &[TrackedFile]);

    /// Show a host notification.
    fn notify(&self, notification: &Notification);
}
