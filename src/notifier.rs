//! User-facing notification surface.

use tracing::info;

/// Sink for short user-visible notices.
///
/// On a mobile host this is typically wired to a toast or snackbar; the bridge only ever
/// sends short, already-formatted text. Implementations must not block.
pub trait Notifier: Send + Sync {
    /// Shows `message` to the user.
    fn notify(&self, message: &str);
}

/// [`Notifier`] that routes notices to the log.
///
/// The default for hosts without a notification surface, and a reasonable fallback while the
/// embedding application is being wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        info!("{message}");
    }
}
