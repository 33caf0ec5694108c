//! User-facing error surface
//!
//! The catalog's façade never returns errors; it hands them to a
//! `Notifier`, which a desktop shell renders as a message box and a CLI
//! prints to stderr.

use tracing::error;

/// Receives one call per user-visible error
pub trait Notifier: Send + Sync {
    fn notify_error(&self, title: &str, message: &str);
}

/// Notifier that reports through the tracing subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_error(&self, title: &str, message: &str) {
        error!("{}: {}", title, message);
    }
}
