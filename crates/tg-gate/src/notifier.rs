/// Transient user-facing notification (toast).
///
/// Only unexpected failures are reported here.
pub trait Notifier: Send + Sync {
    fn notify_error(&self, message: &str);
}

/// Notifier for headless use: writes the notification to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify_error(&self, message: &str) {
        log::error!("{message}");
    }
}
