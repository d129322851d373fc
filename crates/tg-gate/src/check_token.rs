use tokio::sync::watch;

/// Cancellation handle for one in-flight access check.
///
/// Clones share the same signal. Cancelling is idempotent.
#[derive(Clone, Debug)]
pub struct CheckToken {
    cancel_tx: watch::Sender<bool>,
}

impl CheckToken {
    pub fn new() -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self { cancel_tx }
    }

    pub fn cancel(&self) {
        self.cancel_tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel_tx.borrow()
    }

    /// Resolves once `cancel` has been called on any clone.
    pub async fn cancelled(&self) {
        let mut cancel_rx = self.cancel_tx.subscribe();
        // The sender lives in self, so the channel cannot close while we wait
        let _ = cancel_rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CheckToken {
    fn default() -> Self {
        Self::new()
    }
}
