//! Shutdown coordination.
//!
//! A latched flag on a watch channel: a listener created after
//! [`Shutdown::trigger`] still sees the request, and dropping the
//! [`Shutdown`] releases every listener.

use tokio::sync::watch;

/// Owner of the stop flag.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

/// One waiter on the stop flag, handed to [`crate::MockServer::run`].
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener { rx: self.tx.subscribe() }
    }

    /// Ask every listener, present and future, to stop.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownListener {
    /// Resolve once shutdown is triggered or the coordinator is gone.
    pub async fn wait(mut self) {
        // Err means the sender was dropped; nobody is left to trigger.
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}
