use std::sync::Arc;

use tokio::sync::watch;

use crate::models::Contact;

/// One immutable view of an owner's contact set, in subscription order.
pub type Snapshot = Arc<[Contact]>;

/// Live view of an owner's contacts.
///
/// Yields the full set again on every change. Ends (yields `None`)
/// when cancelled, when the repository closes, or when a newer
/// subscription replaces this one.
pub struct ContactFeed {
    rx: Option<watch::Receiver<Snapshot>>,
    last: Snapshot,
}

impl ContactFeed {
    pub(crate) fn new(rx: watch::Receiver<Snapshot>) -> Self {
        let last = rx.borrow().clone();
        Self { rx: Some(rx), last }
    }

    /// The most recently delivered snapshot. Stable after cancellation.
    pub fn snapshot(&self) -> Snapshot {
        match &self.rx {
            Some(rx) => rx.borrow().clone(),
            None => self.last.clone(),
        }
    }

    /// Wait for the next snapshot. Returns `None` once the feed has
    /// ended; never yields again after `cancel`.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        let rx = self.rx.as_mut()?;
        if rx.changed().await.is_err() {
            self.end();
            return None;
        }
        let snapshot = rx.borrow_and_update().clone();
        self.last = snapshot.clone();
        Some(snapshot)
    }

    /// Stop the feed. Idempotent; any in-flight notification is dropped
    /// rather than delivered.
    pub fn cancel(&mut self) {
        self.end();
    }

    pub fn is_live(&self) -> bool {
        self.rx.is_some()
    }

    fn end(&mut self) {
        if let Some(rx) = self.rx.take() {
            self.last = rx.borrow().clone();
        }
    }
}
