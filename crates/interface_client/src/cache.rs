//! Server-mirrored slices
//!
//! A [`SliceCache`] holds the last collection a fetch returned. It is only
//! ever replaced wholesale; readers get cheap `Arc` snapshots or subscribe
//! to replacements.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared snapshot of one collection
pub type Snapshot<T> = Arc<Vec<T>>;

/// Watch-backed cache of one server collection
#[derive(Debug)]
pub struct SliceCache<T> {
    tx: Arc<watch::Sender<Snapshot<T>>>,
}

impl<T> Clone for SliceCache<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T> Default for SliceCache<T> {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Vec::new()));
        Self { tx: Arc::new(tx) }
    }
}

impl<T> SliceCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current collection
    pub fn snapshot(&self) -> Snapshot<T> {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every replacement
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.tx.subscribe()
    }

    /// Replaces the whole collection
    pub(crate) fn replace(&self, items: Vec<T>) -> Snapshot<T> {
        let snapshot = Arc::new(items);
        self.tx.send_replace(snapshot.clone());
        snapshot
    }
}
