//! Store change feed backed by a `tokio::sync::broadcast` channel.
//!
//! Every committed write publishes one [`ChangeEvent`] carrying the
//! document before and after the write. Reactive consumers (the
//! notification triggers) subscribe independently; delivery to a consumer
//! that falls behind is lossy.

use tokio::sync::broadcast;

use ideaboard_core::types::{DocId, Timestamp};

use crate::document::Document;

// ---------------------------------------------------------------------------
// ChangeEvent
// ---------------------------------------------------------------------------

/// What a committed write did to its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
}

/// One committed write.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub collection: String,
    pub id: DocId,
    pub kind: ChangeKind,
    /// Document state before the write; `None` for creates.
    pub before: Option<Document>,
    /// Document state after the write; `None` for deletes.
    pub after: Option<Document>,
    /// When the write committed.
    pub timestamp: Timestamp,
}

impl ChangeEvent {
    pub fn created(collection: &str, doc: Document) -> Self {
        Self::new(collection, doc.id.clone(), ChangeKind::Created, None, Some(doc))
    }

    pub fn updated(collection: &str, before: Document, after: Document) -> Self {
        Self::new(
            collection,
            after.id.clone(),
            ChangeKind::Updated,
            Some(before),
            Some(after),
        )
    }

    pub fn deleted(collection: &str, before: Document) -> Self {
        Self::new(collection, before.id.clone(), ChangeKind::Deleted, Some(before), None)
    }

    fn new(
        collection: &str,
        id: DocId,
        kind: ChangeKind,
        before: Option<Document>,
        after: Option<Document>,
    ) -> Self {
        Self {
            collection: collection.to_string(),
            id,
            kind,
            before,
            after,
            timestamp: chrono::Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// ChangeFeed
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// Fan-out of committed writes.
///
/// When the buffer is full the oldest un-consumed events are dropped and
/// slow receivers observe `RecvError::Lagged`.
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    pub fn publish(&self, event: ChangeEvent) {
        // Ignore the SendError; it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
