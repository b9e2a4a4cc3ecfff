//! Live queries: full collection snapshots pushed after every commit.
//!
//! A [`LiveQuery`] is the raw, untyped view a store hands out. Repositories
//! wrap it in a [`Subscription`], a typed [`Stream`] that yields the current
//! snapshot first and then one snapshot per delivered change. Snapshots are
//! latest-value: a slow reader sees the newest state, not every step.
//! Dropping either handle unsubscribes.

use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::document::Document;
use crate::error::StoreReadError;

/// What a live query delivers: every document in the collection, or the
/// persistent error the query is stuck in.
pub type Snapshot = Result<Arc<Vec<Document>>, StoreReadError>;

/// Decoder from a stored document to a record type.
pub type Decoder<T> = fn(&Document) -> Result<T, StoreReadError>;

// ---------------------------------------------------------------------------
// LiveQuery
// ---------------------------------------------------------------------------

/// Untyped live query over one collection.
#[derive(Debug, Clone)]
pub struct LiveQuery {
    collection: String,
    receiver: watch::Receiver<Snapshot>,
}

impl LiveQuery {
    pub fn new(collection: impl Into<String>, receiver: watch::Receiver<Snapshot>) -> Self {
        Self {
            collection: collection.into(),
            receiver,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The most recently delivered snapshot, without waiting.
    pub fn latest(&self) -> Snapshot {
        self.receiver.borrow().clone()
    }

    /// The document with `id` in the latest snapshot.
    pub fn find(&self, id: &str) -> Result<Option<Document>, StoreReadError> {
        Ok(self.latest()?.iter().find(|d| d.id == id).cloned())
    }

    /// Wait for the next delivery after the last one observed here.
    pub async fn changed(&mut self) -> Snapshot {
        if self.receiver.changed().await.is_err() {
            return Err(StoreReadError::Closed {
                collection: self.collection.clone(),
            });
        }
        self.receiver.borrow_and_update().clone()
    }

    /// Turn into a typed stream of decoded snapshots.
    pub fn typed<T>(self, decode: Decoder<T>) -> Subscription<T> {
        Subscription {
            collection: self.collection,
            inner: WatchStream::new(self.receiver),
            decode,
            _marker: PhantomData,
        }
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// Typed live query. Yields `Ok(records)` per snapshot and `Err` while the
/// query is in an error state; ends only when the store goes away.
///
/// Documents that fail to decode are left out of the snapshot and logged.
pub struct Subscription<T> {
    collection: String,
    inner: WatchStream<Snapshot>,
    decode: Decoder<T>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Subscription<T> {
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Release the underlying query.
    pub fn unsubscribe(self) {
        tracing::debug!(collection = %self.collection, "Live query released");
    }

    fn decode_all(&self, docs: &[Document]) -> Vec<T> {
        docs.iter()
            .filter_map(|doc| match (self.decode)(doc) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping undecodable document");
                    None
                }
            })
            .collect()
    }
}

impl<T> Stream for Subscription<T> {
    type Item = Result<Vec<T>, StoreReadError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(snapshot)) => {
                Poll::Ready(Some(snapshot.map(|docs| this.decode_all(&docs))))
            }
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }
}
