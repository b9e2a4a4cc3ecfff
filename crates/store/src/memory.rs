//! In-process document store.
//!
//! [`MemoryStore`] keeps every collection in memory behind one lock, so
//! each write (array operations included) is applied atomically and in
//! arrival order. Each collection owns a `watch` channel holding its latest
//! snapshot; the change feed sees every commit.
//!
//! Live-query delivery and write acknowledgement are separate: while
//! delivery is paused, writes keep committing and acknowledging but live
//! queries keep showing the last snapshot delivered before the pause.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{broadcast, watch, RwLock};

use ideaboard_core::types::{generate_id, DocId, Timestamp};

use crate::document::{Document, Fields, Patch};
use crate::error::{StoreReadError, StoreWriteError};
use crate::feed::{ChangeEvent, ChangeFeed};
use crate::live::{LiveQuery, Snapshot};
use crate::store::DocumentStore;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

struct CollectionState {
    docs: BTreeMap<DocId, Document>,
    live: watch::Sender<Snapshot>,
    /// Persistent live-query failure, if one was injected.
    failure: Option<StoreReadError>,
}

impl CollectionState {
    fn new() -> Self {
        let (live, _) = watch::channel(Ok(Arc::new(Vec::new())));
        Self {
            docs: BTreeMap::new(),
            live,
            failure: None,
        }
    }

    fn deliver(&self) {
        let snapshot = match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(Arc::new(self.docs.values().cloned().collect())),
        };
        // send_replace stores the value even when nobody is watching yet.
        let _ = self.live.send_replace(snapshot);
    }
}

#[derive(Default)]
struct State {
    collections: HashMap<String, CollectionState>,
    /// Last timestamp handed out; server timestamps strictly increase.
    clock: Option<Timestamp>,
    reject_writes: Option<String>,
    delivery_paused: bool,
}

impl State {
    fn collection(&mut self, name: &str) -> &mut CollectionState {
        self.collections
            .entry(name.to_string())
            .or_insert_with(CollectionState::new)
    }

    fn check_writable(&self) -> Result<(), StoreWriteError> {
        match &self.reject_writes {
            Some(reason) => Err(StoreWriteError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }

    fn server_now(&mut self) -> Value {
        let now = chrono::Utc::now();
        let now = match self.clock {
            Some(last) if last >= now => last + chrono::Duration::microseconds(1),
            _ => now,
        };
        self.clock = Some(now);
        // A DateTime<Utc> always serializes.
        serde_json::to_value(now).unwrap_or(Value::Null)
    }

    fn deliver(&self, collection: &str) {
        if self.delivery_paused {
            return;
        }
        if let Some(state) = self.collections.get(collection) {
            state.deliver();
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Document store held entirely in process memory.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    feed: ChangeFeed,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail with [`StoreWriteError::Rejected`] until called
    /// again with `None`.
    pub async fn reject_writes(&self, reason: Option<String>) {
        self.state.write().await.reject_writes = reason;
    }

    /// Hold live-query deliveries. Writes still commit and acknowledge.
    pub async fn pause_delivery(&self) {
        self.state.write().await.delivery_paused = true;
    }

    /// Resume deliveries, pushing the current state of every collection.
    pub async fn resume_delivery(&self) {
        let mut state = self.state.write().await;
        state.delivery_paused = false;
        for collection in state.collections.values() {
            collection.deliver();
        }
    }

    /// Put every live query on `collection` into a persistent error state.
    pub async fn fail_live_queries(&self, collection: &str, reason: impl Into<String>) {
        let mut state = self.state.write().await;
        let target = state.collection(collection);
        target.failure = Some(StoreReadError::Unavailable {
            collection: collection.to_string(),
            reason: reason.into(),
        });
        target.deliver();
    }

    fn create(
        &self,
        state: &mut State,
        collection: &str,
        id: DocId,
        fields: &Patch,
    ) -> Document {
        let now = state.server_now();
        let mut data = Fields::new();
        fields.apply(&mut data, &now);
        let doc = Document {
            id: id.clone(),
            version: 1,
            data,
        };
        state.collection(collection).docs.insert(id, doc.clone());
        state.deliver(collection);
        self.feed.publish(ChangeEvent::created(collection, doc.clone()));
        doc
    }
}

fn not_found(collection: &str, id: &str) -> StoreWriteError {
    StoreWriteError::NotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, fields: Patch) -> Result<DocId, StoreWriteError> {
        let mut state = self.state.write().await;
        state.check_writable()?;
        let doc = self.create(&mut state, collection, generate_id(), &fields);
        Ok(doc.id)
    }

    async fn insert_with_id(
        &self,
        collection: &str,
        id: &str,
        fields: Patch,
    ) -> Result<bool, StoreWriteError> {
        let mut state = self.state.write().await;
        state.check_writable()?;
        if state.collection(collection).docs.contains_key(id) {
            return Ok(false);
        }
        self.create(&mut state, collection, id.to_string(), &fields);
        Ok(true)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Patch,
        expected_version: Option<u64>,
    ) -> Result<u64, StoreWriteError> {
        let mut state = self.state.write().await;
        state.check_writable()?;
        let now = state.server_now();

        let doc = state
            .collection(collection)
            .docs
            .get_mut(id)
            .ok_or_else(|| not_found(collection, id))?;

        if let Some(expected) = expected_version {
            if doc.version != expected {
                return Err(StoreWriteError::Conflict {
                    collection: collection.to_string(),
                    id: id.to_string(),
                    expected,
                    actual: doc.version,
                });
            }
        }

        let before = doc.clone();
        patch.apply(&mut doc.data, &now);
        doc.version += 1;
        let after = doc.clone();

        state.deliver(collection);
        self.feed
            .publish(ChangeEvent::updated(collection, before, after.clone()));
        Ok(after.version)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreWriteError> {
        let mut state = self.state.write().await;
        state.check_writable()?;
        let before = state
            .collection(collection)
            .docs
            .remove(id)
            .ok_or_else(|| not_found(collection, id))?;

        state.deliver(collection);
        self.feed.publish(ChangeEvent::deleted(collection, before));
        Ok(())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreReadError> {
        let state = self.state.read().await;
        Ok(state
            .collections
            .get(collection)
            .and_then(|c| c.docs.get(id))
            .cloned())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreReadError> {
        let state = self.state.read().await;
        Ok(state
            .collections
            .get(collection)
            .map(|c| c.docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn watch(&self, collection: &str) -> Result<LiveQuery, StoreReadError> {
        let mut state = self.state.write().await;
        let receiver = state.collection(collection).live.subscribe();
        Ok(LiveQuery::new(collection, receiver))
    }

    fn changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.feed.subscribe()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
