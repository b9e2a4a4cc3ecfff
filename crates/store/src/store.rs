//! The document store contract.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use ideaboard_core::types::DocId;

use crate::document::{Document, Patch};
use crate::error::{StoreReadError, StoreWriteError};
use crate::feed::ChangeEvent;
use crate::live::LiveQuery;

/// Shared handle to a document store.
pub type SharedStore = Arc<dyn DocumentStore>;

/// A collection store with point writes, atomic array union/removal, live
/// queries and a change feed.
///
/// Writes to one document apply in the order the store receives them and
/// the last write wins per field. [`Patch`] array operations run inside the
/// write, so concurrent unions or removals on the same array never lose
/// each other. Everything else, whole-array overwrites included, is
/// last-write-wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document under a generated id.
    async fn insert(&self, collection: &str, fields: Patch) -> Result<DocId, StoreWriteError>;

    /// Create a document under `id` unless one already exists.
    ///
    /// Returns `false`, leaving the existing document untouched, when the id
    /// is taken.
    async fn insert_with_id(
        &self,
        collection: &str,
        id: &str,
        fields: Patch,
    ) -> Result<bool, StoreWriteError>;

    /// Apply `patch` to an existing document and return its new version.
    ///
    /// With `expected_version` set the write only commits if the document is
    /// still at that version, failing with [`StoreWriteError::Conflict`]
    /// otherwise.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: Patch,
        expected_version: Option<u64>,
    ) -> Result<u64, StoreWriteError>;

    /// Hard-delete a document. Fails with [`StoreWriteError::NotFound`] if
    /// there is nothing to delete.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreWriteError>;

    /// Read one document once.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreReadError>;

    /// Read a whole collection once.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreReadError>;

    /// Open a live query over a collection.
    async fn watch(&self, collection: &str) -> Result<LiveQuery, StoreReadError>;

    /// Subscribe to the feed of committed writes.
    fn changes(&self) -> broadcast::Receiver<ChangeEvent>;
}
