//! Repository for the `ideas` collection.

use serde_json::Value;

use ideaboard_core::idea::{Idea, IdeaUpdate, NewIdea, Note};
use ideaboard_core::stage::Stage;
use ideaboard_core::types::DocId;

use crate::document::{collections::IDEAS, Document, Patch};
use crate::error::{StoreReadError, StoreWriteError};
use crate::live::{LiveQuery, Subscription};
use crate::store::SharedStore;

/// Field names of idea documents.
mod fields {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const SUBMITTER: &str = "submitter";
    pub const STAGE: &str = "stage";
    pub const CATEGORIES: &str = "categories";
    pub const BLOCKED: &str = "blocked";
    pub const BLOCKED_REASON: &str = "blockedReason";
    pub const NOTES: &str = "notes";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
}

/// Attempts a compare-and-set note write makes before giving up.
const MAX_CAS_ATTEMPTS: usize = 5;

/// How note additions and deletions reach the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoteWriteMode {
    /// Rewrite the whole `notes` array from the local cached snapshot.
    ///
    /// Two clients writing notes to the same idea from the same snapshot
    /// lose one of the writes: the last full-array overwrite wins.
    #[default]
    CachedSnapshot,
    /// Read the document fresh and write conditioned on its version,
    /// retrying on conflict. Concurrent note writes all survive.
    CompareAndSet,
}

fn decode_idea(doc: &Document) -> Result<Idea, StoreReadError> {
    doc.decode(IDEAS)
}

fn not_found(id: &str) -> StoreWriteError {
    StoreWriteError::NotFound {
        collection: IDEAS.to_string(),
        id: id.to_string(),
    }
}

/// Owns the live idea view and every idea mutation.
pub struct IdeaRepo {
    store: SharedStore,
    cache: LiveQuery,
    note_mode: NoteWriteMode,
}

impl IdeaRepo {
    /// Open the repository's live query; its snapshots become the cache.
    pub async fn connect(store: SharedStore) -> Result<Self, StoreReadError> {
        let cache = store.watch(IDEAS).await?;
        Ok(Self {
            store,
            cache,
            note_mode: NoteWriteMode::default(),
        })
    }

    pub fn with_note_mode(mut self, mode: NoteWriteMode) -> Self {
        self.note_mode = mode;
        self
    }

    pub fn note_mode(&self) -> NoteWriteMode {
        self.note_mode
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Open a standing subscription yielding every idea on open and after
    /// each change. Order within a snapshot is unspecified.
    pub async fn subscribe(&self) -> Result<Subscription<Idea>, StoreReadError> {
        Ok(self.store.watch(IDEAS).await?.typed(decode_idea))
    }

    /// All ideas in the cached snapshot.
    pub fn snapshot(&self) -> Result<Vec<Idea>, StoreReadError> {
        let docs = self.cache.latest()?;
        Ok(docs
            .iter()
            .filter_map(|doc| match decode_idea(doc) {
                Ok(idea) => Some(idea),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping undecodable idea");
                    None
                }
            })
            .collect())
    }

    /// One idea from the cached snapshot.
    pub fn find(&self, id: &str) -> Result<Option<Idea>, StoreReadError> {
        self.cache.find(id)?.as_ref().map(decode_idea).transpose()
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Store a new idea at stage `new`. Input is stored as given; checking
    /// for blank fields is the caller's job.
    pub async fn create(&self, input: &NewIdea) -> Result<DocId, StoreWriteError> {
        let patch = Patch::new()
            .set(fields::TITLE, input.title.as_str())
            .set(
                fields::DESCRIPTION,
                input.description.clone().unwrap_or_default(),
            )
            .set(fields::SUBMITTER, input.submitter.as_str())
            .set(fields::STAGE, Stage::New.as_str())
            .set_serialized(fields::CATEGORIES, &input.categories)?
            .set(fields::BLOCKED, false)
            .set(fields::BLOCKED_REASON, "")
            .set(fields::NOTES, Value::Array(Vec::new()))
            .server_timestamp(fields::CREATED_AT)
            .server_timestamp(fields::UPDATED_AT);

        let id = self.store.insert(IDEAS, patch).await?;
        tracing::info!(idea_id = %id, "Idea created");
        Ok(id)
    }

    /// Overwrite any of title, description and submitter.
    pub async fn update_details(&self, id: &str, update: &IdeaUpdate) -> Result<(), StoreWriteError> {
        let mut patch = Patch::new();
        if let Some(title) = &update.title {
            patch = patch.set(fields::TITLE, title.as_str());
        }
        if let Some(description) = &update.description {
            patch = patch.set(fields::DESCRIPTION, description.as_str());
        }
        if let Some(submitter) = &update.submitter {
            patch = patch.set(fields::SUBMITTER, submitter.as_str());
        }
        self.touch(id, patch).await
    }

    /// Set the stage unconditionally; any stage is reachable from any other.
    pub async fn move_stage(&self, id: &str, stage: Stage) -> Result<(), StoreWriteError> {
        self.touch(id, Patch::new().set(fields::STAGE, stage.as_str()))
            .await?;
        tracing::debug!(idea_id = %id, stage = %stage, "Idea moved");
        Ok(())
    }

    /// Write both block fields in one update, exactly as passed.
    pub async fn set_blocked(
        &self,
        id: &str,
        blocked: bool,
        reason: &str,
    ) -> Result<(), StoreWriteError> {
        self.touch(
            id,
            Patch::new()
                .set(fields::BLOCKED, blocked)
                .set(fields::BLOCKED_REASON, reason),
        )
        .await
    }

    /// Append a note with a fresh id and the current client time.
    pub async fn add_note(
        &self,
        id: &str,
        text: &str,
        author: &str,
    ) -> Result<Note, StoreWriteError> {
        let note = Note::new(text, author);
        let appended = note.clone();
        self.rewrite_notes(id, move |notes| notes.push(appended.clone()))
            .await?;
        tracing::debug!(idea_id = %id, note_id = %note.id, "Note added");
        Ok(note)
    }

    /// Remove every note whose id is `note_id`. Removing an absent note
    /// still rewrites the array.
    pub async fn delete_note(&self, id: &str, note_id: &str) -> Result<(), StoreWriteError> {
        self.rewrite_notes(id, |notes| notes.retain(|n| n.id != note_id))
            .await
    }

    /// Add a category id; applied as a set union inside the store.
    pub async fn add_category(&self, id: &str, category_id: &str) -> Result<(), StoreWriteError> {
        self.touch(
            id,
            Patch::new().array_union(fields::CATEGORIES, vec![Value::from(category_id)]),
        )
        .await
    }

    /// Remove a category id; applied as a set difference inside the store.
    pub async fn remove_category(
        &self,
        id: &str,
        category_id: &str,
    ) -> Result<(), StoreWriteError> {
        self.touch(
            id,
            Patch::new().array_remove(fields::CATEGORIES, vec![Value::from(category_id)]),
        )
        .await
    }

    /// Hard-delete an idea. Deleting an idea that is already gone succeeds.
    pub async fn delete(&self, id: &str) -> Result<(), StoreWriteError> {
        match self.store.delete(IDEAS, id).await {
            Ok(()) => {
                tracing::info!(idea_id = %id, "Idea deleted");
                Ok(())
            }
            Err(StoreWriteError::NotFound { .. }) => {
                tracing::debug!(idea_id = %id, "Idea already deleted");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Apply `patch` together with an `updatedAt` refresh.
    async fn touch(&self, id: &str, patch: Patch) -> Result<(), StoreWriteError> {
        self.store
            .update(IDEAS, id, patch.server_timestamp(fields::UPDATED_AT), None)
            .await?;
        Ok(())
    }

    async fn rewrite_notes<F>(&self, id: &str, edit: F) -> Result<(), StoreWriteError>
    where
        F: Fn(&mut Vec<Note>) + Send + Sync,
    {
        match self.note_mode {
            NoteWriteMode::CachedSnapshot => {
                let mut idea = self.find(id)?.ok_or_else(|| not_found(id))?;
                edit(&mut idea.notes);
                self.touch(id, Patch::new().set_serialized(fields::NOTES, &idea.notes)?)
                    .await
            }
            NoteWriteMode::CompareAndSet => self.rewrite_notes_cas(id, &edit).await,
        }
    }

    async fn rewrite_notes_cas<F>(&self, id: &str, edit: &F) -> Result<(), StoreWriteError>
    where
        F: Fn(&mut Vec<Note>) + Send + Sync,
    {
        let mut last_conflict = None;

        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let doc = self
                .store
                .get(IDEAS, id)
                .await?
                .ok_or_else(|| not_found(id))?;
            let mut idea = decode_idea(&doc)?;
            edit(&mut idea.notes);

            let patch = Patch::new()
                .set_serialized(fields::NOTES, &idea.notes)?
                .server_timestamp(fields::UPDATED_AT);

            match self.store.update(IDEAS, id, patch, Some(doc.version)).await {
                Ok(_) => return Ok(()),
                Err(e @ StoreWriteError::Conflict { .. }) => {
                    tracing::debug!(idea_id = %id, attempt, "Note write raced, retrying");
                    last_conflict = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::warn!(idea_id = %id, "Note write gave up after repeated conflicts");
        Err(last_conflict.unwrap_or_else(|| not_found(id)))
    }
}
