//! Idea and note records plus the input checks applied at the edge.
//!
//! The repositories store whatever they are handed; callers that accept
//! user input (the HTTP layer) run the `validate_*` helpers first.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::stage::Stage;
use crate::types::{generate_id, DocId, Timestamp};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A timestamped annotation embedded in an idea's `notes` array.
///
/// Only `id` is required; older notes may carry `createdAt` instead of
/// `date`, or omit fields entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: DocId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author: String,
    /// Client-local RFC 3339 timestamp taken when the note was written.
    #[serde(default, alias = "createdAt")]
    pub date: String,
}

impl Note {
    /// Build a note with a fresh id and the current time.
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            text: text.into(),
            author: author.into(),
            date: chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// A document from the `ideas` collection.
///
/// Every field except `id` tolerates absence so that older or partially
/// written documents still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Idea {
    pub id: DocId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub submitter: String,
    #[serde(default)]
    pub stage: Stage,
    /// Category ids. May contain ids of categories that no longer exist.
    #[serde(default)]
    pub categories: Vec<DocId>,
    #[serde(default)]
    pub blocked: bool,
    /// Meaningful only while `blocked` is true.
    #[serde(default)]
    pub blocked_reason: String,
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl Idea {
    /// Look up an embedded note by id.
    pub fn note(&self, note_id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == note_id)
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Input for submitting a new idea.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewIdea {
    pub title: String,
    pub description: Option<String>,
    pub submitter: String,
    #[serde(default)]
    pub categories: Vec<DocId>,
}

/// Partial edit of an idea's descriptive fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdeaUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub submitter: Option<String>,
}

impl IdeaUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.submitter.is_none()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn require_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// A submission needs a non-blank title and submitter.
pub fn validate_new_idea(input: &NewIdea) -> Result<(), CoreError> {
    require_text("title", &input.title)?;
    require_text("submitter", &input.submitter)
}

/// An edit must change something, and may not blank out required fields.
pub fn validate_update(update: &IdeaUpdate) -> Result<(), CoreError> {
    if update.is_empty() {
        return Err(CoreError::Validation("No fields to update".into()));
    }
    if let Some(title) = &update.title {
        require_text("title", title)?;
    }
    if let Some(submitter) = &update.submitter {
        require_text("submitter", submitter)?;
    }
    Ok(())
}

/// Both the note text and its author are required.
pub fn validate_note(text: &str, author: &str) -> Result<(), CoreError> {
    require_text("text", text)?;
    require_text("author", author)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
