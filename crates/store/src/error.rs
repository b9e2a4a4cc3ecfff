use ideaboard_core::types::DocId;

/// Failure committing a mutation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreWriteError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: DocId },

    /// The document changed since the version the caller read.
    #[error("Version conflict on {collection}/{id}: expected {expected}, found {actual}")]
    Conflict {
        collection: String,
        id: DocId,
        expected: u64,
        actual: u64,
    },

    /// Permission or transport failure.
    #[error("Write rejected: {0}")]
    Rejected(String),

    #[error("Failed to encode field value: {0}")]
    Encode(String),

    /// The state a read-modify-write depends on could not be read.
    #[error("Cannot read current state: {0}")]
    Read(#[from] StoreReadError),
}

/// Failure establishing or maintaining a read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreReadError {
    #[error("Live query on {collection} failed: {reason}")]
    Unavailable { collection: String, reason: String },

    #[error("Failed to decode {collection}/{id}: {reason}")]
    Decode {
        collection: String,
        id: DocId,
        reason: String,
    },

    #[error("Live query on {collection} closed")]
    Closed { collection: String },
}
