/// Document identifiers are opaque strings assigned by the store.
pub type DocId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh unique identifier for a document or embedded record.
pub fn generate_id() -> DocId {
    uuid::Uuid::new_v4().to_string()
}
