//! Document store contract, the in-process store, and the repositories
//! that read and mutate board state through it.
//!
//! - [`DocumentStore`]: collection store with point writes, atomic array
//!   union/remove, live queries and a change feed.
//! - [`MemoryStore`]: in-process implementation of that contract.
//! - [`repositories`]: idea, category and bug report operations.

pub mod document;
pub mod error;
pub mod feed;
pub mod live;
pub mod memory;
pub mod repositories;
pub mod store;

pub use document::{collections, Document, FieldValue, Patch};
pub use error::{StoreReadError, StoreWriteError};
pub use feed::{ChangeEvent, ChangeFeed, ChangeKind};
pub use live::{LiveQuery, Snapshot, Subscription};
pub use memory::MemoryStore;
pub use store::{DocumentStore, SharedStore};
