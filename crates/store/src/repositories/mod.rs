//! Repositories over the board's collections.
//!
//! [`IdeaRepo`] is stateful: it holds its own live query, whose latest
//! snapshot is the local cache its read-modify-write operations work from.
//! The category and bug report repositories are stateless and take the
//! store per call.

mod bug_report_repo;
mod category_repo;
mod idea_repo;

pub use bug_report_repo::BugReportRepo;
pub use category_repo::CategoryRepo;
pub use idea_repo::{IdeaRepo, NoteWriteMode};
