//! Domain types and rules for the idea board.
//!
//! Everything here is storage-agnostic: the document store, repositories
//! and notification triggers build on these types.

pub mod board;
pub mod bug_report;
pub mod category;
pub mod error;
pub mod idea;
pub mod session;
pub mod stage;
pub mod types;
