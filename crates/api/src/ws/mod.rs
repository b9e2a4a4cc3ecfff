//! WebSocket infrastructure for live board snapshots.
//!
//! Provides connection management, heartbeat monitoring, and the HTTP
//! upgrade handlers used by Axum routes.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::{categories_ws_handler, ideas_ws_handler, SnapshotFrame};
pub use heartbeat::start_heartbeat;
pub use manager::{LiveChannel, WsManager};
