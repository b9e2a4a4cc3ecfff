use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::ws::manager::{LiveChannel, WsManager};

/// Interval between heartbeat pings (in seconds).
const HEARTBEAT_INTERVAL_SECS: u64 = 30;

/// Spawn a background task that pings every live board connection.
///
/// The first ping goes out immediately. The task ends when `cancel` fires.
pub fn start_heartbeat(
    ws_manager: Arc<WsManager>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    let ideas = ws_manager.count_for(LiveChannel::Ideas).await;
                    let categories = ws_manager.count_for(LiveChannel::Categories).await;
                    tracing::debug!(ideas, categories, "Pinging live board connections");
                    ws_manager.ping_all().await;
                }
            }
        }
        tracing::debug!("Heartbeat stopped");
    })
}
