use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use serde::Serialize;

use ideaboard_store::repositories::CategoryRepo;
use ideaboard_store::Subscription;

use crate::error::AppResult;
use crate::state::AppState;
use crate::ws::manager::{LiveChannel, WsManager};

/// A JSON text frame pushed to live-query clients.
///
/// ```text
/// {"type":"snapshot","data":[...]}   full collection, after every change
/// {"type":"error","error":"..."}     the live query is failing
/// ```
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SnapshotFrame<T> {
    Snapshot { data: Vec<T> },
    Error { error: String },
}

/// GET /ws/ideas -- upgrade and stream idea snapshots.
///
/// The live query is opened before the upgrade so a failing store is
/// reported as a normal HTTP error.
pub async fn ideas_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let subscription = state.ideas.subscribe().await?;
    Ok(ws.on_upgrade(move |socket| {
        handle_socket(socket, state.ws_manager, LiveChannel::Ideas, subscription)
    }))
}

/// GET /ws/categories -- upgrade and stream category snapshots, seeding the
/// defaults first when the collection is empty.
pub async fn categories_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let subscription = CategoryRepo::subscribe(state.store.as_ref()).await?;
    Ok(ws.on_upgrade(move |socket| {
        handle_socket(socket, state.ws_manager, LiveChannel::Categories, subscription)
    }))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket, registers the connection with `WsManager`, and spawns
/// a sender task that interleaves manager control frames (ping, close) with
/// snapshot frames from the subscription. Inbound frames are read on the
/// current task until the client goes away; then the sender task, and with
/// it the live query, is dropped.
async fn handle_socket<T>(
    socket: WebSocket,
    ws_manager: Arc<WsManager>,
    channel: LiveChannel,
    mut subscription: Subscription<T>,
) where
    T: Serialize + Send + 'static,
{
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, %channel, "WebSocket connected");

    let mut rx = ws_manager.add(conn_id.clone(), channel).await;
    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        loop {
            let outbound = tokio::select! {
                control = rx.recv() => match control {
                    Some(msg) => msg,
                    // Manager dropped us (shutdown).
                    None => break,
                },
                snapshot = subscription.next() => match snapshot {
                    Some(result) => match encode_frame(result) {
                        Some(text) => Message::Text(text.into()),
                        None => continue,
                    },
                    None => {
                        tracing::debug!(conn_id = %sender_conn_id, "Live query ended");
                        break;
                    }
                },
            };

            let closing = matches!(outbound, Message::Close(_));
            if sink.send(outbound).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

fn encode_frame<T: Serialize>(
    result: Result<Vec<T>, ideaboard_store::StoreReadError>,
) -> Option<String> {
    let frame = match result {
        Ok(data) => SnapshotFrame::Snapshot { data },
        Err(e) => {
            tracing::warn!(error = %e, "Live query failed");
            SnapshotFrame::Error {
                error: e.to_string(),
            }
        }
    };
    match serde_json::to_string(&frame) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode snapshot frame");
            None
        }
    }
}
