use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ideaboard_api::config::ServerConfig;
use ideaboard_api::router::build_app_router;
use ideaboard_api::state::AppState;
use ideaboard_api::ws;
use ideaboard_core::session::AdminSecret;
use ideaboard_events::{Notifier, NotifierConfig, TriggerDispatcher};
use ideaboard_store::repositories::CategoryRepo;
use ideaboard_store::{DocumentStore, MemoryStore, SharedStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ideaboard_api=debug,ideaboard_events=debug,ideaboard_store=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let admin_secret = AdminSecret::from_env();
    if !admin_secret.is_configured() {
        tracing::warn!("ADMIN_CODE not set, admin login is disabled");
    }

    // --- Document store ---
    let store: SharedStore = Arc::new(MemoryStore::new());
    match CategoryRepo::ensure_seeded(store.as_ref()).await {
        Ok(created) => tracing::info!(created, "Category seeding checked"),
        Err(e) => tracing::error!(error = %e, "Failed to seed default categories"),
    }

    // --- Notification triggers ---
    let notifier_config = NotifierConfig::from_env();
    let notifier = Notifier::from_config(&notifier_config);
    let dispatcher_cancel = tokio_util::sync::CancellationToken::new();
    let dispatcher = TriggerDispatcher::new(store.clone(), notifier, notifier_config.board_url);
    let dispatcher_handle = tokio::spawn(dispatcher.run(store.changes(), dispatcher_cancel.clone()));
    tracing::info!("Trigger dispatcher started");

    // --- WebSocket manager ---
    let ws_manager = Arc::new(ws::WsManager::new());
    let heartbeat_cancel = tokio_util::sync::CancellationToken::new();
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&ws_manager), heartbeat_cancel.clone());

    // --- App state ---
    let state = AppState::connect(store, config.clone(), Arc::clone(&ws_manager), admin_secret)
        .await
        .expect("Failed to open idea live query");

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    dispatcher_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), dispatcher_handle).await;
    tracing::info!("Trigger dispatcher stopped");

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    heartbeat_cancel.cancel();
    let _ = heartbeat_handle.await;
    tracing::info!("Heartbeat task stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
