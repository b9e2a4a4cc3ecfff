use std::sync::Arc;

use ideaboard_core::session::AdminSecret;
use ideaboard_store::repositories::IdeaRepo;
use ideaboard_store::{SharedStore, StoreReadError};

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The document store every repository works against.
    pub store: SharedStore,
    /// Idea repository; its live query is the server's cached snapshot.
    pub ideas: Arc<IdeaRepo>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (browser clients).
    pub ws_manager: Arc<WsManager>,
    /// Shared secret for entering admin mode.
    pub admin_secret: Arc<AdminSecret>,
}

impl AppState {
    /// Open the idea repository's live query and assemble the state.
    pub async fn connect(
        store: SharedStore,
        config: ServerConfig,
        ws_manager: Arc<WsManager>,
        admin_secret: AdminSecret,
    ) -> Result<Self, StoreReadError> {
        let ideas = IdeaRepo::connect(store.clone()).await?;
        Ok(Self {
            store,
            ideas: Arc::new(ideas),
            config: Arc::new(config),
            ws_manager,
            admin_secret: Arc::new(admin_secret),
        })
    }
}
