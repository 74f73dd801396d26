use crate::api::AppState;
use crate::subscription::ConnectionManager;
use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::Response,
};
use std::sync::Arc;
use tracing::info;

/// GET /api/ws - WebSocket upgrade to the live location channel
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    info!("WebSocket upgrade request received");

    let manager = ConnectionManager::new(Arc::clone(&state.hub), state.snapshot.clone());
    ws.on_upgrade(move |socket| manager.handle(socket))
}
