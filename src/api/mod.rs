// HTTP and WebSocket APIs

mod ingestion;
mod query;
mod websocket;

pub use websocket::ws_handler;

use crate::config::LimitsConfig;
use crate::hub::BroadcastHub;
use crate::ingest::UpdateIngest;
use crate::snapshot::SnapshotQuery;
use crate::store::PositionStore;
use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PositionStore>,
    pub hub: Arc<BroadcastHub>,
    pub ingest: Arc<UpdateIngest>,
    pub snapshot: SnapshotQuery,
    pub limits: LimitsConfig,
}

impl AppState {
    /// Wire a fresh store, hub, ingest and snapshot query together.
    pub fn new(hub_capacity: usize, limits: LimitsConfig) -> Self {
        let store = Arc::new(PositionStore::new());
        let hub = Arc::new(BroadcastHub::new(hub_capacity));
        let ingest = Arc::new(UpdateIngest::new(Arc::clone(&store), Arc::clone(&hub)));
        let snapshot = SnapshotQuery::new(store.clone());

        Self {
            store,
            hub,
            ingest,
            snapshot,
            limits,
        }
    }
}

/// Error response body shared by every endpoint
#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/locations",
            get(query::list_locations).post(ingestion::report_location),
        )
        .route("/api/locations/batch", post(ingestion::report_batch))
        .route("/api/locations/:id", get(query::get_location))
        .route("/api/status", get(query::status))
        .route("/api/ws", get(ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}
