use crate::api::{AppState, ErrorResponse};
use crate::ingest::IngestStats;
use crate::position::PositionRecord;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::sync::Arc;

/// Service status counters
#[derive(Debug, Serialize)]
pub(crate) struct StatusResponse {
    tracked: usize,
    subscribers: usize,
    #[serde(flatten)]
    ingest: IngestStats,
}

/// GET /api/locations - Full current snapshot
pub(crate) async fn list_locations(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<PositionRecord>> {
    Json(state.snapshot.snapshot())
}

/// GET /api/locations/:id - Latest position for one entity
pub(crate) async fn get_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PositionRecord>, QueryError> {
    state.store.get(&id).map(Json).ok_or(QueryError::NotFound)
}

/// GET /api/status
pub(crate) async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        tracked: state.store.len(),
        subscribers: state.hub.subscriber_count(),
        ingest: state.ingest.stats(),
    })
}

/// Query error types
#[derive(Debug)]
pub(crate) enum QueryError {
    NotFound,
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            QueryError::NotFound => (StatusCode::NOT_FOUND, "Location not found"),
        };

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
        });

        (status, body).into_response()
    }
}
