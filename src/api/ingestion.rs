use crate::api::{AppState, ErrorResponse};
use crate::position::{PositionRecord, ValidationError};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Batch request
#[derive(Deserialize)]
struct BatchRequest {
    reports: Vec<Value>,
}

/// Batch response
#[derive(Serialize)]
pub(crate) struct BatchResponse {
    successful: usize,
    failed: usize,
    results: Vec<BatchResult>,
}

#[derive(Serialize)]
pub(crate) struct BatchResult {
    id: Option<String>,
    error: Option<String>,
}

/// POST /api/locations - Accept a single position report
pub(crate) async fn report_location(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<PositionRecord>, IngestError> {
    if body.len() > state.limits.single_body_bytes {
        return Err(refuse(&state, IngestError::PayloadTooLarge));
    }

    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| refuse(&state, IngestError::MalformedJson(e.to_string())))?;

    let report = state.ingest.validate(&value)?;

    Ok(Json(state.ingest.submit_report(report)))
}

/// POST /api/locations/batch - Accept several reports, applied in order
pub(crate) async fn report_batch(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<BatchResponse>, IngestError> {
    if body.len() > state.limits.batch_body_bytes {
        return Err(refuse(&state, IngestError::PayloadTooLarge));
    }

    let request: BatchRequest = serde_json::from_slice(&body)
        .map_err(|e| refuse(&state, IngestError::MalformedJson(e.to_string())))?;

    if request.reports.is_empty() {
        return Err(refuse(&state, IngestError::EmptyBatch));
    }

    info!(count = request.reports.len(), "Ingesting position batch");

    let mut results = Vec::with_capacity(request.reports.len());
    let mut successful = 0;

    for value in &request.reports {
        match state.ingest.validate(value) {
            Ok(report) => {
                let record = state.ingest.submit_report(report);
                successful += 1;
                results.push(BatchResult {
                    id: Some(record.id),
                    error: None,
                });
            }
            Err(e) => results.push(BatchResult {
                id: value.get("id").and_then(Value::as_str).map(str::to_string),
                error: Some(format!("validation failed: {}", e)),
            }),
        }
    }

    Ok(Json(BatchResponse {
        successful,
        failed: results.len() - successful,
        results,
    }))
}

/// Count a request refused before any report could be validated
fn refuse(state: &AppState, error: IngestError) -> IngestError {
    state.ingest.reject();
    warn!(error = %error, "Rejected ingest request");
    error
}

/// Ingest error types
#[derive(Debug)]
pub(crate) enum IngestError {
    Validation(ValidationError),
    MalformedJson(String),
    EmptyBatch,
    PayloadTooLarge,
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Validation(e) => write!(f, "{}", e),
            IngestError::MalformedJson(msg) => write!(f, "invalid JSON: {}", msg),
            IngestError::EmptyBatch => write!(f, "batch must contain at least one report"),
            IngestError::PayloadTooLarge => write!(f, "payload too large"),
        }
    }
}

impl From<ValidationError> for IngestError {
    fn from(e: ValidationError) -> Self {
        IngestError::Validation(e)
    }
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let status = match self {
            IngestError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            IngestError::Validation(_) | IngestError::MalformedJson(_) | IngestError::EmptyBatch => {
                StatusCode::BAD_REQUEST
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}
