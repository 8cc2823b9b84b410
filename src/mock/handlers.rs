use super::classifier;
use super::state::MockState;
use crate::api::messages::{
    BatchPredictRequest, BatchPredictResponse, HistoryQuery, HistoryResponse, PredictRequest,
    PredictResponse, ServiceStatus,
};
use crate::session::models::{self, HistoryEntry};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use tracing::info;

/// History entries returned when the query has no limit
const DEFAULT_HISTORY_LIMIT: usize = 10;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub message: String,
}

fn bad_request(detail: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            detail: detail.to_string(),
        }),
    )
        .into_response()
}

fn to_response(entry: &HistoryEntry) -> PredictResponse {
    PredictResponse {
        text: Some(entry.text.clone()),
        prediction: Some(entry.prediction as i64),
        confidence: Some(entry.confidence),
        result: Some(models::label_for(entry.prediction).to_string()),
        text_length: Some(entry.text_length),
        word_count: Some(entry.word_count),
        timestamp: Some(entry.timestamp.clone()),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
/// Service status
pub async fn root() -> impl IntoResponse {
    Json(ServiceStatus {
        message: Some("Mock Spam Detection API".to_string()),
        status: Some("running".to_string()),
    })
}

/// POST /predict
/// Classify one text and record it
pub async fn predict(
    State(state): State<MockState>,
    Json(req): Json<PredictRequest>,
) -> impl IntoResponse {
    if req.text.is_empty() {
        return bad_request("text must not be empty");
    }

    let entry = classifier::score(&req.text);
    info!(
        "Mock prediction: {} ({} chars)",
        models::label_for(entry.prediction),
        entry.text_length
    );

    let response = to_response(&entry);
    state.record([entry]).await;

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /predict-batch
/// Classify several texts in order and record them
pub async fn predict_batch(
    State(state): State<MockState>,
    Json(req): Json<BatchPredictRequest>,
) -> impl IntoResponse {
    if req.texts.is_empty() {
        return bad_request("texts must not be empty");
    }

    let entries: Vec<HistoryEntry> = req.texts.iter().map(|t| classifier::score(t)).collect();
    let results: Vec<PredictResponse> = entries.iter().map(to_response).collect();
    info!("Mock batch prediction: {} texts", results.len());

    state.record(entries).await;

    (
        StatusCode::OK,
        Json(BatchPredictResponse {
            total_processed: Some(results.len()),
            results,
        }),
    )
        .into_response()
}

/// GET /history?limit=N
/// Most recent entries, oldest first
pub async fn history(
    State(state): State<MockState>,
    Query(query): Query<HistoryQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Json(HistoryResponse {
        history: state.recent(limit).await,
    })
}

/// GET /analytics
/// Aggregates over the whole history
pub async fn analytics(State(state): State<MockState>) -> impl IntoResponse {
    Json(state.analytics().await)
}

/// DELETE /history
/// Forget every recorded prediction
pub async fn clear_history(State(state): State<MockState>) -> impl IntoResponse {
    state.clear().await;
    info!("Mock history cleared");

    Json(AckResponse {
        message: "History cleared".to_string(),
    })
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
