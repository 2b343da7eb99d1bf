//! HTTP boundary: router, request/response shapes, error mapping.

use crate::application::forecast::service::PredictionService;
use crate::domain::series::DateRange;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub symbol: String,
    pub date_range: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predicted_price: Vec<f64>,
    pub historical_price: Vec<f64>,
    pub sentiment: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Every pipeline failure maps to a structured 400; a bad request must never
/// take the process down.
pub async fn predict(State(state): State<AppState>, Json(req): Json<PredictRequest>) -> Response {
    let range = match req.date_range.as_deref() {
        None => DateRange::default(),
        Some(raw) => match raw.parse::<DateRange>() {
            Ok(range) => range,
            Err(e) => return error_response(e.to_string()),
        },
    };

    match state.service.predict(&req.symbol, range).await {
        Ok(prediction) => Json(PredictResponse {
            predicted_price: prediction.predicted,
            historical_price: prediction.historical,
            sentiment: prediction.sentiment.to_string(),
        })
        .into_response(),
        Err(e) => {
            warn!("Prediction for {} failed: {}", req.symbol, e);
            error_response(e.to_string())
        }
    }
}

fn error_response(error: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error })).into_response()
}
