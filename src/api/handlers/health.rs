use axum::extract::State;
use axum::response::{Json, IntoResponse};
use axum::http::StatusCode;
use std::sync::Arc;
use time::OffsetDateTime;
use crate::{AppState, HealthResponse};

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "OK",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.to_string(),
        sample_rows: state.dataset.len(),
        timestamp: OffsetDateTime::now_utc().to_string(),
    };

    (StatusCode::OK, Json(response))
}
