use axum::{
    extract::{rejection::JsonRejection, State, Query},
    response::Json,
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{info, warn};
use crate::{
    AppState, AssessmentBody, AssessmentQuery, AssessmentRequest, AssessmentResponse, ErrorResponse,
    api::handlers::common::{api_error, request_from_body, request_from_query, ApiError},
    constants::DATASET_SLICE_AGE_SPAN,
};

pub async fn get_assessment(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AssessmentQuery>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let environment = state.config.environment;
    let request = request_from_query(params, state.config.gauge_min, state.config.gauge_max)
        .map_err(|e| api_error(e, environment))?;

    respond(&state, request)
}

pub async fn post_assessment(
    State(state): State<Arc<AppState>>,
    body: Result<Json<AssessmentBody>, JsonRejection>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let environment = state.config.environment;
    let Json(body) = body.map_err(|rejection| {
        warn!("Rejected assessment body: {}", rejection.body_text());
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Invalid request body: {}", rejection.body_text()),
                details: None,
            }),
        )
    })?;

    let request = request_from_body(body, state.config.gauge_min, state.config.gauge_max)
        .map_err(|e| api_error(e, environment))?;

    respond(&state, request)
}

fn respond(state: &AppState, request: AssessmentRequest) -> Result<Json<AssessmentResponse>, ApiError> {
    let assessor = state.assessor();
    let outcome = assessor
        .assess(request.sex, request.age, request.vo2max)
        .map_err(|e| api_error(e, state.config.environment))?;

    info!(
        "Assessed {} ml/kg/min for sex {} age {}: {} ({}), {:+.1}% vs baseline {:.1}",
        request.vo2max,
        request.sex,
        request.age,
        outcome.assessment.label,
        outcome.assessment.zone,
        outcome.assessment.percentage_vs_baseline,
        outcome.assessment.baseline
    );

    Ok(Json(AssessmentResponse {
        vo2max: request.vo2max,
        sex: request.sex,
        age: request.age,
        min: request.min,
        max: request.max,
        assessment: outcome.assessment,
        statistics: outcome.statistics,
        dataset: assessor.demographic_slice(request.sex, request.age, DATASET_SLICE_AGE_SPAN),
    }))
}
