use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use std::any::Any;
use tracing::{error, warn};
use crate::config::Environment;
use crate::error::{Error, Result};
use crate::validator::{
    check_age, check_vo2max, parse_age, parse_gauge_bound, parse_sex, parse_vo2max, AGE_MESSAGE, SEX_MESSAGE,
    VO2MAX_MESSAGE,
};
use crate::{AssessmentBody, AssessmentQuery, AssessmentRequest, ErrorResponse};

pub const INTERNAL_ERROR_MESSAGE: &str =
    "Internal server error occurred while processing VO2max assessment.";

// Query defaults mirror the dashboard's initial state.
pub const DEFAULT_SEX: &str = "M";
pub const DEFAULT_AGE: &str = "25";
pub const DEFAULT_VO2MAX: &str = "68.2";

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(err: Error, environment: Environment) -> ApiError {
    if let Error::Validation(message) = err {
        warn!("Rejected assessment request: {}", message);
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message, details: None }));
    }

    error!("VO2max assessment failed: {}", err);
    internal_error(err.to_string(), environment)
}

pub fn internal_error(details: String, environment: Environment) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: INTERNAL_ERROR_MESSAGE.to_string(),
            details: environment.exposes_error_details().then_some(details),
        }),
    )
}

/// Converts a handler panic into the regular internal-error body.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>, environment: Environment) -> Response {
    let details = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!("Handler panicked: {}", details);
    internal_error(details, environment).into_response()
}

pub fn request_from_query(
    params: AssessmentQuery,
    default_min: f64,
    default_max: f64,
) -> Result<AssessmentRequest> {
    let sex = parse_sex(params.sex.as_deref().unwrap_or(DEFAULT_SEX))?;
    let age = parse_age(params.age.as_deref().unwrap_or(DEFAULT_AGE))?;
    let vo2max = parse_vo2max(params.vo2max.as_deref().unwrap_or(DEFAULT_VO2MAX))?;
    let min = match params.min.as_deref() {
        Some(raw) => parse_gauge_bound("min", raw)?,
        None => default_min,
    };
    let max = match params.max.as_deref() {
        Some(raw) => parse_gauge_bound("max", raw)?,
        None => default_max,
    };

    Ok(AssessmentRequest { sex, age, vo2max, min, max })
}

/// JSON bodies must carry sex, age and vo2max explicitly.
pub fn request_from_body(
    body: AssessmentBody,
    default_min: f64,
    default_max: f64,
) -> Result<AssessmentRequest> {
    let sex = body
        .sex
        .as_deref()
        .ok_or_else(|| Error::Validation(SEX_MESSAGE.to_string()))
        .and_then(parse_sex)?;
    let age = body
        .age
        .and_then(|age| u32::try_from(age).ok())
        .ok_or_else(|| Error::Validation(AGE_MESSAGE.to_string()))
        .and_then(check_age)?;
    let vo2max = body
        .vo2max
        .ok_or_else(|| Error::Validation(VO2MAX_MESSAGE.to_string()))
        .and_then(check_vo2max)?;

    Ok(AssessmentRequest {
        sex,
        age,
        vo2max,
        min: body.min.unwrap_or(default_min),
        max: body.max.unwrap_or(default_max),
    })
}
