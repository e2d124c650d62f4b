use axum::{
    extract::{Path, State},
    response::Json,
};
use std::sync::Arc;
use tracing::info;
use crate::{
    AppState, ReferenceResponse,
    api::handlers::common::{api_error, ApiError},
    validator::parse_sex,
};

pub async fn get_reference(
    State(state): State<Arc<AppState>>,
    Path(sex): Path<String>,
) -> Result<Json<ReferenceResponse>, ApiError> {
    let sex = parse_sex(&sex).map_err(|e| api_error(e, state.config.environment))?;
    let decades = state.table.decades(sex).to_vec();

    info!("Serving {} ACSM decades for sex {}", decades.len(), sex);

    Ok(Json(ReferenceResponse { sex, decades }))
}
