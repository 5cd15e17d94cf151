use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use homebook_core::instance::{UpdateAvailability, UpdateOutcome};

use crate::{error::ApiResult, main_lib::AppState};

fn update_availability_status(availability: &UpdateAvailability) -> StatusCode {
    match availability {
        UpdateAvailability::NotInstalled => StatusCode::UNPROCESSABLE_ENTITY,
        UpdateAvailability::UpToDate => StatusCode::NO_CONTENT,
        UpdateAvailability::UpdateAvailable { .. } => StatusCode::OK,
        UpdateAvailability::Downgrade { .. } => StatusCode::CONFLICT,
    }
}

#[utoipa::path(
    get,
    path = "/update/availability",
    responses(
        (status = 200, description = "An update is available"),
        (status = 204, description = "Instance is up to date"),
        (status = 409, description = "Instance was written by a newer version"),
        (status = 422, description = "Instance is not installed"),
    )
)]
pub async fn get_update_availability(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let availability = state.update_service.get_availability()?;
    let status = update_availability_status(&availability);
    if status == StatusCode::NO_CONTENT {
        return Ok(status.into_response());
    }
    Ok((status, Json(availability)).into_response())
}

#[utoipa::path(
    post,
    path = "/update/start",
    responses(
        (status = 200, description = "Update applied"),
        (status = 204, description = "Nothing to update"),
        (status = 409, description = "Downgrade refused"),
        (status = 422, description = "Instance is not installed"),
    )
)]
pub async fn start_update(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    match state.update_service.start_update().await? {
        UpdateOutcome::UpToDate => Ok(StatusCode::NO_CONTENT.into_response()),
        outcome @ UpdateOutcome::Updated { .. } => Ok(Json(outcome).into_response()),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/update/availability", get(get_update_availability))
        .route("/update/start", post(start_update))
}
