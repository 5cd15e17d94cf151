use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use homebook_core::instance::{
    SetupAvailability, SetupConfigurationInfo, SetupRequest, SetupResult,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{ApiJson, ApiResult},
    main_lib::AppState,
};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    #[schema(value_type = String)]
    pub availability: SetupAvailability,
}

fn setup_availability_status(availability: SetupAvailability) -> StatusCode {
    match availability {
        SetupAvailability::Available => StatusCode::OK,
        SetupAvailability::UpdateRequired => StatusCode::CREATED,
        SetupAvailability::AlreadyConfigured => StatusCode::NO_CONTENT,
        SetupAvailability::Conflict => StatusCode::CONFLICT,
    }
}

/// The status code carries the availability so that clients can branch on it
/// without parsing the body.
#[utoipa::path(
    get,
    path = "/setup/availability",
    responses(
        (status = 200, description = "Setup can start", body = AvailabilityResponse),
        (status = 201, description = "An update is required instead", body = AvailabilityResponse),
        (status = 204, description = "Already configured"),
        (status = 409, description = "Unfinished setup or newer instance", body = AvailabilityResponse),
    )
)]
pub async fn get_setup_availability(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let availability = state.setup_service.get_availability()?;
    let status = setup_availability_status(availability);
    if status == StatusCode::NO_CONTENT {
        return Ok(status.into_response());
    }
    Ok((status, Json(AvailabilityResponse { availability })).into_response())
}

#[utoipa::path(get, path = "/setup/configuration", responses((status = 200, description = "Pre-configured setup values")))]
pub async fn get_setup_configuration(
    State(state): State<Arc<AppState>>,
) -> Json<SetupConfigurationInfo> {
    Json(state.setup_service.get_pre_configuration())
}

#[utoipa::path(
    post,
    path = "/setup/start",
    responses(
        (status = 200, description = "Instance provisioned"),
        (status = 400, description = "Invalid or missing setup values"),
        (status = 409, description = "Setup is not available"),
        (status = 422, description = "Licenses not accepted"),
    )
)]
pub async fn start_setup(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<SetupRequest>,
) -> ApiResult<Json<SetupResult>> {
    let result = state.setup_service.start_setup(request).await?;
    tracing::info!(
        "Instance '{}' set up with administrator '{}'",
        result.instance_name,
        result.admin.username
    );
    Ok(Json(result))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/setup/availability", get(get_setup_availability))
        .route("/setup/configuration", get(get_setup_configuration))
        .route("/setup/start", post(start_setup))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_availability_status() {
        assert_eq!(
            setup_availability_status(SetupAvailability::Available),
            StatusCode::OK
        );
        assert_eq!(
            setup_availability_status(SetupAvailability::UpdateRequired),
            StatusCode::CREATED
        );
        assert_eq!(
            setup_availability_status(SetupAvailability::AlreadyConfigured),
            StatusCode::NO_CONTENT
        );
        assert_eq!(
            setup_availability_status(SetupAvailability::Conflict),
            StatusCode::CONFLICT
        );
    }
}
