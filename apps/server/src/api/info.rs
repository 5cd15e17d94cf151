use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use homebook_core::{
    configuration::InstanceInfo,
    constants::{DEFAULT_INSTANCE_NAME, DEFAULT_LOCALE, SUPPORTED_LOCALES},
    instance::InstanceState,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalesResponse {
    pub locales: Vec<String>,
    pub default_locale: String,
}

/// Name and default locale shown on the login page.
#[utoipa::path(get, path = "/info/instance", responses((status = 200, description = "Instance name and default locale")))]
pub async fn get_instance_info(State(state): State<Arc<AppState>>) -> ApiResult<Json<InstanceInfo>> {
    // Before setup the configuration table may not exist yet.
    if !state.instance_ready()? {
        return Ok(Json(InstanceInfo {
            name: DEFAULT_INSTANCE_NAME.to_string(),
            default_locale: DEFAULT_LOCALE.to_string(),
        }));
    }
    Ok(Json(state.configuration_service.get_instance_info()?))
}

#[utoipa::path(get, path = "/info/state", responses((status = 200, description = "Setup and update availability")))]
pub async fn get_instance_state(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<InstanceState>> {
    Ok(Json(state.setup_service.get_state()?))
}

#[utoipa::path(get, path = "/platform/locales", responses((status = 200, body = LocalesResponse)))]
pub async fn get_locales() -> Json<LocalesResponse> {
    Json(LocalesResponse {
        locales: SUPPORTED_LOCALES.iter().map(|l| l.to_string()).collect(),
        default_locale: DEFAULT_LOCALE.to_string(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/info/instance", get(get_instance_info))
        .route("/info/state", get(get_instance_state))
        .route("/platform/locales", get(get_locales))
}
