//! Administration endpoints. Every route here runs behind `require_admin`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use homebook_core::{
    configuration::InstanceInfo,
    users::{NewUser, User},
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::CurrentUser,
    error::{ApiJson, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize)]
pub struct UsernameBody {
    username: String,
}

#[derive(Deserialize)]
pub struct PasswordBody {
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBody {
    is_admin: bool,
}

#[derive(Deserialize)]
pub struct NameBody {
    name: String,
}

#[derive(Deserialize)]
pub struct LocaleBody {
    locale: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInstanceResponse {
    #[serde(flatten)]
    info: InstanceInfo,
    version: String,
    instance_version: Option<String>,
    user_count: i64,
}

#[utoipa::path(get, path = "/system/users", responses((status = 200), (status = 403)))]
pub async fn list_users(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.user_service.get_users()?))
}

#[utoipa::path(post, path = "/system/users", responses((status = 201), (status = 400), (status = 409)))]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(new_user): ApiJson<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.user_service.create_user(new_user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(get, path = "/system/users/{id}", params(("id" = String, Path,)), responses((status = 200), (status = 404)))]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.user_service.get_user(&id)?))
}

#[utoipa::path(delete, path = "/system/users/{id}", params(("id" = String, Path,)), responses((status = 204), (status = 404), (status = 409)))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.user_service.delete_user(current.id(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(put, path = "/system/users/{id}/username", params(("id" = String, Path,)), responses((status = 200), (status = 400), (status = 409)))]
pub async fn update_username(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UsernameBody>,
) -> ApiResult<Json<User>> {
    Ok(Json(
        state
            .user_service
            .update_username(&id, body.username.trim())
            .await?,
    ))
}

#[utoipa::path(put, path = "/system/users/{id}/password", params(("id" = String, Path,)), responses((status = 200), (status = 400), (status = 404)))]
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<PasswordBody>,
) -> ApiResult<Json<User>> {
    Ok(Json(
        state.user_service.update_password(&id, &body.password).await?,
    ))
}

#[utoipa::path(put, path = "/system/users/{id}/admin", params(("id" = String, Path,)), responses((status = 200), (status = 404), (status = 409)))]
pub async fn set_admin(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<AdminBody>,
) -> ApiResult<Json<User>> {
    Ok(Json(
        state
            .user_service
            .set_admin(current.id(), &id, body.is_admin)
            .await?,
    ))
}

#[utoipa::path(put, path = "/system/users/{id}/enable", params(("id" = String, Path,)), responses((status = 200), (status = 404)))]
pub async fn enable_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    Ok(Json(state.user_service.enable_user(&id).await?))
}

#[utoipa::path(put, path = "/system/users/{id}/disable", params(("id" = String, Path,)), responses((status = 200), (status = 404), (status = 409)))]
pub async fn disable_user(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    Ok(Json(
        state.user_service.disable_user(current.id(), &id).await?,
    ))
}

#[utoipa::path(get, path = "/system/instance", responses((status = 200, description = "Instance settings and versions")))]
pub async fn get_instance(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SystemInstanceResponse>> {
    let info = state.configuration_service.get_instance_info()?;
    let instance = state.setup_service.get_state()?;
    Ok(Json(SystemInstanceResponse {
        info,
        version: state.app_version.to_string(),
        instance_version: instance.instance_version,
        user_count: state.user_service.count_users()?,
    }))
}

#[utoipa::path(put, path = "/system/instance/name", responses((status = 200), (status = 400)))]
pub async fn set_instance_name(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<NameBody>,
) -> ApiResult<Json<InstanceInfo>> {
    Ok(Json(
        state
            .configuration_service
            .set_instance_name(&body.name)
            .await?,
    ))
}

#[utoipa::path(put, path = "/system/instance/default-locale", responses((status = 200), (status = 400)))]
pub async fn set_default_locale(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<LocaleBody>,
) -> ApiResult<Json<InstanceInfo>> {
    Ok(Json(
        state
            .configuration_service
            .set_default_locale(&body.locale)
            .await?,
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/system/users", get(list_users).post(create_user))
        .route("/system/users/{id}", get(get_user).delete(delete_user))
        .route("/system/users/{id}/username", put(update_username))
        .route("/system/users/{id}/password", put(reset_password))
        .route("/system/users/{id}/admin", put(set_admin))
        .route("/system/users/{id}/enable", put(enable_user))
        .route("/system/users/{id}/disable", put(disable_user))
        .route("/system/instance", get(get_instance))
        .route("/system/instance/name", put(set_instance_name))
        .route("/system/instance/default-locale", put(set_default_locale))
}
