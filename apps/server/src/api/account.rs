use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use homebook_core::{preferences::UserPreference, users::User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    auth::CurrentUser,
    error::{ApiJson, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime of the token in seconds
    pub expires_in: u64,
    #[schema(value_type = Object)]
    pub user: User,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    current_password: String,
    new_password: String,
}

#[derive(Deserialize)]
pub struct PreferenceValue {
    value: String,
}

#[utoipa::path(
    post,
    path = "/account/login",
    request_body = LoginRequest,
    responses(
        (status = 200, body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account disabled"),
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .user_service
        .authenticate(body.username.trim(), &body.password)
        .await?;
    let access_token = state.auth.issue_token(&user)?;
    tracing::debug!("Issued token for user '{}'", user.username);
    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.auth.expires_in().as_secs(),
        user,
    }))
}

#[utoipa::path(get, path = "/account/me", responses((status = 200, description = "The authenticated user"), (status = 401)))]
pub async fn me(Extension(current): Extension<CurrentUser>) -> Json<User> {
    Json(current.0)
}

#[utoipa::path(put, path = "/user/password", responses((status = 204), (status = 400), (status = 401, description = "Current password is wrong")))]
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(body): ApiJson<ChangePasswordRequest>,
) -> ApiResult<StatusCode> {
    state
        .user_service
        .change_own_password(current.id(), &body.current_password, &body.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/user/preferences", responses((status = 200, description = "Preferences of the caller")))]
pub async fn list_preferences(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<UserPreference>>> {
    Ok(Json(state.preference_service.get_preferences(current.id())?))
}

#[utoipa::path(get, path = "/user/preferences/{key}", params(("key" = String, Path,)), responses((status = 200), (status = 404)))]
pub async fn get_preference(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(key): Path<String>,
) -> ApiResult<Json<UserPreference>> {
    Ok(Json(
        state.preference_service.get_preference(current.id(), &key)?,
    ))
}

#[utoipa::path(put, path = "/user/preferences/{key}", params(("key" = String, Path,)), responses((status = 200), (status = 400)))]
pub async fn set_preference(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(key): Path<String>,
    ApiJson(body): ApiJson<PreferenceValue>,
) -> ApiResult<Json<UserPreference>> {
    let preference = state
        .preference_service
        .set_preference(current.id(), &key, &body.value)
        .await?;
    Ok(Json(preference))
}

#[utoipa::path(delete, path = "/user/preferences/{key}", params(("key" = String, Path,)), responses((status = 204), (status = 404)))]
pub async fn delete_preference(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(key): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .preference_service
        .delete_preference(current.id(), &key)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Routes reachable without a token once the instance is ready.
pub fn login_router() -> Router<Arc<AppState>> {
    Router::new().route("/account/login", post(login))
}

pub fn user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/account/me", get(me))
        .route("/user/password", put(change_password))
        .route("/user/preferences", get(list_preferences))
        .route(
            "/user/preferences/{key}",
            get(get_preference)
                .put(set_preference)
                .delete(delete_preference),
        )
}
