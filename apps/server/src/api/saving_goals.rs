use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Extension, Json, Router,
};
use homebook_core::{
    saving_goals::{
        project, validate_amounts, validate_interest, NewSavingGoal, SavingGoal,
        SavingGoalAmountsUpdate, SavingGoalAppearanceUpdate, SavingGoalInfoUpdate,
        SavingGoalNameUpdate, SavingsPlan, SavingsProjection,
    },
    utils::time_utils::today_utc,
};

use crate::{
    auth::CurrentUser,
    error::{ApiJson, ApiResult},
    main_lib::AppState,
};

#[utoipa::path(get, path = "/finances/saving-goals", responses((status = 200, description = "Saving goals of the caller")))]
pub async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> ApiResult<Json<Vec<SavingGoal>>> {
    let goals = state.saving_goal_service.get_saving_goals(current.id())?;
    Ok(Json(goals))
}

#[utoipa::path(post, path = "/finances/saving-goals", responses((status = 201), (status = 400)))]
pub async fn create_goal(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(goal): ApiJson<NewSavingGoal>,
) -> ApiResult<(StatusCode, Json<SavingGoal>)> {
    let created = state
        .saving_goal_service
        .create_saving_goal(current.id(), goal)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/finances/saving-goals/{id}", params(("id" = String, Path,)), responses((status = 200), (status = 404)))]
pub async fn get_goal(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<SavingGoal>> {
    let goal = state
        .saving_goal_service
        .get_saving_goal(current.id(), &id)?;
    Ok(Json(goal))
}

#[utoipa::path(delete, path = "/finances/saving-goals/{id}", params(("id" = String, Path,)), responses((status = 204), (status = 404)))]
pub async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .saving_goal_service
        .delete_saving_goal(current.id(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(put, path = "/finances/saving-goals/{id}/name", operation_id = "update_saving_goal_name", params(("id" = String, Path,)), responses((status = 200), (status = 400), (status = 404)))]
pub async fn update_name(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<SavingGoalNameUpdate>,
) -> ApiResult<Json<SavingGoal>> {
    let goal = state
        .saving_goal_service
        .update_name(current.id(), &id, &body.name)
        .await?;
    Ok(Json(goal))
}

#[utoipa::path(put, path = "/finances/saving-goals/{id}/amounts", params(("id" = String, Path,)), responses((status = 200), (status = 400), (status = 404)))]
pub async fn update_amounts(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<SavingGoalAmountsUpdate>,
) -> ApiResult<Json<SavingGoal>> {
    let goal = state
        .saving_goal_service
        .update_amounts(current.id(), &id, body)
        .await?;
    Ok(Json(goal))
}

#[utoipa::path(put, path = "/finances/saving-goals/{id}/appearance", params(("id" = String, Path,)), responses((status = 200), (status = 400), (status = 404)))]
pub async fn update_appearance(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<SavingGoalAppearanceUpdate>,
) -> ApiResult<Json<SavingGoal>> {
    let goal = state
        .saving_goal_service
        .update_appearance(current.id(), &id, body)
        .await?;
    Ok(Json(goal))
}

#[utoipa::path(put, path = "/finances/saving-goals/{id}/info", params(("id" = String, Path,)), responses((status = 200), (status = 400), (status = 404)))]
pub async fn update_info(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<SavingGoalInfoUpdate>,
) -> ApiResult<Json<SavingGoal>> {
    let goal = state
        .saving_goal_service
        .update_info(current.id(), &id, body)
        .await?;
    Ok(Json(goal))
}

#[utoipa::path(get, path = "/finances/saving-goals/{id}/projection", params(("id" = String, Path,)), responses((status = 200), (status = 404)))]
pub async fn get_projection(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<SavingsProjection>> {
    let projection = state
        .saving_goal_service
        .get_projection(current.id(), &id, today_utc())?;
    Ok(Json(projection))
}

/// Projects a plan that has not been saved as a goal.
#[utoipa::path(post, path = "/finances/saving-goals/calculate", responses((status = 200, description = "Projection of an unsaved plan"), (status = 400)))]
pub async fn calculate(
    ApiJson(plan): ApiJson<SavingsPlan>,
) -> ApiResult<Json<SavingsProjection>> {
    validate_amounts(plan.target_amount, plan.current_amount, plan.monthly_payment)?;
    validate_interest(plan.interest_rate_option, plan.interest_rate)?;
    Ok(Json(project(&plan, today_utc())))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/finances/saving-goals", get(list_goals).post(create_goal))
        .route("/finances/saving-goals/calculate", post(calculate))
        .route(
            "/finances/saving-goals/{id}",
            get(get_goal).delete(delete_goal),
        )
        .route("/finances/saving-goals/{id}/name", put(update_name))
        .route("/finances/saving-goals/{id}/amounts", put(update_amounts))
        .route(
            "/finances/saving-goals/{id}/appearance",
            put(update_appearance),
        )
        .route("/finances/saving-goals/{id}/info", put(update_info))
        .route("/finances/saving-goals/{id}/projection", get(get_projection))
}
