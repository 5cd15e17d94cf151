use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use homebook_core::recipes::{
    NewIngredientLine, NewRecipe, NewRecipeStep, Recipe, RecipeDetail, RecipeIngredient,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    auth::CurrentUser,
    error::{ApiJson, ApiResult},
    main_lib::AppState,
};

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    search: Option<String>,
}

#[derive(Deserialize)]
pub struct NameBody {
    name: String,
}

#[derive(Deserialize)]
pub struct DescriptionBody {
    description: Option<String>,
}

#[derive(Deserialize)]
pub struct ServingsBody {
    servings: Option<i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationBody {
    duration_minutes: Option<i32>,
}

#[derive(Deserialize)]
pub struct IngredientsBody {
    ingredients: Vec<NewIngredientLine>,
}

#[derive(Deserialize)]
pub struct StepsBody {
    steps: Vec<NewRecipeStep>,
}

#[utoipa::path(get, path = "/kitchen/recipes", params(ListQuery), responses((status = 200, description = "Recipes of the caller")))]
pub async fn list_recipes(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Recipe>>> {
    let search = query.search.as_deref().filter(|s| !s.trim().is_empty());
    Ok(Json(state.recipe_service.get_recipes(current.id(), search)?))
}

#[utoipa::path(post, path = "/kitchen/recipes", responses((status = 201), (status = 400)))]
pub async fn create_recipe(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(recipe): ApiJson<NewRecipe>,
) -> ApiResult<(StatusCode, Json<RecipeDetail>)> {
    let created = state
        .recipe_service
        .create_recipe(current.id(), recipe)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/kitchen/recipes/{id}", params(("id" = String, Path,)), responses((status = 200), (status = 404)))]
pub async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<RecipeDetail>> {
    Ok(Json(state.recipe_service.get_recipe(current.id(), &id)?))
}

#[utoipa::path(delete, path = "/kitchen/recipes/{id}", params(("id" = String, Path,)), responses((status = 204), (status = 404)))]
pub async fn delete_recipe(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .recipe_service
        .delete_recipe(current.id(), &id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(put, path = "/kitchen/recipes/{id}/name", operation_id = "update_recipe_name", params(("id" = String, Path,)), responses((status = 200), (status = 400), (status = 404)))]
pub async fn update_name(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<NameBody>,
) -> ApiResult<Json<Recipe>> {
    let recipe = state
        .recipe_service
        .update_name(current.id(), &id, &body.name)
        .await?;
    Ok(Json(recipe))
}

#[utoipa::path(put, path = "/kitchen/recipes/{id}/description", params(("id" = String, Path,)), responses((status = 200), (status = 400), (status = 404)))]
pub async fn update_description(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<DescriptionBody>,
) -> ApiResult<Json<Recipe>> {
    let recipe = state
        .recipe_service
        .update_description(current.id(), &id, body.description)
        .await?;
    Ok(Json(recipe))
}

#[utoipa::path(put, path = "/kitchen/recipes/{id}/servings", params(("id" = String, Path,)), responses((status = 200), (status = 400), (status = 404)))]
pub async fn update_servings(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ServingsBody>,
) -> ApiResult<Json<Recipe>> {
    let recipe = state
        .recipe_service
        .update_servings(current.id(), &id, body.servings)
        .await?;
    Ok(Json(recipe))
}

#[utoipa::path(put, path = "/kitchen/recipes/{id}/duration", params(("id" = String, Path,)), responses((status = 200), (status = 400), (status = 404)))]
pub async fn update_duration(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<DurationBody>,
) -> ApiResult<Json<Recipe>> {
    let recipe = state
        .recipe_service
        .update_duration(current.id(), &id, body.duration_minutes)
        .await?;
    Ok(Json(recipe))
}

#[utoipa::path(put, path = "/kitchen/recipes/{id}/ingredients", params(("id" = String, Path,)), responses((status = 200), (status = 400), (status = 404)))]
pub async fn replace_ingredients(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<IngredientsBody>,
) -> ApiResult<Json<RecipeDetail>> {
    let detail = state
        .recipe_service
        .replace_ingredients(current.id(), &id, body.ingredients)
        .await?;
    Ok(Json(detail))
}

#[utoipa::path(put, path = "/kitchen/recipes/{id}/steps", params(("id" = String, Path,)), responses((status = 200), (status = 400), (status = 404)))]
pub async fn replace_steps(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StepsBody>,
) -> ApiResult<Json<RecipeDetail>> {
    let detail = state
        .recipe_service
        .replace_steps(current.id(), &id, body.steps)
        .await?;
    Ok(Json(detail))
}

#[utoipa::path(get, path = "/kitchen/ingredients", responses((status = 200, description = "All known ingredients")))]
pub async fn list_ingredients(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<RecipeIngredient>>> {
    Ok(Json(state.recipe_service.get_ingredients()?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/kitchen/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/kitchen/recipes/{id}",
            get(get_recipe).delete(delete_recipe),
        )
        .route("/kitchen/recipes/{id}/name", put(update_name))
        .route("/kitchen/recipes/{id}/description", put(update_description))
        .route("/kitchen/recipes/{id}/servings", put(update_servings))
        .route("/kitchen/recipes/{id}/duration", put(update_duration))
        .route("/kitchen/recipes/{id}/ingredients", put(replace_ingredients))
        .route("/kitchen/recipes/{id}/steps", put(replace_steps))
        .route("/kitchen/ingredients", get(list_ingredients))
}
