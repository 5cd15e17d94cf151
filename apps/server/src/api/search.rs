use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use homebook_core::search::SearchResponse;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
    limit: Option<i64>,
}

#[utoipa::path(get, path = "/search", params(SearchQuery), responses((status = 200, description = "Matches grouped by module")))]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponse>> {
    let response = state
        .search_service
        .search(current.id(), &query.q, query.limit)
        .await?;
    Ok(Json(response))
}

#[utoipa::path(get, path = "/search/modules", responses((status = 200, description = "Searchable modules")))]
pub async fn modules(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.search_service.modules())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search", get(search))
        .route("/search/modules", get(modules))
}
