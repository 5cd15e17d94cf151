//! HTTP routes.
//!
//! Routes are grouped by who may call them: lifecycle and info routes are
//! always reachable, everything else waits for a ready instance and most of
//! it requires a bearer token.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::{OpenApi, ToSchema};

use crate::{
    auth::{require_admin, require_jwt},
    config::Config,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

pub mod account;
pub mod info;
pub mod recipes;
pub mod saving_goals;
pub mod search;
pub mod setup;
pub mod system;
pub mod update;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    pub version: String,
}

#[utoipa::path(get, path = "/healthz", responses((status = 200, description = "Health")))]
pub async fn healthz() -> &'static str {
    "ok"
}

#[utoipa::path(get, path = "/version", responses((status = 200, body = VersionResponse)))]
pub async fn version(State(state): State<Arc<AppState>>) -> Json<VersionResponse> {
    Json(VersionResponse {
        version: state.app_version.to_string(),
    })
}

/// Answers 503 until setup (and any pending update) has finished.
pub async fn require_ready(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> ApiResult<Response> {
    if !state.instance_ready()? {
        return Err(ApiError::Unavailable(
            "HomeBook is not ready yet; finish setup or run the pending update".to_string(),
        ));
    }
    Ok(next.run(request).await)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        healthz,
        version,
        info::get_instance_info,
        info::get_instance_state,
        info::get_locales,
        setup::get_setup_availability,
        setup::start_setup,
        update::get_update_availability,
        update::start_update,
        setup::get_setup_configuration,
        account::login,
        account::me,
        account::change_password,
        account::list_preferences,
        account::get_preference,
        account::set_preference,
        account::delete_preference,
        system::list_users,
        system::create_user,
        system::get_user,
        system::delete_user,
        system::update_username,
        system::reset_password,
        system::set_admin,
        system::enable_user,
        system::disable_user,
        system::get_instance,
        system::set_instance_name,
        system::set_default_locale,
        saving_goals::list_goals,
        saving_goals::create_goal,
        saving_goals::get_goal,
        saving_goals::delete_goal,
        saving_goals::update_name,
        saving_goals::update_amounts,
        saving_goals::update_appearance,
        saving_goals::update_info,
        saving_goals::get_projection,
        saving_goals::calculate,
        recipes::list_recipes,
        recipes::create_recipe,
        recipes::get_recipe,
        recipes::delete_recipe,
        recipes::update_name,
        recipes::update_description,
        recipes::update_servings,
        recipes::update_duration,
        recipes::replace_ingredients,
        recipes::replace_steps,
        recipes::list_ingredients,
        search::search,
        search::modules,
    ),
    components(schemas(
        VersionResponse,
        info::LocalesResponse,
        setup::AvailabilityResponse,
        account::LoginRequest,
        account::LoginResponse,
    )),
    tags((name = "homebook"))
)]
pub struct ApiDoc;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let origins = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let openapi = ApiDoc::openapi();

    let lifecycle = Router::new()
        .route("/healthz", get(healthz))
        .route("/version", get(version))
        .merge(info::router())
        .merge(setup::router())
        .merge(update::router());

    let user = Router::new()
        .merge(account::user_router())
        .merge(saving_goals::router())
        .merge(recipes::router())
        .merge(search::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_jwt));

    let admin = system::router()
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_jwt));

    let gated = Router::new()
        .merge(account::login_router())
        .merge(user)
        .merge(admin)
        .route_layer(middleware::from_fn_with_state(state.clone(), require_ready));

    Router::new()
        .merge(lifecycle)
        .merge(gated)
        .route(
            "/openapi.json",
            get(move || {
                let doc = openapi.clone();
                async move { Json(doc) }
            }),
        )
        .with_state(state)
        .layer(cors_layer(config))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
