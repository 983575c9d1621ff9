//! Main application router.

use crate::{
    controllers::{health_controller, user_controller},
    middleware::{error_request_id_middleware, logging_middleware, timeout_middleware},
    openapi::ApiDoc,
    state::AppState,
};
use axum::{middleware, Router};
use shaku::{HasComponent, Module};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use usergate_config::ServerConfig;
use usergate_repository::DatabasePoolInterface;
use usergate_service::UserService;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the application router from a Shaku module.
pub fn create_router<M>(module: &M, server_config: &ServerConfig) -> Router
where
    M: Module + HasComponent<dyn UserService> + HasComponent<dyn DatabasePoolInterface>,
{
    build_router(AppState::from_module(module), server_config)
}

/// Creates the application router around an already-built state.
///
/// Layers are listed innermost first: the request id is assigned before
/// anything else runs, and error bodies are stamped outside the timeout.
pub fn build_router(state: AppState, server_config: &ServerConfig) -> Router {
    let api_router = Router::new().nest("/users", user_controller::router());

    let router = Router::new()
        .merge(health_controller::router())
        .nest("/v1", api_router)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(
            server_config.request_timeout(),
            timeout_middleware,
        ))
        .layer(middleware::from_fn(error_request_id_middleware))
        .layer(create_cors_layer(server_config))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    info!("Router created with REST endpoints and Swagger UI at /swagger");
    router
}

fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if server_config.cors_enabled {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    }
}
