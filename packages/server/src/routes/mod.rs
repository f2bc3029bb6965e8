mod v1;

use axum::Router;
use axum::routing::{delete, get, post};
use utoipa_axum::router::OpenApiRouter;

use crate::handlers;
use crate::state::AppState;

/// Documented JSON API under `/api`.
pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().nest("/v1", v1::routes())
}

/// Object storage under `/storage/v1`.
pub fn storage_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/object/public/{bucket}/{*path}",
            get(handlers::storage::download_public_object),
        )
        .route(
            "/object/{bucket}/{*path}",
            post(handlers::storage::upload_object),
        )
        .route("/object/{bucket}", delete(handlers::storage::remove_objects))
}

/// Side-effect functions under `/functions/v1`.
pub fn function_routes() -> Router<AppState> {
    Router::new().route(
        "/pet-created-webhook",
        post(handlers::function::pet_created_webhook).options(handlers::function::preflight),
    )
}
