use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/pets", pet_routes())
        .nest("/webhook-logs", webhook_log_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn pet_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::pet::list_pets,
            handlers::pet::create_pet
        ))
        .routes(routes!(
            handlers::pet::get_pet,
            handlers::pet::update_pet,
            handlers::pet::delete_pet
        ))
}

fn webhook_log_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::webhook_log::list_webhook_logs))
}
