use axum::{Json, extract::State};
use common::webhook::WebhookLog;
use sea_orm::*;
use tracing::instrument;

use crate::entity::webhook_log;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppQuery;
use crate::models::webhook_log::WebhookLogQuery;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Webhook Logs",
    operation_id = "listWebhookLogs",
    summary = "Recent webhook log rows",
    description = "Returns the caller's most recent side-effect log rows, newest first. `limit` defaults to 10 and is clamped to 1-10.",
    params(WebhookLogQuery),
    responses(
        (status = 200, description = "Log rows", body = Vec<WebhookLog>),
        (status = 400, description = "Malformed query (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(user_id = %auth_user.user_id))]
pub async fn list_webhook_logs(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<WebhookLogQuery>,
) -> Result<Json<Vec<WebhookLog>>, AppError> {
    let rows = webhook_log::Entity::find()
        .filter(webhook_log::Column::UserId.eq(auth_user.user_id))
        .order_by_desc(webhook_log::Column::CreatedAt)
        .order_by_desc(webhook_log::Column::Id)
        .limit(query.effective_limit())
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(WebhookLog::from).collect()))
}
