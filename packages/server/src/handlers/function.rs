use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderName, StatusCode, header};
use axum::response::{IntoResponse, Response};
use common::webhook::{
    EnvelopePet, EnvelopeUser, LogStatus, PET_CREATED_EVENT, PET_CREATED_MESSAGE,
    PetCreatedEnvelope, WebhookFailure, WebhookResponse,
};
use sea_orm::*;
use serde_json::json;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::entity::{user, webhook_log};
use crate::state::AppState;
use crate::utils::jwt;

/// Headers carried by every response of the function.
pub const CORS_HEADERS: [(HeaderName, &str); 2] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        "authorization, x-client-info, apikey, content-type",
    ),
];

#[derive(Debug)]
pub enum FunctionError {
    Unauthorized,
    /// Anything after authentication; the message is returned to the caller.
    Failed(String),
}

impl IntoResponse for FunctionError {
    fn into_response(self) -> Response {
        match self {
            FunctionError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                CORS_HEADERS,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
            FunctionError::Failed(message) => {
                error!("Webhook error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    CORS_HEADERS,
                    Json(WebhookFailure {
                        success: false,
                        error: message,
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Status recorded for a delivery.
///
/// Every current path passes `None` and logs `success`; a delivery step that
/// can fail reports its error here.
pub fn delivery_status(delivery_error: Option<&str>) -> LogStatus {
    match delivery_error {
        None => LogStatus::Success,
        Some(_) => LogStatus::Failure,
    }
}

/// CORS preflight.
pub async fn preflight() -> impl IntoResponse {
    (StatusCode::OK, CORS_HEADERS)
}

/// Handle a `pet.created` notification for the calling user.
///
/// Builds the envelope, appends one log row and echoes the envelope back.
/// A failed log insert is logged and does not change the response.
#[instrument(skip_all)]
pub async fn pet_created_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, FunctionError> {
    let caller = resolve_caller(&state, &headers).await?;

    let pet: EnvelopePet = serde_json::from_slice(&body)
        .map_err(|e| FunctionError::Failed(format!("Invalid pet payload: {e}")))?;

    info!(pet_id = %pet.id, pet_name = %pet.name, user_id = %caller.id, "Pet created webhook triggered");

    let envelope = PetCreatedEnvelope::new(caller, pet, chrono::Utc::now());
    let payload = serde_json::to_value(&envelope)
        .map_err(|e| FunctionError::Failed(e.to_string()))?;

    let status = delivery_status(None);
    let log = webhook_log::ActiveModel {
        id: Set(Uuid::now_v7()),
        event_type: Set(PET_CREATED_EVENT.to_string()),
        user_id: Set(envelope.user.id),
        payload: Set(payload),
        status: Set(status.as_str().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    if let Err(e) = log.insert(&state.db).await {
        error!("Error logging webhook: {}", e);
    }

    Ok((
        StatusCode::OK,
        CORS_HEADERS,
        Json(WebhookResponse {
            success: true,
            message: PET_CREATED_MESSAGE.to_string(),
            data: envelope,
        }),
    ))
}

/// Re-derive the caller from the forwarded bearer token.
async fn resolve_caller(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<EnvelopeUser, FunctionError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(FunctionError::Unauthorized)?;

    let claims = jwt::verify(token, &state.config.auth.jwt_secret)
        .map_err(|_| FunctionError::Unauthorized)?;

    let user = user::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await
        .map_err(|e| {
            warn!("Caller lookup failed: {}", e);
            FunctionError::Unauthorized
        })?
        .ok_or(FunctionError::Unauthorized)?;

    Ok(EnvelopeUser {
        id: user.id,
        email: user.email,
    })
}
