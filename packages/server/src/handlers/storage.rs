use axum::body::{Body, to_bytes};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::storage::path::public_object_url;
use common::storage::{ContentHash, ObjectKey};
use sea_orm::*;
use tokio_util::io::ReaderStream;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::entity::storage_object;
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::storage::{RemoveRequest, RemovedObject, UploadResponse, parse_cache_hint};
use crate::state::AppState;

const UPSERT_HEADER: &str = "x-upsert";

/// Store the raw request body as `<bucket>/<path>`.
///
/// The first path segment must be the caller's id. Without `x-upsert: true`
/// an existing object is a conflict.
#[instrument(skip(state, auth_user, headers, body), fields(user_id = %auth_user.user_id))]
pub async fn upload_object(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((bucket, path)): Path<(String, String)>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<UploadResponse>, AppError> {
    require_bucket(&state, &bucket)?;
    let key = ObjectKey::new(&bucket, &path)?;
    auth_user.require_owner(key.owner_prefix())?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| {
            mime_guess::from_path(key.path())
                .first_or_octet_stream()
                .to_string()
        });
    if !content_type.starts_with("image/") {
        return Err(AppError::Validation("Only image uploads are accepted".into()));
    }

    let upsert = headers
        .get(UPSERT_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));
    let cache_max_age = parse_cache_hint(
        headers
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok()),
    );

    // Drain modestly oversized bodies so the rejection reaches the client.
    let limit = state.config.storage.max_object_size;
    let too_large = || AppError::Validation(format!("Object exceeds maximum size of {limit} bytes"));
    let data = to_bytes(body, limit.saturating_mul(2) as usize)
        .await
        .map_err(|_| too_large())?;
    if data.len() as u64 > limit {
        return Err(too_large());
    }

    let existing = find_object(&state.db, &key).await?;
    if existing.is_some() && !upsert {
        return Err(AppError::Conflict("The resource already exists".into()));
    }

    let stored = state.blob_store.put(&key, &data, upsert).await?;

    let now = chrono::Utc::now();
    let saved = match existing {
        Some(row) => {
            let mut active: storage_object::ActiveModel = row.into();
            active.content_type = Set(content_type);
            active.cache_max_age = Set(cache_max_age);
            active.size = Set(stored.size as i64);
            active.content_hash = Set(stored.hash.to_hex());
            active.created_at = Set(now);
            active.update(&state.db).await
        }
        None => {
            storage_object::ActiveModel {
                id: Set(Uuid::now_v7()),
                bucket: Set(key.bucket().to_string()),
                path: Set(key.path().to_string()),
                owner_id: Set(auth_user.user_id),
                content_type: Set(content_type),
                cache_max_age: Set(cache_max_age),
                size: Set(stored.size as i64),
                content_hash: Set(stored.hash.to_hex()),
                created_at: Set(now),
            }
            .insert(&state.db)
            .await
        }
    };

    if let Err(e) = saved {
        // Keep bytes and metadata in step: a fresh blob without a row is dropped.
        if !upsert && let Err(cleanup) = state.blob_store.delete(&key).await {
            warn!("Failed to drop orphaned object {}: {}", key.full_path(), cleanup);
        }
        return Err(e.into());
    }

    tracing::info!(object = %key.full_path(), size = stored.size, "Stored object");

    Ok(Json(UploadResponse {
        path: key.path().to_string(),
        full_path: key.full_path(),
        public_url: public_object_url(&state.config.server.public_url, key.bucket(), key.path()),
    }))
}

/// Serve an object publicly with its stored content type and cache hint.
#[instrument(skip(state, headers))]
pub async fn download_public_object(
    State(state): State<AppState>,
    Path((bucket, path)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    require_bucket(&state, &bucket)?;
    let key = ObjectKey::new(&bucket, &path)?;

    let object = find_object(&state.db, &key)
        .await?
        .ok_or_else(|| AppError::NotFound("Object not found".into()))?;

    let hash = ContentHash::from_hex(&object.content_hash)?;
    let etag_value = hash.etag();
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && (val == etag_value || val == "*")
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let reader = state.blob_store.get_stream(&key).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, &object.content_type)
        .header(header::CONTENT_LENGTH, object.size.to_string())
        .header(header::ETAG, &etag_value)
        .header(
            header::CACHE_CONTROL,
            format!("max-age={}", object.cache_max_age),
        )
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

/// Remove the listed objects. Paths that do not exist are skipped.
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id, count = payload.prefixes.len()))]
pub async fn remove_objects(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(bucket): Path<String>,
    AppJson(payload): AppJson<RemoveRequest>,
) -> Result<Json<Vec<RemovedObject>>, AppError> {
    require_bucket(&state, &bucket)?;

    let keys = payload
        .prefixes
        .iter()
        .map(|p| ObjectKey::new(&bucket, p))
        .collect::<Result<Vec<_>, _>>()?;
    for key in &keys {
        auth_user.require_owner(key.owner_prefix())?;
    }

    let mut removed = Vec::with_capacity(keys.len());
    for key in keys {
        let had_blob = state.blob_store.delete(&key).await?;
        let rows = storage_object::Entity::delete_many()
            .filter(storage_object::Column::Bucket.eq(key.bucket()))
            .filter(storage_object::Column::Path.eq(key.path()))
            .exec(&state.db)
            .await?
            .rows_affected;

        if had_blob || rows > 0 {
            removed.push(RemovedObject {
                path: key.path().to_string(),
            });
        }
    }

    tracing::info!(removed = removed.len(), "Removed objects");
    Ok(Json(removed))
}

fn require_bucket(state: &AppState, bucket: &str) -> Result<(), AppError> {
    if bucket == state.config.storage.bucket {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("Bucket '{bucket}' not found")))
    }
}

async fn find_object<C: ConnectionTrait>(
    db: &C,
    key: &ObjectKey,
) -> Result<Option<storage_object::Model>, AppError> {
    Ok(storage_object::Entity::find()
        .filter(storage_object::Column::Bucket.eq(key.bucket()))
        .filter(storage_object::Column::Path.eq(key.path()))
        .one(db)
        .await?)
}
