use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, response::IntoResponse};
use common::pet::{NewPet, Pet, PetPatch};
use common::storage::path::owned_image_key;
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::pet;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::pet::{clean, clean_optional};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Pets",
    operation_id = "listPets",
    summary = "List the caller's pets",
    description = "Returns every pet owned by the authenticated user, newest first.",
    responses(
        (status = 200, description = "Owned pets", body = Vec<Pet>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_pets(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Pet>>, AppError> {
    let rows = pet::Entity::find()
        .filter(pet::Column::UserId.eq(auth_user.user_id))
        .order_by_desc(pet::Column::CreatedAt)
        .order_by_desc(pet::Column::Id)
        .all(&state.db)
        .await?;

    let pets = rows
        .into_iter()
        .map(Pet::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(pets))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Pets",
    operation_id = "createPet",
    summary = "Create a pet",
    description = "Creates a pet owned by the authenticated user. Any owner supplied in the body is ignored. An `image_url` inside the bucket must name a valid object under the caller's prefix.",
    request_body = NewPet,
    responses(
        (status = 201, description = "Pet created", body = Pet),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id, name = %payload.name))]
pub async fn create_pet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewPet>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    if let Some(url) = payload.image_url.as_deref() {
        owned_image_key(url, &state.config.storage.bucket, auth_user.user_id)?;
    }

    let now = chrono::Utc::now();
    let model = pet::ActiveModel {
        id: Set(Uuid::now_v7()),
        user_id: Set(auth_user.user_id),
        name: Set(clean(&payload.name)),
        species: Set(clean(&payload.species)),
        breed: Set(clean(&payload.breed)),
        age: Set(payload.age),
        weight: Set(payload.weight),
        color: Set(clean(&payload.color)),
        gender: Set(payload.gender.as_str().to_string()),
        image_url: Set(clean_optional(payload.image_url.as_deref())),
        notes: Set(clean_optional(payload.notes.as_deref())),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(pet_id = %model.id, "Created pet");

    Ok((StatusCode::CREATED, Json(Pet::try_from(model)?)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Pets",
    operation_id = "getPet",
    summary = "Get a pet by ID",
    params(("id" = Uuid, Path, description = "Pet ID")),
    responses(
        (status = 200, description = "Pet details", body = Pet),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Pet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id, %id))]
pub async fn get_pet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Pet>, AppError> {
    let model = find_owned_pet(&state.db, auth_user.user_id, id).await?;
    Ok(Json(Pet::try_from(model)?))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Pets",
    operation_id = "updatePet",
    summary = "Update a pet",
    description = "Partially updates a pet using PATCH semantics. `image_url` and `notes` accept `null` to clear. An empty payload returns the current record unchanged.",
    params(("id" = Uuid, Path, description = "Pet ID")),
    request_body = PetPatch,
    responses(
        (status = 200, description = "Pet updated", body = Pet),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Pet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = %auth_user.user_id, %id))]
pub async fn update_pet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<PetPatch>,
) -> Result<Json<Pet>, AppError> {
    payload.validate()?;
    if let Some(Some(url)) = payload.image_url.as_ref() {
        owned_image_key(url, &state.config.storage.bucket, auth_user.user_id)?;
    }

    if payload.is_empty() {
        let existing = find_owned_pet(&state.db, auth_user.user_id, id).await?;
        return Ok(Json(Pet::try_from(existing)?));
    }

    let txn = state.db.begin().await?;

    let existing = find_owned_pet(&txn, auth_user.user_id, id).await?;
    let mut active: pet::ActiveModel = existing.into();

    if let Some(ref name) = payload.name {
        active.name = Set(clean(name));
    }
    if let Some(ref species) = payload.species {
        active.species = Set(clean(species));
    }
    if let Some(ref breed) = payload.breed {
        active.breed = Set(clean(breed));
    }
    if let Some(age) = payload.age {
        active.age = Set(age);
    }
    if let Some(weight) = payload.weight {
        active.weight = Set(weight);
    }
    if let Some(ref color) = payload.color {
        active.color = Set(clean(color));
    }
    if let Some(gender) = payload.gender {
        active.gender = Set(gender.as_str().to_string());
    }
    if let Some(ref image_url) = payload.image_url {
        active.image_url = Set(clean_optional(image_url.as_deref()));
    }
    if let Some(ref notes) = payload.notes {
        active.notes = Set(clean_optional(notes.as_deref()));
    }
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(Pet::try_from(model)?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Pets",
    operation_id = "deletePet",
    summary = "Delete a pet",
    description = "Deletes the record only. Clients remove the pet's image from blob storage first.",
    params(("id" = Uuid, Path, description = "Pet ID")),
    responses(
        (status = 204, description = "Pet deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Pet not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = %auth_user.user_id, %id))]
pub async fn delete_pet(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let result = pet::Entity::delete_many()
        .filter(pet::Column::Id.eq(id))
        .filter(pet::Column::UserId.eq(auth_user.user_id))
        .exec(&state.db)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Pet not found".into()));
    }

    tracing::info!("Deleted pet");
    Ok(StatusCode::NO_CONTENT)
}

/// Another owner's record is reported exactly like a missing one.
async fn find_owned_pet<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    id: Uuid,
) -> Result<pet::Model, AppError> {
    pet::Entity::find_by_id(id)
        .filter(pet::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Pet not found".into()))
}
