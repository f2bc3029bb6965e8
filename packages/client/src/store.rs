use std::sync::Arc;

use common::pet::{NewPet, Pet, PetPatch};
use common::storage::path::{object_path_from_url, owned_image_key};
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::backend::{BlobBucket, RecordStore};
use crate::error::ClientError;
use crate::session::SessionGate;
use crate::side_effect::{SideEffectDispatcher, SideEffectReport};

/// Client-side mirror of the caller's pet records.
///
/// The mirror is only written after the backing record store has confirmed
/// the change, so a failed call leaves it exactly as it was.
pub struct PetStore {
    gate: SessionGate,
    records: Arc<dyn RecordStore>,
    blobs: Arc<dyn BlobBucket>,
    side_effects: SideEffectDispatcher,
    pets: Vec<Pet>,
    error: Option<String>,
}

impl PetStore {
    pub fn new(
        gate: SessionGate,
        records: Arc<dyn RecordStore>,
        blobs: Arc<dyn BlobBucket>,
        side_effects: SideEffectDispatcher,
    ) -> Self {
        Self {
            gate,
            records,
            blobs,
            side_effects,
            pets: Vec::new(),
            error: None,
        }
    }

    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    /// Message from the last failed [`list`](Self::list), if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn get(&self, id: Uuid) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id == id)
    }

    pub fn clear(&mut self) {
        self.pets.clear();
        self.error = None;
    }

    /// Reload the mirror from the record store.
    ///
    /// Never fails: without a session the mirror is emptied, and a backing
    /// error is recorded in [`error`](Self::error) with the mirror untouched.
    #[instrument(skip(self))]
    pub async fn list(&mut self) -> &[Pet] {
        let Some(session) = self.gate.current() else {
            self.clear();
            return &self.pets;
        };

        match self.records.list_pets(&session).await {
            Ok(pets) => {
                self.pets = pets;
                self.error = None;
            }
            Err(e) => {
                error!("Error fetching pets: {}", e);
                self.error = Some(e.to_string());
            }
        }
        &self.pets
    }

    /// Create a record, put it at the head of the mirror and fire the
    /// `pet-created` side effect.
    ///
    /// A bucket image URL must name an object the caller could later remove.
    ///
    /// The returned handle resolves to the side effect's report; its outcome
    /// never affects the created record.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create(
        &mut self,
        form: NewPet,
    ) -> Result<(Pet, JoinHandle<SideEffectReport>), ClientError> {
        form.validate()?;
        let session = self.gate.require()?;
        if let Some(url) = form.image_url.as_deref() {
            owned_image_key(url, self.blobs.bucket(), session.user_id())?;
        }

        let pet = self.records.insert_pet(&session, &form).await?;
        self.pets.insert(0, pet.clone());
        info!(pet_id = %pet.id, "Created pet");

        let report = self.side_effects.dispatch(session, pet.clone());
        Ok((pet, report))
    }

    /// Apply a partial update and replace the mirrored record in place.
    #[instrument(skip(self, patch))]
    pub async fn update(&mut self, id: Uuid, patch: PetPatch) -> Result<Pet, ClientError> {
        patch.validate()?;
        let session = self.gate.require()?;
        if let Some(Some(url)) = patch.image_url.as_ref() {
            owned_image_key(url, self.blobs.bucket(), session.user_id())?;
        }

        let updated = self.records.update_pet(&session, id, &patch).await?;
        if let Some(slot) = self.pets.iter_mut().find(|p| p.id == id) {
            *slot = updated.clone();
        }
        Ok(updated)
    }

    /// Delete a record, removing its stored image first.
    ///
    /// An image URL without the bucket segment is left alone. A failed image
    /// removal aborts the delete.
    #[instrument(skip(self))]
    pub async fn delete(&mut self, id: Uuid) -> Result<(), ClientError> {
        let session = self.gate.require()?;

        let image_path = self
            .get(id)
            .and_then(|pet| pet.image_url.as_deref())
            .and_then(|url| object_path_from_url(url, self.blobs.bucket()));
        if let Some(path) = image_path {
            self.blobs.remove(&session, &[path]).await?;
        }

        self.records.delete_pet(&session, id).await?;
        self.pets.retain(|p| p.id != id);
        info!("Deleted pet");
        Ok(())
    }
}
