//! Application state: the session-driven view over the pet mirror.

use common::auth::{Credentials, UserInfo};
use common::pet::{NewPet, Pet, PetPatch};
use common::webhook::WebhookLog;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::backend::Services;
use crate::error::ClientError;
use crate::logs::WebhookLogFeed;
use crate::notice::{self, Notice};
use crate::search::{PetStats, filter_pets};
use crate::session::{Session, SessionGate};
use crate::side_effect::{SideEffectDispatcher, SideEffectReport};
use crate::store::PetStore;
use crate::upload::ImageUploader;

/// What the user is currently looking at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Session not resolved yet.
    Loading,
    SignedOut,
    SignedIn(UserInfo),
}

pub struct App {
    services: Services,
    gate: SessionGate,
    view: View,
    pets: PetStore,
    logs: WebhookLogFeed,
    images: ImageUploader,
    query: String,
    pending: Vec<JoinHandle<SideEffectReport>>,
    reports: mpsc::UnboundedReceiver<SideEffectReport>,
}

impl App {
    pub fn new(services: Services) -> Self {
        let gate = services.identity.subscribe();
        let (dispatcher, reports) = SideEffectDispatcher::new(services.functions.clone());
        let pets = PetStore::new(
            gate.clone(),
            services.records.clone(),
            services.blobs.clone(),
            dispatcher,
        );
        let logs = WebhookLogFeed::new(services.records.clone());
        let images = ImageUploader::new(services.blobs.clone(), gate.clone());

        Self {
            services,
            gate,
            view: View::Loading,
            pets,
            logs,
            images,
            query: String::new(),
            pending: Vec::new(),
            reports,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn pets(&self) -> &PetStore {
        &self.pets
    }

    pub fn logs(&self) -> &[WebhookLog] {
        self.logs.entries()
    }

    pub fn images(&self) -> &ImageUploader {
        &self.images
    }

    /// Resolve the initial view from whatever session already exists.
    pub async fn load(&mut self) {
        let session = self.gate.current();
        self.apply_session(session).await;
    }

    /// Move to the view matching `session`, reloading pets and logs on sign-in.
    pub async fn apply_session(&mut self, session: Option<Session>) {
        match session {
            Some(session) => {
                info!(user_id = %session.user_id(), "Session active");
                self.view = View::SignedIn(session.user.clone());
                self.pets.list().await;
                self.logs.refresh(&session).await;
            }
            None => {
                self.view = View::SignedOut;
                self.pets.clear();
                self.logs.clear();
            }
        }
    }

    /// Apply every session change until the identity provider goes away.
    ///
    /// Changes already applied by [`sign_in`](Self::sign_in) or
    /// [`sign_out`](Self::sign_out) are not applied twice.
    pub async fn follow(&mut self) {
        while let Some(session) = self.gate.changed().await {
            self.apply_session(session).await;
        }
    }

    pub async fn sign_up(&self, credentials: &Credentials) -> Result<UserInfo, ClientError> {
        self.services.identity.sign_up(credentials).await
    }

    pub async fn sign_in(&mut self, credentials: &Credentials) -> Result<(), ClientError> {
        let session = self.services.identity.sign_in(credentials).await?;
        self.gate.mark_seen();
        self.apply_session(Some(session)).await;
        Ok(())
    }

    pub async fn sign_out(&mut self) -> Notice {
        self.services.identity.sign_out().await;
        self.gate.mark_seen();
        self.apply_session(None).await;
        Notice::success(notice::SIGNED_OUT)
    }

    /// Submit the pet form: create when `editing` is `None`, otherwise
    /// rewrite the record being edited.
    pub async fn save_pet(&mut self, editing: Option<Uuid>, form: NewPet) -> Notice {
        let result = match editing {
            Some(id) => {
                let patch = PetPatch::from_form(&form);
                self.pets
                    .update(id, patch)
                    .await
                    .map(|_| notice::PET_UPDATED)
            }
            None => match self.pets.create(form).await {
                Ok((_, side_effect)) => {
                    self.track(side_effect);
                    self.refresh_logs().await;
                    Ok(notice::PET_ADDED)
                }
                Err(e) => Err(e),
            },
        };

        match result {
            Ok(message) => Notice::success(message),
            Err(ClientError::Validation(message)) => Notice::error(message),
            Err(e) => {
                error!("Error saving pet: {}", e);
                Notice::error(notice::SAVE_FAILED)
            }
        }
    }

    pub async fn delete_pet(&mut self, id: Uuid) -> Notice {
        match self.pets.delete(id).await {
            Ok(()) => Notice::success(notice::PET_DELETED),
            Err(e) => {
                error!("Error deleting pet: {}", e);
                Notice::error(notice::DELETE_FAILED)
            }
        }
    }

    /// Form contents for editing an existing record.
    pub fn edit_form(&self, id: Uuid) -> Option<NewPet> {
        self.pets.get(id).map(form_from_pet)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn filtered_pets(&self) -> Vec<&Pet> {
        filter_pets(self.pets.pets(), &self.query)
    }

    /// Figures over all pets, independent of the search query.
    pub fn stats(&self) -> PetStats {
        PetStats::of(self.pets.pets())
    }

    /// Wait for outstanding side effects and collect the reports not yet
    /// dropped by a later save.
    ///
    /// Refreshes the log feed when anything was outstanding.
    pub async fn settle_side_effects(&mut self) -> Vec<SideEffectReport> {
        let outstanding = !self.pending.is_empty();
        for handle in self.pending.drain(..) {
            if let Err(e) = handle.await {
                warn!("Side effect task did not finish: {}", e);
            }
        }

        let mut reports = Vec::new();
        while let Ok(report) = self.reports.try_recv() {
            reports.push(report);
        }
        if outstanding || !reports.is_empty() {
            self.refresh_logs().await;
        }
        reports
    }

    /// Number of side effects not yet collected by
    /// [`settle_side_effects`](Self::settle_side_effects).
    pub fn pending_side_effects(&self) -> usize {
        self.pending.len()
    }

    /// Keep `handle` until it settles. Finished handles and their reports
    /// are dropped here, so neither grows while nobody settles. The
    /// dispatcher has already logged their outcome.
    fn track(&mut self, handle: JoinHandle<SideEffectReport>) {
        self.pending.retain(|h| !h.is_finished());
        while self.reports.try_recv().is_ok() {}
        self.pending.push(handle);
    }

    async fn refresh_logs(&mut self) {
        if let Some(session) = self.gate.current() {
            self.logs.refresh(&session).await;
        }
    }
}

fn form_from_pet(pet: &Pet) -> NewPet {
    NewPet {
        name: pet.name.clone(),
        species: pet.species.clone(),
        breed: pet.breed.clone(),
        age: pet.age,
        weight: pet.weight,
        color: pet.color.clone(),
        gender: pet.gender,
        image_url: pet.image_url.clone(),
        notes: pet.notes.clone(),
    }
}
