//! Ports for the four backing services.
//!
//! The HTTP implementation lives in [`crate::http`]; tests substitute an
//! in-memory fake.

use std::sync::Arc;

use async_trait::async_trait;
use common::auth::{Credentials, UserInfo};
use common::pet::{NewPet, Pet, PetPatch};
use common::webhook::{WebhookLog, WebhookResponse};
use uuid::Uuid;

use crate::error::ClientError;
use crate::session::{Session, SessionGate};
use crate::upload::ImageFile;

/// Upload parameters sent with each object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    pub cache_control_secs: u32,
    pub upsert: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            cache_control_secs: 3600,
            upsert: false,
        }
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, credentials: &Credentials) -> Result<UserInfo, ClientError>;

    /// Sign in and publish the new session to every subscriber.
    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, ClientError>;

    /// Drop the current session and publish the change.
    async fn sign_out(&self);

    /// Subscribe to session changes.
    fn subscribe(&self) -> SessionGate;
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Owner's pets, newest first.
    async fn list_pets(&self, session: &Session) -> Result<Vec<Pet>, ClientError>;

    async fn insert_pet(&self, session: &Session, pet: &NewPet) -> Result<Pet, ClientError>;

    async fn update_pet(
        &self,
        session: &Session,
        id: Uuid,
        patch: &PetPatch,
    ) -> Result<Pet, ClientError>;

    async fn delete_pet(&self, session: &Session, id: Uuid) -> Result<(), ClientError>;

    /// Most recent webhook log rows, newest first.
    async fn recent_logs(
        &self,
        session: &Session,
        limit: u64,
    ) -> Result<Vec<WebhookLog>, ClientError>;
}

#[async_trait]
pub trait BlobBucket: Send + Sync {
    fn bucket(&self) -> &str;

    /// Store `file` at `path`, returning the stored path.
    async fn upload(
        &self,
        session: &Session,
        path: &str,
        file: &ImageFile,
        options: UploadOptions,
    ) -> Result<String, ClientError>;

    /// Remove objects by path, returning the paths that existed.
    async fn remove(&self, session: &Session, paths: &[String])
    -> Result<Vec<String>, ClientError>;

    fn public_url(&self, path: &str) -> String;
}

#[async_trait]
pub trait SideEffectFunction: Send + Sync {
    async fn pet_created(&self, session: &Session, pet: &Pet)
    -> Result<WebhookResponse, ClientError>;
}

/// The backing services one application instance talks to.
#[derive(Clone)]
pub struct Services {
    pub identity: Arc<dyn IdentityProvider>,
    pub records: Arc<dyn RecordStore>,
    pub blobs: Arc<dyn BlobBucket>,
    pub functions: Arc<dyn SideEffectFunction>,
}

impl Services {
    /// All four ports served by one implementation.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: IdentityProvider + RecordStore + BlobBucket + SideEffectFunction + 'static,
    {
        Self {
            identity: backend.clone(),
            records: backend.clone(),
            blobs: backend.clone(),
            functions: backend,
        }
    }
}
