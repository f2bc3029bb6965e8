//! Reqwest-backed adapter for all four backing services.
//!
//! Owns transport details only: URLs, bearer headers, status mapping and
//! JSON decoding.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use common::auth::{Credentials, TokenResponse, UserInfo};
use common::pet::{NewPet, Pet, PetPatch};
use common::storage::path::public_object_url;
use common::webhook::{WebhookLog, WebhookResponse};
use reqwest::{Client, RequestBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::{BlobBucket, IdentityProvider, RecordStore, SideEffectFunction, UploadOptions};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::{Session, SessionGate, SessionPublisher};
use crate::upload::ImageFile;

#[derive(Deserialize)]
struct UploadReply {
    path: String,
}

#[derive(Deserialize)]
struct RemovedReply {
    path: String,
}

#[derive(Serialize)]
struct RemoveBody<'a> {
    prefixes: &'a [String],
}

/// Error shapes the server answers with: `{code, message}` from the API and
/// storage routes, `{error}` from the function route.
#[derive(Deserialize)]
struct ErrorReply {
    code: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

pub struct HttpBackend {
    client: Client,
    base_url: String,
    bucket: String,
    sessions: SessionPublisher,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] when the reqwest client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        let (sessions, _) = watch::channel(None);
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bucket: config.bucket,
            sessions,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authed(&self, builder: RequestBuilder, session: &Session) -> RequestBuilder {
        builder.bearer_auth(&session.access_token)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let body = self.send_raw(builder).await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn send_raw(&self, builder: RequestBuilder) -> Result<Vec<u8>, ClientError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, &body));
        }
        Ok(body.to_vec())
    }
}

fn map_transport_error(err: reqwest::Error) -> ClientError {
    ClientError::Transport(err.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ClientError {
    let reply = serde_json::from_slice::<ErrorReply>(body).ok();
    let (code, message) = match reply {
        Some(ErrorReply {
            code: Some(code),
            message,
            ..
        }) => (code, message.unwrap_or_default()),
        Some(ErrorReply {
            error: Some(error), ..
        }) => (default_code(status), error),
        _ => (
            default_code(status),
            String::from_utf8_lossy(body).into_owned(),
        ),
    };
    ClientError::Service {
        status: status.as_u16(),
        code,
        message,
    }
}

fn default_code(status: StatusCode) -> String {
    match status {
        StatusCode::UNAUTHORIZED => "UNAUTHORIZED".into(),
        StatusCode::NOT_FOUND => "NOT_FOUND".into(),
        s if s.is_server_error() => "INTERNAL_ERROR".into(),
        _ => "HTTP_ERROR".into(),
    }
}

#[async_trait]
impl IdentityProvider for HttpBackend {
    async fn sign_up(&self, credentials: &Credentials) -> Result<UserInfo, ClientError> {
        let request = self
            .client
            .post(self.url("/api/v1/auth/register"))
            .json(credentials);
        let user: UserInfo = self.send(request).await?;
        info!(user_id = %user.id, "Signed up");
        Ok(user)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, ClientError> {
        let request = self
            .client
            .post(self.url("/api/v1/auth/login"))
            .json(credentials);
        let token: TokenResponse = self.send(request).await?;
        let session = Session::from_token(token, Utc::now());
        info!(user_id = %session.user_id(), "Signed in");
        self.sessions.send_replace(Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) {
        self.sessions.send_replace(None);
        info!("Signed out");
    }

    fn subscribe(&self) -> SessionGate {
        SessionGate::new(self.sessions.subscribe())
    }
}

#[async_trait]
impl RecordStore for HttpBackend {
    async fn list_pets(&self, session: &Session) -> Result<Vec<Pet>, ClientError> {
        let request = self.authed(self.client.get(self.url("/api/v1/pets")), session);
        self.send(request).await
    }

    async fn insert_pet(&self, session: &Session, pet: &NewPet) -> Result<Pet, ClientError> {
        let request = self.authed(self.client.post(self.url("/api/v1/pets")), session);
        self.send(request.json(pet)).await
    }

    async fn update_pet(
        &self,
        session: &Session,
        id: Uuid,
        patch: &PetPatch,
    ) -> Result<Pet, ClientError> {
        let url = self.url(&format!("/api/v1/pets/{id}"));
        let request = self.authed(self.client.patch(url), session);
        self.send(request.json(patch)).await
    }

    async fn delete_pet(&self, session: &Session, id: Uuid) -> Result<(), ClientError> {
        let url = self.url(&format!("/api/v1/pets/{id}"));
        let request = self.authed(self.client.delete(url), session);
        self.send_raw(request).await?;
        Ok(())
    }

    async fn recent_logs(
        &self,
        session: &Session,
        limit: u64,
    ) -> Result<Vec<WebhookLog>, ClientError> {
        let request = self
            .authed(self.client.get(self.url("/api/v1/webhook-logs")), session)
            .query(&[("limit", limit)]);
        self.send(request).await
    }
}

#[async_trait]
impl BlobBucket for HttpBackend {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload(
        &self,
        session: &Session,
        path: &str,
        file: &ImageFile,
        options: UploadOptions,
    ) -> Result<String, ClientError> {
        let url = self.url(&format!("/storage/v1/object/{}/{path}", self.bucket));
        let request = self
            .authed(self.client.post(url), session)
            .header(header::CONTENT_TYPE, file.content_type.as_str())
            .header(
                header::CACHE_CONTROL,
                format!("max-age={}", options.cache_control_secs),
            )
            .header("x-upsert", options.upsert.to_string())
            .body(file.bytes.clone());
        let reply: UploadReply = self.send(request).await?;
        debug!(path = %reply.path, size = file.size(), "Stored object");
        Ok(reply.path)
    }

    async fn remove(
        &self,
        session: &Session,
        paths: &[String],
    ) -> Result<Vec<String>, ClientError> {
        let url = self.url(&format!("/storage/v1/object/{}", self.bucket));
        let request = self
            .authed(self.client.delete(url), session)
            .json(&RemoveBody { prefixes: paths });
        let removed: Vec<RemovedReply> = self.send(request).await?;
        Ok(removed.into_iter().map(|r| r.path).collect())
    }

    fn public_url(&self, path: &str) -> String {
        public_object_url(&self.base_url, &self.bucket, path)
    }
}

#[async_trait]
impl SideEffectFunction for HttpBackend {
    async fn pet_created(
        &self,
        session: &Session,
        pet: &Pet,
    ) -> Result<WebhookResponse, ClientError> {
        let request = self
            .authed(
                self.client
                    .post(self.url("/functions/v1/pet-created-webhook")),
                session,
            )
            .json(pet);
        self.send(request).await
    }
}
