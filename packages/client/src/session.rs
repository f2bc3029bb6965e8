use chrono::{DateTime, Duration, Utc};
use common::auth::{TokenResponse, UserInfo};
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::ClientError;

/// An authenticated session issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub user: UserInfo,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn from_token(token: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        Self {
            access_token: token.access_token,
            user: token.user,
            expires_at: issued_at + Duration::seconds(token.expires_in),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

fn live(session: Option<Session>) -> Option<Session> {
    session.filter(|s| !s.is_expired(Utc::now()))
}

/// Publishing side of the session channel, held by the identity provider.
pub type SessionPublisher = watch::Sender<Option<Session>>;

/// Read side of the session channel.
///
/// Every operation that touches the backing services asks the gate for the
/// current session first and fails fast when there is none.
#[derive(Debug, Clone)]
pub struct SessionGate {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionGate {
    pub fn new(rx: watch::Receiver<Option<Session>>) -> Self {
        Self { rx }
    }

    /// The published session, or `None` once its token has expired.
    pub fn current(&self) -> Option<Session> {
        live(self.rx.borrow().clone())
    }

    pub fn require(&self) -> Result<Session, ClientError> {
        self.current().ok_or(ClientError::NotAuthenticated)
    }

    /// Wait for the next session change.
    ///
    /// Returns `None` once the publisher is gone.
    pub async fn changed(&mut self) -> Option<Option<Session>> {
        self.rx.changed().await.ok()?;
        Some(live(self.rx.borrow_and_update().clone()))
    }

    /// Treat the current value as already delivered, so the next
    /// [`changed`](Self::changed) only fires for a later publish.
    pub fn mark_seen(&mut self) {
        self.rx.borrow_and_update();
    }
}

/// A fresh channel with no session.
pub fn session_channel() -> (SessionPublisher, SessionGate) {
    let (tx, rx) = watch::channel(None);
    (tx, SessionGate::new(rx))
}
