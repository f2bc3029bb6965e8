use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pet::{Gender, Pet};

/// Event tag written for every pet creation.
pub const PET_CREATED_EVENT: &str = "pet.created";

/// Message returned by the side-effect function on success.
pub const PET_CREATED_MESSAGE: &str = "Pet created webhook processed successfully";

/// Outcome tag of a webhook log row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Success,
    Failure,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            other => Err(format!("unknown log status '{other}'")),
        }
    }
}

/// Append-only audit row produced by the side-effect function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WebhookLog {
    pub id: Uuid,
    #[schema(example = "pet.created")]
    pub event_type: String,
    pub user_id: Uuid,
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
    pub status: LogStatus,
    pub created_at: DateTime<Utc>,
}

/// Caller identity as copied into the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EnvelopeUser {
    pub id: Uuid,
    pub email: String,
}

/// Public fields of the created pet as copied into the envelope.
///
/// Also the request body accepted by the side-effect function; owner and
/// update timestamp are ignored when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EnvelopePet {
    pub id: Uuid,
    pub name: String,
    pub species: String,
    pub breed: String,
    pub age: f64,
    pub weight: f64,
    pub color: String,
    pub gender: Gender,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Pet> for EnvelopePet {
    fn from(pet: &Pet) -> Self {
        Self {
            id: pet.id,
            name: pet.name.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone(),
            age: pet.age,
            weight: pet.weight,
            color: pet.color.clone(),
            gender: pet.gender,
            image_url: pet.image_url.clone(),
            notes: pet.notes.clone(),
            created_at: pet.created_at,
        }
    }
}

/// Notification envelope built by the side-effect function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PetCreatedEnvelope {
    #[schema(example = "pet.created")]
    pub event: String,
    pub timestamp: DateTime<Utc>,
    pub user: EnvelopeUser,
    pub pet: EnvelopePet,
}

impl PetCreatedEnvelope {
    pub fn new(user: EnvelopeUser, pet: EnvelopePet, timestamp: DateTime<Utc>) -> Self {
        Self {
            event: PET_CREATED_EVENT.to_string(),
            timestamp,
            user,
            pet,
        }
    }
}

/// Success body of the side-effect function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WebhookResponse {
    pub success: bool,
    pub message: String,
    pub data: PetCreatedEnvelope,
}

/// Failure body of the side-effect function (HTTP 500).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WebhookFailure {
    pub success: bool,
    pub error: String,
}
