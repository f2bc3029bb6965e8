use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Maximum length of the short free-text fields (name, species, breed, color).
pub const MAX_TEXT_LEN: usize = 100;
/// Maximum length of the notes field.
pub const MAX_NOTES_LEN: usize = 2000;
/// Maximum length of an image address.
pub const MAX_IMAGE_URL_LEN: usize = 2048;

/// A field-level validation failure on a pet payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PetFieldError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} must be a non-negative number")]
    Negative { field: &'static str },
    #[error("unknown gender '{0}', expected 'male' or 'female'")]
    UnknownGender(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = PetFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(PetFieldError::UnknownGender(other.to_string())),
        }
    }
}

/// A pet record as stored by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Pet {
    /// Record identifier (UUIDv7), generated by the record store.
    pub id: Uuid,
    /// Owning user, stamped from the authenticated session at creation.
    pub user_id: Uuid,
    #[schema(example = "Max")]
    pub name: String,
    #[schema(example = "Dog")]
    pub species: String,
    #[schema(example = "Golden Retriever")]
    pub breed: String,
    /// Age in years.
    #[schema(example = 3.0)]
    pub age: f64,
    /// Weight in kilograms.
    #[schema(example = 30.0)]
    pub weight: f64,
    #[schema(example = "Golden")]
    pub color: String,
    pub gender: Gender,
    /// Public address of the pet's image in blob storage.
    pub image_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a pet. The owner is never part of this payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NewPet {
    #[schema(example = "Max")]
    pub name: String,
    #[schema(example = "Dog")]
    pub species: String,
    #[schema(example = "Golden Retriever")]
    pub breed: String,
    #[schema(example = 3.0)]
    pub age: f64,
    #[schema(example = 30.0)]
    pub weight: f64,
    #[schema(example = "Golden")]
    pub color: String,
    pub gender: Gender,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewPet {
    pub fn validate(&self) -> Result<(), PetFieldError> {
        validate_required("name", &self.name)?;
        validate_required("species", &self.species)?;
        validate_text("breed", &self.breed, MAX_TEXT_LEN)?;
        validate_text("color", &self.color, MAX_TEXT_LEN)?;
        validate_measure("age", self.age)?;
        validate_measure("weight", self.weight)?;
        validate_optional_text("image_url", self.image_url.as_deref(), MAX_IMAGE_URL_LEN)?;
        validate_optional_text("notes", self.notes.as_deref(), MAX_NOTES_LEN)?;
        Ok(())
    }
}

/// Partial update of a pet (PATCH semantics).
///
/// `image_url` and `notes` distinguish "absent" (`None`) from "clear"
/// (`Some(None)`), which serializes as an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "double_option",
        skip_serializing_if = "Option::is_none"
    )]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

impl PetPatch {
    /// A patch that rewrites every editable field from a full form.
    pub fn from_form(form: &NewPet) -> Self {
        Self {
            name: Some(form.name.clone()),
            species: Some(form.species.clone()),
            breed: Some(form.breed.clone()),
            age: Some(form.age),
            weight: Some(form.weight),
            color: Some(form.color.clone()),
            gender: Some(form.gender),
            image_url: Some(form.image_url.clone()),
            notes: Some(form.notes.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<(), PetFieldError> {
        if let Some(name) = &self.name {
            validate_required("name", name)?;
        }
        if let Some(species) = &self.species {
            validate_required("species", species)?;
        }
        if let Some(breed) = &self.breed {
            validate_text("breed", breed, MAX_TEXT_LEN)?;
        }
        if let Some(color) = &self.color {
            validate_text("color", color, MAX_TEXT_LEN)?;
        }
        if let Some(age) = self.age {
            validate_measure("age", age)?;
        }
        if let Some(weight) = self.weight {
            validate_measure("weight", weight)?;
        }
        if let Some(url) = &self.image_url {
            validate_optional_text("image_url", url.as_deref(), MAX_IMAGE_URL_LEN)?;
        }
        if let Some(notes) = &self.notes {
            validate_optional_text("notes", notes.as_deref(), MAX_NOTES_LEN)?;
        }
        Ok(())
    }
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

fn validate_required(field: &'static str, value: &str) -> Result<(), PetFieldError> {
    if value.trim().is_empty() {
        return Err(PetFieldError::Empty { field });
    }
    validate_text(field, value, MAX_TEXT_LEN)
}

fn validate_text(field: &'static str, value: &str, max: usize) -> Result<(), PetFieldError> {
    if value.trim().chars().count() > max {
        return Err(PetFieldError::TooLong { field, max });
    }
    Ok(())
}

fn validate_optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), PetFieldError> {
    match value {
        Some(v) => validate_text(field, v, max),
        None => Ok(()),
    }
}

fn validate_measure(field: &'static str, value: f64) -> Result<(), PetFieldError> {
    if !value.is_finite() || value < 0.0 {
        return Err(PetFieldError::Negative { field });
    }
    Ok(())
}
