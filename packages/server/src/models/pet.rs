use common::pet::Pet;

use crate::entity::pet;
use crate::error::AppError;

impl TryFrom<pet::Model> for Pet {
    type Error = AppError;

    fn try_from(m: pet::Model) -> Result<Self, Self::Error> {
        let gender = m
            .gender
            .parse()
            .map_err(|e| AppError::Internal(format!("pet {}: {e}", m.id)))?;
        Ok(Self {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
            species: m.species,
            breed: m.breed,
            age: m.age,
            weight: m.weight,
            color: m.color,
            gender,
            image_url: m.image_url,
            notes: m.notes,
            created_at: m.created_at,
            updated_at: m.updated_at,
        })
    }
}

/// Trim free text before it is stored.
pub fn clean(value: &str) -> String {
    value.trim().to_string()
}

/// Trim optional text, folding blank values to `None`.
pub fn clean_optional(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}
