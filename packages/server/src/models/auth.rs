use common::auth::Credentials;

use crate::error::AppError;

const MAX_EMAIL_LEN: usize = 254;

/// Trimmed, lowercased email used as the account key.
pub fn normalized_email(payload: &Credentials) -> String {
    payload.email.trim().to_lowercase()
}

pub fn validate_register_request(payload: &Credentials) -> Result<(), AppError> {
    let email = payload.email.trim();
    if email.is_empty() || email.chars().count() > MAX_EMAIL_LEN || !email.contains('@') {
        return Err(AppError::Validation(
            "Email must be a valid address of at most 254 characters".into(),
        ));
    }
    if payload.password.len() < 8 || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_login_request(payload: &Credentials) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}
