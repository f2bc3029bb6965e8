//! User-facing messages, one per outcome.

pub const PET_ADDED: &str = "Pet added successfully! Webhook triggered.";
pub const PET_UPDATED: &str = "Pet updated successfully!";
pub const PET_DELETED: &str = "Pet deleted successfully!";
pub const SAVE_FAILED: &str = "Failed to save pet";
pub const DELETE_FAILED: &str = "Failed to delete pet";
pub const SIGNED_OUT: &str = "Signed out successfully";
pub const IMAGE_UPLOADED: &str = "Image uploaded successfully!";
pub const IMAGE_REMOVED: &str = "Image removed successfully!";
pub const UPLOAD_FAILED: &str = "Failed to upload image";
pub const REMOVE_FAILED: &str = "Failed to remove image";
pub const SELECT_IMAGE_FILE: &str = "Please select an image file";
pub const IMAGE_TOO_LARGE: &str = "Image size should be less than 5MB";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice::Success(message.into())
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice::Error(message.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Success(m) | Notice::Error(m) => m,
        }
    }
}
