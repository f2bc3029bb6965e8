use common::pet::PetFieldError;
use common::storage::ImageUrlError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Rejected locally, before any request was made.
    #[error("{0}")]
    Validation(String),

    #[error("not signed in")]
    NotAuthenticated,

    /// The backing service answered with an error status.
    #[error("{code} ({status}): {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
    },

    #[error("transport error: {0}")]
    Transport(String),

    /// A response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<PetFieldError> for ClientError {
    fn from(err: PetFieldError) -> Self {
        ClientError::Validation(err.to_string())
    }
}

impl From<ImageUrlError> for ClientError {
    fn from(err: ImageUrlError) -> Self {
        ClientError::Validation(err.to_string())
    }
}
