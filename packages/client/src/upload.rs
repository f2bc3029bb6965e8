use std::sync::Arc;

use common::storage::MAX_IMAGE_BYTES;
use common::storage::path::{image_object_path, object_path_from_url};
use tracing::{error, info};

use crate::backend::{BlobBucket, UploadOptions};
use crate::error::ClientError;
use crate::notice::{self, Notice};
use crate::session::SessionGate;

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Reject non-images and files over 5 MiB. Exactly 5 MiB is accepted.
pub fn validate_image(file: &ImageFile) -> Result<(), ClientError> {
    if !file.content_type.starts_with("image/") {
        return Err(ClientError::Validation(notice::SELECT_IMAGE_FILE.into()));
    }
    if file.size() > MAX_IMAGE_BYTES {
        return Err(ClientError::Validation(notice::IMAGE_TOO_LARGE.into()));
    }
    Ok(())
}

/// Uploads pet images and removes them again.
pub struct ImageUploader {
    blobs: Arc<dyn BlobBucket>,
    gate: SessionGate,
}

impl ImageUploader {
    pub fn new(blobs: Arc<dyn BlobBucket>, gate: SessionGate) -> Self {
        Self { blobs, gate }
    }

    /// Upload `file` under `<user-id>/<epoch-millis>.<ext>` and return its public URL.
    pub async fn upload(&self, file: &ImageFile) -> Result<String, ClientError> {
        validate_image(file)?;
        let session = self.gate.require()?;

        let path = image_object_path(
            session.user_id(),
            chrono::Utc::now().timestamp_millis(),
            &file.name,
        );
        let stored = self
            .blobs
            .upload(&session, &path, file, UploadOptions::default())
            .await?;

        info!(path = %stored, "Uploaded image");
        Ok(self.blobs.public_url(&stored))
    }

    /// Remove the object behind `image_url`.
    ///
    /// A URL without the bucket segment is not ours to delete and succeeds
    /// without a request.
    pub async fn remove(&self, image_url: &str) -> Result<(), ClientError> {
        let Some(path) = object_path_from_url(image_url, self.blobs.bucket()) else {
            return Ok(());
        };
        let session = self.gate.require()?;
        self.blobs.remove(&session, &[path]).await?;
        Ok(())
    }

    /// [`upload`](Self::upload), reported as a user-facing notice.
    pub async fn upload_with_notice(&self, file: &ImageFile) -> (Option<String>, Notice) {
        match self.upload(file).await {
            Ok(url) => (Some(url), Notice::success(notice::IMAGE_UPLOADED)),
            Err(ClientError::Validation(message)) => (None, Notice::error(message)),
            Err(e) => {
                error!("Error uploading image: {}", e);
                (None, Notice::error(notice::UPLOAD_FAILED))
            }
        }
    }

    /// [`remove`](Self::remove), reported as a user-facing notice. On success
    /// the caller clears its image reference.
    pub async fn remove_with_notice(&self, image_url: &str) -> Notice {
        match self.remove(image_url).await {
            Ok(()) => Notice::success(notice::IMAGE_REMOVED),
            Err(e) => {
                error!("Error removing image: {}", e);
                Notice::error(notice::REMOVE_FAILED)
            }
        }
    }
}
