use std::io::Cursor;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;
use super::hash::ContentHash;
use super::path::ObjectKey;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Result of a successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredObject {
    pub hash: ContentHash,
    pub size: u64,
}

/// Path-addressed blob storage, one namespace per bucket.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under `key`.
    ///
    /// Fails with [`StorageError::AlreadyExists`] when the object exists and
    /// `overwrite` is false.
    async fn put(
        &self,
        key: &ObjectKey,
        data: &[u8],
        overwrite: bool,
    ) -> Result<StoredObject, StorageError> {
        let reader: BoxReader = Box::new(Cursor::new(data.to_vec()));
        self.put_stream(key, reader, overwrite).await
    }

    /// Store data from an async reader under `key`.
    async fn put_stream(
        &self,
        key: &ObjectKey,
        reader: BoxReader,
        overwrite: bool,
    ) -> Result<StoredObject, StorageError>;

    /// Retrieve all bytes of an object.
    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.get_stream(key).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Retrieve an object as a streaming async reader.
    async fn get_stream(&self, key: &ObjectKey) -> Result<BoxReader, StorageError>;

    /// Delete an object.
    ///
    /// Returns `true` if the object was deleted, `false` if it did not exist.
    async fn delete(&self, key: &ObjectKey) -> Result<bool, StorageError>;
}
