mod error;
mod hash;
mod traits;

pub mod filesystem;
pub mod path;

pub use error::StorageError;
pub use hash::ContentHash;
pub use path::{ImageUrlError, ObjectKey, PathError};
pub use traits::{BlobStore, BoxReader, StoredObject};

/// Bucket holding uploaded pet images.
pub const PET_IMAGES_BUCKET: &str = "pet-images";

/// Largest accepted image, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;
