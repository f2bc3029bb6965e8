//! Object paths inside a bucket and the public URLs that point at them.

use thiserror::Error;
use uuid::Uuid;

/// Maximum length of an object path within a bucket.
pub const MAX_OBJECT_PATH_LEN: usize = 512;

/// Reasons an object path is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Path cannot be empty")]
    Empty,
    #[error("Path exceeds maximum length of 512 characters")]
    TooLong,
    #[error("Path must not start or end with '/'")]
    EdgeSlash,
    #[error("Path must not contain empty segments")]
    EmptySegment,
    #[error("Path must not contain '..' traversal")]
    Traversal,
    #[error("Path segments must not start with '.'")]
    HiddenSegment,
    #[error("Path contains invalid characters (allowed: a-zA-Z0-9, /, -, _, .)")]
    InvalidCharacter,
}

/// Reasons a pet's image address is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ImageUrlError {
    #[error("image_url does not name a valid object: {0}")]
    InvalidObject(PathError),
    #[error("image_url points at another user's object")]
    ForeignOwner,
}

/// A validated `(bucket, path)` pair addressing one stored object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    bucket: String,
    path: String,
}

impl ObjectKey {
    pub fn new(bucket: &str, path: &str) -> Result<Self, PathError> {
        let bucket = validate_segment(bucket)?;
        let path = validate_object_path(path)?;
        Ok(Self {
            bucket: bucket.to_string(),
            path,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `<bucket>/<path>`, the form reported back to uploaders.
    pub fn full_path(&self) -> String {
        format!("{}/{}", self.bucket, self.path)
    }

    /// First path segment, which names the owning user.
    pub fn owner_prefix(&self) -> &str {
        self.path.split('/').next().unwrap_or_default()
    }
}

/// Validate and normalize an object path (`a/b/c.png`).
pub fn validate_object_path(path: &str) -> Result<String, PathError> {
    let trimmed = path.trim();

    if trimmed.is_empty() {
        return Err(PathError::Empty);
    }
    if trimmed.len() > MAX_OBJECT_PATH_LEN {
        return Err(PathError::TooLong);
    }
    if trimmed.starts_with('/') || trimmed.ends_with('/') {
        return Err(PathError::EdgeSlash);
    }
    for segment in trimmed.split('/') {
        validate_segment(segment)?;
    }

    Ok(trimmed.to_string())
}

fn validate_segment(segment: &str) -> Result<&str, PathError> {
    if segment.is_empty() {
        return Err(PathError::EmptySegment);
    }
    if segment == ".." {
        return Err(PathError::Traversal);
    }
    if segment.starts_with('.') {
        return Err(PathError::HiddenSegment);
    }
    if !segment
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(PathError::InvalidCharacter);
    }
    Ok(segment)
}

/// Derive the object path from a stored image address.
///
/// Splits the URL on `/`, finds the first segment equal to `bucket` and
/// joins everything after it. Returns `None` when the bucket segment is
/// absent or nothing follows it.
pub fn object_path_from_url(url: &str, bucket: &str) -> Option<String> {
    let parts: Vec<&str> = url.split('/').collect();
    let index = parts.iter().position(|part| *part == bucket)?;
    let path = parts[index + 1..].join("/");
    if path.is_empty() { None } else { Some(path) }
}

/// Check that `owner` will be able to remove the object behind `url`.
///
/// Addresses without the bucket segment are outside our storage and pass
/// with `None`. Addresses inside the bucket must name a valid object under
/// the owner's prefix.
pub fn owned_image_key(
    url: &str,
    bucket: &str,
    owner: Uuid,
) -> Result<Option<ObjectKey>, ImageUrlError> {
    let Some(path) = object_path_from_url(url, bucket) else {
        return Ok(None);
    };
    let key = ObjectKey::new(bucket, &path).map_err(ImageUrlError::InvalidObject)?;
    if key.owner_prefix() != owner.to_string() {
        return Err(ImageUrlError::ForeignOwner);
    }
    Ok(Some(key))
}

/// Storage path for a freshly uploaded image: `<user-id>/<epoch-millis>.<ext>`.
///
/// The extension is the text after the last `.` of the original file name,
/// or the whole name when it has no dot.
pub fn image_object_path(user_id: Uuid, epoch_millis: i64, file_name: &str) -> String {
    let extension = file_name.rsplit('.').next().unwrap_or(file_name);
    format!("{user_id}/{epoch_millis}.{extension}")
}

/// Public address of an object: `<base>/storage/v1/object/public/<bucket>/<path>`.
pub fn public_object_url(base_url: &str, bucket: &str, path: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{bucket}/{path}",
        base_url.trim_end_matches('/')
    )
}
