use serde::{Deserialize, Serialize};

/// Cache lifetime used when an upload carries no usable hint.
pub const DEFAULT_CACHE_MAX_AGE: i32 = 3600;

/// Response to a successful upload.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UploadResponse {
    /// Path within the bucket.
    #[schema(example = "0192f5d6-8d3a-7c3e-9a1e-000000000001/1718000000000.png")]
    pub path: String,
    /// `<bucket>/<path>`.
    #[schema(example = "pet-images/0192f5d6-8d3a-7c3e-9a1e-000000000001/1718000000000.png")]
    pub full_path: String,
    /// Public address of the object, built from the configured public URL.
    #[schema(example = "http://127.0.0.1:3000/storage/v1/object/public/pet-images/0192f5d6-8d3a-7c3e-9a1e-000000000001/1718000000000.png")]
    pub public_url: String,
}

/// Body of a bulk remove request.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RemoveRequest {
    pub prefixes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RemovedObject {
    pub path: String,
}

/// Parse a `Cache-Control` upload hint: `max-age=<n>` or a bare number.
pub fn parse_cache_hint(raw: Option<&str>) -> i32 {
    let Some(raw) = raw else {
        return DEFAULT_CACHE_MAX_AGE;
    };
    raw.split(',')
        .map(str::trim)
        .find_map(|directive| {
            directive
                .strip_prefix("max-age=")
                .unwrap_or(directive)
                .parse::<i32>()
                .ok()
        })
        .filter(|secs| *secs >= 0)
        .unwrap_or(DEFAULT_CACHE_MAX_AGE)
}
