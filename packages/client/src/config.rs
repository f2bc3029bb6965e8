use common::storage::PET_IMAGES_BUCKET;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Base URL of the pet server, without a trailing slash.
    pub base_url: String,
    /// Bucket images are uploaded to.
    pub bucket: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            bucket: PET_IMAGES_BUCKET.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let s = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("bucket", defaults.bucket)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            // Load from config/client.toml
            .add_source(File::with_name("config/client").required(false))
            // Override from environment (e.g., PETS_CLIENT__BASE_URL)
            .add_source(Environment::with_prefix("PETS_CLIENT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
