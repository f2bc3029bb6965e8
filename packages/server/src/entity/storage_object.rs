use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Metadata for one object held by the blob store. The bytes live on disk.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "storage_object")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub bucket: String,
    /// Path within the bucket, `<owner-id>/<file>`.
    pub path: String,
    pub owner_id: Uuid,

    pub content_type: String,
    /// Seconds clients may cache the object for.
    pub cache_max_age: i32,
    pub size: i64,
    /// SHA-256 hex digest, served as the ETag.
    pub content_hash: String,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
