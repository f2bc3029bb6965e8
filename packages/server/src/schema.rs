use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::entity::{pet, storage_object, webhook_log};

/// Create the composite indexes the entity definitions cannot express.
///
/// Failures are logged and skipped.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Owner's pet list, newest first.
    create_index(
        db,
        "idx_pet_user_created",
        Index::create()
            .if_not_exists()
            .name("idx_pet_user_created")
            .table(pet::Entity)
            .col(pet::Column::UserId)
            .col(pet::Column::CreatedAt)
            .to_owned(),
    )
    .await;

    // Log feed: most recent rows per user.
    create_index(
        db,
        "idx_webhook_log_user_created",
        Index::create()
            .if_not_exists()
            .name("idx_webhook_log_user_created")
            .table(webhook_log::Entity)
            .col(webhook_log::Column::UserId)
            .col(webhook_log::Column::CreatedAt)
            .to_owned(),
    )
    .await;

    create_index(
        db,
        "uq_storage_object_bucket_path",
        Index::create()
            .if_not_exists()
            .unique()
            .name("uq_storage_object_bucket_path")
            .table(storage_object::Entity)
            .col(storage_object::Column::Bucket)
            .col(storage_object::Column::Path)
            .to_owned(),
    )
    .await;

    Ok(())
}

async fn create_index(db: &DatabaseConnection, name: &str, stmt: IndexCreateStatement) {
    let sql = stmt.to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&sql).await {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => warn!("Failed to create index {}: {}", name, e),
    }
}
