/// Database access layer
///
/// Repositories are plain async functions over a `PgPool`, one module per
/// table.
pub mod progress_repo;
pub mod user_repo;
pub mod video_repo;

use sqlx::PgPool;

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed successfully");
    Ok(())
}
