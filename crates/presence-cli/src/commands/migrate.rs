//! Database migration command.

use presence_core::error::AppError;
use presence_database::DatabasePool;
use presence_database::migration::run_migrations;

use crate::output;

/// Apply all pending migrations to the configured database.
pub async fn execute(config_path: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path)?;
    let pool = DatabasePool::connect(&config.database).await?;

    println!("Running database migrations...");
    run_migrations(pool.pool()).await?;
    pool.close().await;

    output::print_success("All migrations applied successfully.");
    Ok(())
}
