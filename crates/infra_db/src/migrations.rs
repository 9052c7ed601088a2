//! Schema setup
//!
//! The schema file is embedded at compile time and applied as one batch. Its
//! statements are idempotent, so this runs on every start.

use sqlx::PgPool;
use tracing::info;

use crate::error::DatabaseError;

/// Initial schema for the delivery orders table
pub const SCHEMA_SQL: &str = include_str!("../../../migrations/0001_delivery_orders.sql");

/// Applies the embedded schema
///
/// # Errors
///
/// Returns `DatabaseError::MigrationFailed` if any statement fails
pub async fn run_migrations(pool: &PgPool) -> Result<(), DatabaseError> {
    info!("Applying delivery orders schema");

    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await
        .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;

    info!("Schema ready");
    Ok(())
}
