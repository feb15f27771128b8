//! `taleforge-db` library crate.
//!
//! SQLite persistence for preset packs: connection setup, row models,
//! repositories, the [`store::PackStore`] service and the
//! [`context_builder::ContextBuilder`] that renders templates for a story.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod config;
pub mod context_builder;
pub mod error;
pub mod models;
pub mod repositories;
pub mod store;

pub use config::DbConfig;
pub use context_builder::ContextBuilder;
pub use error::{StoreError, StoreResult};
pub use store::PackStore;

pub type DbPool = sqlx::SqlitePool;

/// Create a connection pool from the given configuration.
///
/// The database file is created if missing and foreign keys are enforced.
pub async fn create_pool(config: &DbConfig) -> Result<DbPool, sqlx::Error> {
    let options = config
        .database_url
        .parse::<SqliteConnectOptions>()?
        .create_if_missing(true)
        .foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded schema migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
