//! `PostgreSQL` connection pool and schema bootstrap.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;

/// Connection pool shared by every `PostgreSQL` adapter.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema applied when auto-migration is enabled. Statements are idempotent.
pub const SCHEMA_SQL: &str =
    include_str!("../migrations/2024-03-01-000000_create_board_tables/up.sql");

/// Errors raised while preparing the database.
#[derive(Debug, Error)]
pub enum DatabaseSetupError {
    /// The pool could not be built or a connection could not be checked out.
    #[error("database connection failed: {0}")]
    Pool(#[from] PoolError),
    /// Applying the schema failed.
    #[error("schema migration failed: {0}")]
    Migration(#[from] diesel::result::Error),
    /// The blocking task was cancelled or panicked.
    #[error("schema migration task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`DatabaseSetupError::Pool`] when no connection can be
/// established.
pub fn build_pool(database_url: &str, max_connections: u32) -> Result<PgPool, DatabaseSetupError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_connections.max(1))
        .build(manager)
        .map_err(DatabaseSetupError::from)
}

/// Applies [`SCHEMA_SQL`] on a pooled connection.
///
/// # Errors
///
/// Returns [`DatabaseSetupError`] when no connection is available or a
/// statement fails.
pub async fn apply_schema(pool: &PgPool) -> Result<(), DatabaseSetupError> {
    let pool_handle = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool_handle.get()?;
        connection.batch_execute(SCHEMA_SQL)?;
        tracing::info!("database schema is up to date");
        Ok(())
    })
    .await?
}
