//! Shared test helpers for `PostgreSQL` integration tests.

use super::cluster::{BoxError, PostgresCluster, TemporaryDatabase, postgres_cluster};
use carpenter::db::{PgPool, SCHEMA_SQL, build_pool};
use carpenter::order::domain::OrderId;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Text};
use rstest::fixture;

/// Pool connected to a fresh database carrying the board schema.
///
/// The pool is declared first so its connections close before the
/// database is dropped.
pub struct TestDatabase {
    /// Pool shared by the adapters under test.
    pub pool: PgPool,
    _database: TemporaryDatabase,
}

impl TestDatabase {
    /// Inserts an order row and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error when the insert fails.
    pub async fn insert_order(&self, client_name: &str) -> Result<OrderId, BoxError> {
        let pool = self.pool.clone();
        let name = client_name.to_owned();
        let raw_id = tokio::task::spawn_blocking(move || -> Result<i64, BoxError> {
            let mut connection = pool.get()?;
            let row = diesel::sql_query(
                "INSERT INTO orders (client_name, area, priority, commitment_date) \
                 VALUES ($1, 'Corte', 'Alta', DATE '2024-03-15') RETURNING id",
            )
            .bind::<Text, _>(name)
            .get_result::<InsertedOrder>(&mut connection)?;
            Ok(row.id)
        })
        .await??;
        Ok(OrderId::new(raw_id)?)
    }
}

#[derive(QueryableByName)]
struct InsertedOrder {
    #[diesel(sql_type = BigInt)]
    id: i64,
}

/// Clones the schema template into a database owned by one test.
///
/// # Errors
///
/// Returns an error when the embedded cluster cannot start or the database
/// cannot be created.
#[fixture]
pub async fn test_database() -> Result<TestDatabase, BoxError> {
    let cluster: PostgresCluster = postgres_cluster()?;
    let database =
        tokio::task::spawn_blocking(move || cluster.temporary_database(SCHEMA_SQL)).await??;
    let pool = build_pool(&database.url(), 4)?;
    Ok(TestDatabase {
        pool,
        _database: database,
    })
}
