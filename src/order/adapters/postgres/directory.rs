//! `PostgreSQL` implementation of the order directory port.

use super::{models::OrderRow, schema::orders};
use crate::order::{
    domain::{OrderId, OrderSummary},
    ports::{OrderDirectory, OrderDirectoryError, OrderDirectoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by the order adapter.
pub type OrderPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed order directory.
#[derive(Debug, Clone)]
pub struct PostgresOrderDirectory {
    pool: OrderPgPool,
}

impl PostgresOrderDirectory {
    /// Creates a directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: OrderPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderDirectory for PostgresOrderDirectory {
    async fn find(&self, order_id: OrderId) -> OrderDirectoryResult<Option<OrderSummary>> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(OrderDirectoryError::persistence)?;
            let row = orders::table
                .filter(orders::id.eq(order_id.value()))
                .select(OrderRow::as_select())
                .first::<OrderRow>(&mut connection)
                .optional()
                .map_err(OrderDirectoryError::persistence)?;
            row.map(row_to_summary).transpose()
        })
        .await
        .map_err(OrderDirectoryError::persistence)?
    }
}

fn row_to_summary(row: OrderRow) -> OrderDirectoryResult<OrderSummary> {
    let OrderRow {
        id,
        client_name,
        area,
        priority,
        commitment_date,
    } = row;
    let order_id = OrderId::new(id).map_err(OrderDirectoryError::persistence)?;
    let mut summary = OrderSummary::new(order_id, client_name, area, priority)
        .map_err(OrderDirectoryError::persistence)?;
    if let Some(date) = commitment_date {
        summary = summary.with_commitment_date(date);
    }
    Ok(summary)
}
