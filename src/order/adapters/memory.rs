//! In-memory order directory for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::order::{
    domain::{OrderId, OrderSummary},
    ports::{OrderDirectory, OrderDirectoryError, OrderDirectoryResult},
};

/// Thread-safe in-memory order directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderDirectory {
    orders: Arc<RwLock<HashMap<OrderId, OrderSummary>>>,
}

impl InMemoryOrderDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an order summary.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDirectoryError::Persistence`] when the lock is
    /// poisoned.
    pub fn insert(&self, summary: OrderSummary) -> OrderDirectoryResult<()> {
        let mut orders = self.orders.write().map_err(|err| {
            OrderDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        orders.insert(summary.order_id(), summary);
        Ok(())
    }
}

#[async_trait]
impl OrderDirectory for InMemoryOrderDirectory {
    async fn find(&self, order_id: OrderId) -> OrderDirectoryResult<Option<OrderSummary>> {
        let orders = self.orders.read().map_err(|err| {
            OrderDirectoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(orders.get(&order_id).cloned())
    }
}
