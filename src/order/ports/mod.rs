//! Read-only port for resolving order references.

use crate::order::domain::{OrderId, OrderSummary};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for order directory lookups.
pub type OrderDirectoryResult<T> = Result<T, OrderDirectoryError>;

/// Order lookup contract consumed by the task lifecycle service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderDirectory: Send + Sync {
    /// Finds the summary of an order.
    ///
    /// Returns `None` when the order does not exist.
    async fn find(&self, order_id: OrderId) -> OrderDirectoryResult<Option<OrderSummary>>;
}

/// Errors returned by order directory implementations.
#[derive(Debug, Clone, Error)]
pub enum OrderDirectoryError {
    /// Persistence-layer failure.
    #[error("order lookup failed: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl OrderDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
