//! Order reference and summary types consumed by the board.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors returned while constructing order values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OrderDomainError {
    /// The order identifier is not a positive integer.
    #[error("invalid order id {0}, expected a positive integer")]
    InvalidOrderId(i64),

    /// The client name is empty after trimming.
    #[error("order client name must not be empty")]
    EmptyClientName,
}

/// Identifier of an order (`pedido_id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct OrderId(i64);

impl OrderId {
    /// Creates a validated order identifier.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::InvalidOrderId`] when `value` is zero or
    /// negative.
    pub const fn new(value: i64) -> Result<Self, OrderDomainError> {
        if value <= 0 {
            return Err(OrderDomainError::InvalidOrderId(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for OrderId {
    type Error = OrderDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrderId> for i64 {
    fn from(value: OrderId) -> Self {
        value.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display data for an order, as shown on board cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    order_id: OrderId,
    client_name: String,
    area: String,
    priority: String,
    commitment_date: Option<NaiveDate>,
}

impl OrderSummary {
    /// Creates an order summary.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::EmptyClientName`] when the client name is
    /// blank.
    pub fn new(
        order_id: OrderId,
        client_name: impl Into<String>,
        area: impl Into<String>,
        priority: impl Into<String>,
    ) -> Result<Self, OrderDomainError> {
        let name = client_name.into().trim().to_owned();
        if name.is_empty() {
            return Err(OrderDomainError::EmptyClientName);
        }
        Ok(Self {
            order_id,
            client_name: name,
            area: area.into().trim().to_owned(),
            priority: priority.into().trim().to_owned(),
            commitment_date: None,
        })
    }

    /// Sets the committed delivery date.
    #[must_use]
    pub const fn with_commitment_date(mut self, date: NaiveDate) -> Self {
        self.commitment_date = Some(date);
        self
    }

    /// Returns the order identifier.
    #[must_use]
    pub const fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Returns the client name.
    #[must_use]
    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    /// Returns the shop area the order is routed to.
    #[must_use]
    pub fn area(&self) -> &str {
        &self.area
    }

    /// Returns the order priority label.
    #[must_use]
    pub fn priority(&self) -> &str {
        &self.priority
    }

    /// Returns the committed delivery date, if any.
    #[must_use]
    pub const fn commitment_date(&self) -> Option<NaiveDate> {
        self.commitment_date
    }
}
