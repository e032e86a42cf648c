//! Material consumption records.

use super::{ActivityDomainError, ActivityId};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated reference to a supply in the inventory catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct SupplyId(i64);

impl SupplyId {
    /// Creates a supply reference.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityDomainError::InvalidSupplyId`] for zero or negative
    /// values.
    pub const fn new(value: i64) -> Result<Self, ActivityDomainError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(ActivityDomainError::InvalidSupplyId(value))
        }
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for SupplyId {
    type Error = ActivityDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SupplyId> for i64 {
    fn from(value: SupplyId) -> Self {
        value.0
    }
}

impl fmt::Display for SupplyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Largest quantity a single consumption may record.
pub const MAX_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// Longest accepted consumption reason, in characters.
pub const MAX_REASON_CHARS: usize = 100;

/// Quick consumption of a supply while working on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumption {
    id: ActivityId,
    task_id: TaskId,
    supply_id: SupplyId,
    quantity: u32,
    reason: String,
    recorded_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a stored consumption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedConsumptionData {
    /// Record identifier.
    pub id: ActivityId,
    /// Task the supply was used for.
    pub task_id: TaskId,
    /// Consumed supply.
    pub supply_id: SupplyId,
    /// Consumed units.
    pub quantity: u32,
    /// Reason label.
    pub reason: String,
    /// When the consumption was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl Consumption {
    /// Creates a consumption record stamped with the clock's current time.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityDomainError::ZeroQuantity`],
    /// [`ActivityDomainError::QuantityTooLarge`],
    /// [`ActivityDomainError::EmptyReason`] or
    /// [`ActivityDomainError::ReasonTooLong`] for invalid input.
    pub fn new(
        task_id: TaskId,
        supply_id: SupplyId,
        quantity: u32,
        reason: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<Self, ActivityDomainError> {
        if quantity == 0 {
            return Err(ActivityDomainError::ZeroQuantity);
        }
        if quantity > MAX_QUANTITY {
            return Err(ActivityDomainError::QuantityTooLarge(quantity));
        }
        let raw_reason = reason.into();
        let trimmed = raw_reason.trim();
        if trimmed.is_empty() {
            return Err(ActivityDomainError::EmptyReason);
        }
        if trimmed.chars().count() > MAX_REASON_CHARS {
            return Err(ActivityDomainError::ReasonTooLong {
                max: MAX_REASON_CHARS,
            });
        }
        Ok(Self {
            id: ActivityId::new(),
            task_id,
            supply_id,
            quantity,
            reason: trimmed.to_owned(),
            recorded_at: clock.utc(),
        })
    }

    /// Reconstructs a consumption from storage.
    #[must_use]
    pub fn from_persisted(data: PersistedConsumptionData) -> Self {
        Self {
            id: data.id,
            task_id: data.task_id,
            supply_id: data.supply_id,
            quantity: data.quantity,
            reason: data.reason,
            recorded_at: data.recorded_at,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> ActivityId {
        self.id
    }

    /// Returns the task the record belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the consumed supply.
    #[must_use]
    pub const fn supply_id(&self) -> SupplyId {
        self.supply_id
    }

    /// Returns the consumed units.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the reason label.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns when the consumption was recorded.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
