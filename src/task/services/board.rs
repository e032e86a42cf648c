//! Board read model: a task plus its order summary and derived elapsed time.

use crate::order::domain::OrderSummary;
use crate::task::domain::Task;
use chrono::{DateTime, Utc};

/// Snapshot of one board card at a given instant.
///
/// `elapsed_seconds` is derived at read time and never persisted, so clients
/// polling at any cadence see a continuously advancing timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    task: Task,
    order: Option<OrderSummary>,
    elapsed_seconds: u64,
    observed_at: DateTime<Utc>,
}

impl TaskView {
    /// Builds a view of `task` as observed at `now`.
    #[must_use]
    pub fn new(task: Task, order: Option<OrderSummary>, now: DateTime<Utc>) -> Self {
        let elapsed_seconds = task.elapsed_seconds(now);
        Self {
            task,
            order,
            elapsed_seconds,
            observed_at: now,
        }
    }

    /// Returns the task aggregate.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Consumes the view and returns the task aggregate.
    #[must_use]
    pub fn into_task(self) -> Task {
        self.task
    }

    /// Returns the owning order summary, when the order is still known.
    #[must_use]
    pub const fn order(&self) -> Option<&OrderSummary> {
        self.order.as_ref()
    }

    /// Returns the tracked time at the observation instant.
    #[must_use]
    pub const fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Returns the instant the elapsed time was computed for.
    #[must_use]
    pub const fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }
}
