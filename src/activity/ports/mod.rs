//! Port contract for the append-only activity log.

use crate::activity::domain::{Consumption, Incident, TaskHistory};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for activity log operations.
pub type ActivityLogResult<T> = Result<T, ActivityLogError>;

/// Append-only storage for consumption and incident records.
#[async_trait]
pub trait ActivityLog: Send + Sync {
    /// Appends a consumption record.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityLogError::UnknownTask`] when the backend enforces
    /// task references and the task does not exist.
    async fn record_consumption(&self, consumption: &Consumption) -> ActivityLogResult<()>;

    /// Appends an incident record.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityLogError::UnknownTask`] when the backend enforces
    /// task references and the task does not exist.
    async fn record_incident(&self, incident: &Incident) -> ActivityLogResult<()>;

    /// Returns the records of one task, each list oldest first.
    async fn history(&self, task_id: TaskId) -> ActivityLogResult<TaskHistory>;
}

/// Errors returned by activity log implementations.
#[derive(Debug, Clone, Error)]
pub enum ActivityLogError {
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    UnknownTask(TaskId),

    /// Persistence-layer failure.
    #[error("activity log error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ActivityLogError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
