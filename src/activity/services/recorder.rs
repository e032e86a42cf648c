//! Validates activity input, stamps it with the clock and appends it to the
//! log.

use crate::activity::{
    domain::{
        ActivityDomainError, Consumption, Incident, IncidentKind, SupplyId, TaskHistory, Urgency,
    },
    ports::{ActivityLog, ActivityLogError},
};
use crate::task::{domain::TaskId, services::ErrorKind};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for a quick consumption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordConsumptionRequest {
    task_id: TaskId,
    supply_id: i64,
    quantity: u32,
    reason: String,
}

impl RecordConsumptionRequest {
    /// Creates a consumption request.
    #[must_use]
    pub fn new(task_id: TaskId, supply_id: i64, quantity: u32, reason: impl Into<String>) -> Self {
        Self {
            task_id,
            supply_id,
            quantity,
            reason: reason.into(),
        }
    }
}

/// Request payload for an incident report. Labels are parsed by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportIncidentRequest {
    task_id: TaskId,
    kind: String,
    urgency: String,
    description: String,
}

impl ReportIncidentRequest {
    /// Creates an incident request.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        kind: impl Into<String>,
        urgency: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            task_id,
            kind: kind.into(),
            urgency: urgency.into(),
            description: description.into(),
        }
    }
}

/// Service-level errors for activity recording.
#[derive(Debug, Error)]
pub enum ActivityError {
    /// Input failed validation.
    #[error(transparent)]
    Domain(#[from] ActivityDomainError),
    /// Log operation failed.
    #[error(transparent)]
    Log(#[from] ActivityLogError),
}

impl ActivityError {
    /// Classifies the error for transport mapping.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::Log(ActivityLogError::UnknownTask(_)) => ErrorKind::NotFound,
            Self::Log(ActivityLogError::Persistence(_)) => ErrorKind::Internal,
        }
    }
}

/// Result type for activity service operations.
pub type ActivityResult<T> = Result<T, ActivityError>;

/// Activity recording service.
pub struct ActivityService<L, C>
where
    L: ActivityLog + ?Sized,
    C: Clock + Send + Sync,
{
    log: Arc<L>,
    clock: Arc<C>,
}

impl<L, C> Clone for ActivityService<L, C>
where
    L: ActivityLog + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<L, C> ActivityService<L, C>
where
    L: ActivityLog + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new activity service.
    #[must_use]
    pub const fn new(log: Arc<L>, clock: Arc<C>) -> Self {
        Self { log, clock }
    }

    /// Records a quick consumption of a supply.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::Domain`] for invalid input or
    /// [`ActivityError::Log`] when the record cannot be stored.
    #[tracing::instrument(
        skip_all,
        fields(task_id = %request.task_id, supply_id = request.supply_id)
    )]
    pub async fn record_consumption(
        &self,
        request: RecordConsumptionRequest,
    ) -> ActivityResult<Consumption> {
        let supply_id = SupplyId::new(request.supply_id)?;
        let consumption = Consumption::new(
            request.task_id,
            supply_id,
            request.quantity,
            request.reason,
            &*self.clock,
        )?;
        self.log.record_consumption(&consumption).await?;
        tracing::info!(quantity = consumption.quantity(), "consumption recorded");
        Ok(consumption)
    }

    /// Records an incident report.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::Domain`] for unknown labels or a blank
    /// description, or [`ActivityError::Log`] when the record cannot be
    /// stored.
    #[tracing::instrument(skip_all, fields(task_id = %request.task_id))]
    pub async fn report_incident(
        &self,
        request: ReportIncidentRequest,
    ) -> ActivityResult<Incident> {
        let kind = IncidentKind::try_from(request.kind.as_str())?;
        let urgency = Urgency::try_from(request.urgency.as_str())?;
        let incident = Incident::new(
            request.task_id,
            kind,
            urgency,
            request.description,
            &*self.clock,
        )?;
        self.log.record_incident(&incident).await?;
        if urgency == Urgency::High {
            tracing::warn!(%kind, "urgent incident reported");
        } else {
            tracing::info!(%kind, %urgency, "incident reported");
        }
        Ok(incident)
    }

    /// Returns the activity history of a task.
    ///
    /// # Errors
    ///
    /// Returns [`ActivityError::Log`] when the query fails.
    pub async fn history(&self, task_id: TaskId) -> ActivityResult<TaskHistory> {
        Ok(self.log.history(task_id).await?)
    }
}
