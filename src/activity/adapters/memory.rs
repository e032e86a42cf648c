//! In-memory activity log for tests and local runs.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::activity::{
    domain::{Consumption, Incident, TaskHistory},
    ports::{ActivityLog, ActivityLogError, ActivityLogResult},
};
use crate::task::domain::TaskId;

/// Thread-safe in-memory activity log.
///
/// Task references are not checked; records are kept in append order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActivityLog {
    state: Arc<RwLock<InMemoryActivityState>>,
}

#[derive(Debug, Default)]
struct InMemoryActivityState {
    consumptions: Vec<Consumption>,
    incidents: Vec<Incident>,
}

impl InMemoryActivityLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> ActivityLogError {
    ActivityLogError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ActivityLog for InMemoryActivityLog {
    async fn record_consumption(&self, consumption: &Consumption) -> ActivityLogResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.consumptions.push(consumption.clone());
        Ok(())
    }

    async fn record_incident(&self, incident: &Incident) -> ActivityLogResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.incidents.push(incident.clone());
        Ok(())
    }

    async fn history(&self, task_id: TaskId) -> ActivityLogResult<TaskHistory> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(TaskHistory {
            consumos: state
                .consumptions
                .iter()
                .filter(|record| record.task_id() == task_id)
                .cloned()
                .collect(),
            incidencias: state
                .incidents
                .iter()
                .filter(|record| record.task_id() == task_id)
                .cloned()
                .collect(),
        })
    }
}
