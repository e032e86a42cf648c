//! Shared handler state.

use crate::activity::{ports::ActivityLog, services::ActivityService};
use crate::order::ports::OrderDirectory;
use crate::task::{ports::TaskRepository, services::TaskLifecycleService};
use mockable::Clock;
use std::sync::Arc;

/// Lifecycle service over type-erased adapters.
pub type BoardTaskService<C> = TaskLifecycleService<dyn TaskRepository, dyn OrderDirectory, C>;

/// Activity service over a type-erased log.
pub type BoardActivityService<C> = ActivityService<dyn ActivityLog, C>;

/// Services shared by every request.
pub struct AppState<C>
where
    C: Clock + Send + Sync + 'static,
{
    tasks: BoardTaskService<C>,
    activity: BoardActivityService<C>,
}

impl<C> Clone for AppState<C>
where
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            tasks: self.tasks.clone(),
            activity: self.activity.clone(),
        }
    }
}

impl<C> AppState<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Wires the services over the given adapters.
    #[must_use]
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        orders: Arc<dyn OrderDirectory>,
        activity_log: Arc<dyn ActivityLog>,
        clock: Arc<C>,
        conflict_attempts: u32,
    ) -> Self {
        Self {
            tasks: TaskLifecycleService::new(tasks, orders, Arc::clone(&clock))
                .with_conflict_attempts(conflict_attempts),
            activity: ActivityService::new(activity_log, clock),
        }
    }

    /// Returns the task lifecycle service.
    #[must_use]
    pub const fn tasks(&self) -> &BoardTaskService<C> {
        &self.tasks
    }

    /// Returns the activity service.
    #[must_use]
    pub const fn activity(&self) -> &BoardActivityService<C> {
        &self.activity
    }
}
