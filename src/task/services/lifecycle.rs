//! Service layer for task creation, lifecycle actions and board reads.

use super::{TaskView, TimeReport};
use crate::order::{
    domain::{OrderId, OrderSummary},
    ports::{OrderDirectory, OrderDirectoryError},
};
use crate::task::{
    domain::{
        Assignee, ParseTaskStateError, Task, TaskDetails, TaskDomainError, TaskId, TaskState,
    },
    ports::{TaskFilter, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Attempts made by a lifecycle action before a concurrent modification is
/// reported to the caller.
pub const DEFAULT_CONFLICT_ATTEMPTS: u32 = 3;

/// Request payload for creating a task for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    order_id: i64,
    title: String,
    assignee: String,
    description: Option<String>,
    area: Option<String>,
    priority: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields. Area and priority default
    /// to the order's values.
    #[must_use]
    pub fn new(order_id: i64, title: impl Into<String>, assignee: impl Into<String>) -> Self {
        Self {
            order_id,
            title: title.into(),
            assignee: assignee.into(),
            description: None,
            area: None,
            priority: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Overrides the area inherited from the order.
    #[must_use]
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    /// Overrides the priority inherited from the order.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }
}

/// Request payload for a board move (`setStatus`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetStatusRequest {
    task_id: TaskId,
    target_state: String,
}

impl SetStatusRequest {
    /// Creates a board-move request. The target label is parsed by the
    /// service so that unknown labels surface as validation errors.
    #[must_use]
    pub fn new(task_id: TaskId, target_state: impl Into<String>) -> Self {
        Self {
            task_id,
            target_state: target_state.into(),
        }
    }
}

/// Coarse error classes exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The task, or the order referenced at creation, does not exist.
    NotFound,
    /// The requested change violates the state machine.
    InvalidTransition,
    /// A concurrent modification won; re-read and retry.
    PersistenceConflict,
    /// Malformed input.
    Validation,
    /// Infrastructure failure.
    Internal,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or a state machine guard failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),
    /// The order referenced by a new task does not exist.
    #[error("order not found: {0}")]
    UnknownOrder(OrderId),
    /// Concurrent modifications outlasted the retry budget.
    #[error("task {0} is being modified concurrently, re-read and retry")]
    Conflict(TaskId),
    /// The requested target state label is unknown.
    #[error(transparent)]
    InvalidState(#[from] ParseTaskStateError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Order lookup failed.
    #[error(transparent)]
    Orders(#[from] OrderDirectoryError),
}

impl TaskLifecycleError {
    /// Classifies the error for transport mapping.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(TaskDomainError::InvalidTransition { .. }) => ErrorKind::InvalidTransition,
            Self::Domain(_) | Self::InvalidState(_) => ErrorKind::Validation,
            Self::NotFound(_)
            | Self::UnknownOrder(_)
            | Self::Repository(TaskRepositoryError::NotFound(_)) => ErrorKind::NotFound,
            Self::Conflict(_) | Self::Repository(TaskRepositoryError::Conflict { .. }) => {
                ErrorKind::PersistenceConflict
            }
            Self::Repository(_) | Self::Orders(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Every mutating operation is a read-modify-write guarded by the task
/// revision. A lost race re-reads the task and re-applies the action, so the
/// loser observes the winner's effect instead of overwriting it.
pub struct TaskLifecycleService<R, O, C>
where
    R: TaskRepository + ?Sized,
    O: OrderDirectory + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    orders: Arc<O>,
    clock: Arc<C>,
    conflict_attempts: u32,
}

impl<R, O, C> Clone for TaskLifecycleService<R, O, C>
where
    R: TaskRepository + ?Sized,
    O: OrderDirectory + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            orders: Arc::clone(&self.orders),
            clock: Arc::clone(&self.clock),
            conflict_attempts: self.conflict_attempts,
        }
    }
}

impl<R, O, C> TaskLifecycleService<R, O, C>
where
    R: TaskRepository + ?Sized,
    O: OrderDirectory + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, orders: Arc<O>, clock: Arc<C>) -> Self {
        Self {
            repository,
            orders,
            clock,
            conflict_attempts: DEFAULT_CONFLICT_ATTEMPTS,
        }
    }

    /// Sets how many times a lifecycle action is attempted when it loses a
    /// race. Values below one are treated as one.
    #[must_use]
    pub fn with_conflict_attempts(mut self, attempts: u32) -> Self {
        self.conflict_attempts = attempts.max(1);
        self
    }

    /// Creates a `Por Hacer` task for an existing order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for invalid input,
    /// [`TaskLifecycleError::UnknownOrder`] when the order does not exist, or
    /// a repository error when persistence fails.
    #[tracing::instrument(skip_all, fields(order_id = request.order_id))]
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<TaskView> {
        let order_id = OrderId::new(request.order_id).map_err(TaskDomainError::from)?;
        let assignee = Assignee::new(request.assignee)?;
        let order = self
            .orders
            .find(order_id)
            .await?
            .ok_or(TaskLifecycleError::UnknownOrder(order_id))?;

        let area = request.area.unwrap_or_else(|| order.area().to_owned());
        let priority = request
            .priority
            .unwrap_or_else(|| order.priority().to_owned());
        let mut details = TaskDetails::new(request.title, area, priority)?;
        if let Some(description) = request.description {
            details = details.with_description(description);
        }

        let task = Task::new(order_id, details, assignee, &*self.clock);
        self.repository.store(&task).await?;
        tracing::info!(task_id = %task.id(), assignee = %task.assignee(), "task created");
        Ok(TaskView::new(task, Some(order), self.clock.utc()))
    }

    /// Returns one board card.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist.
    pub async fn find(&self, task_id: TaskId) -> TaskLifecycleResult<TaskView> {
        let task = self.load(task_id).await?;
        self.view(task).await
    }

    /// Returns the board cards matching `filter`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] or
    /// [`TaskLifecycleError::Orders`] when a lookup fails.
    pub async fn list(&self, filter: &TaskFilter) -> TaskLifecycleResult<Vec<TaskView>> {
        let tasks = self.repository.list(filter).await?;
        let now = self.clock.utc();
        let mut orders: HashMap<OrderId, Option<OrderSummary>> = HashMap::new();
        let mut views = Vec::with_capacity(tasks.len());
        for task in tasks {
            let order_id = task.order_id();
            let order = match orders.get(&order_id) {
                Some(cached) => cached.clone(),
                None => {
                    let fetched = self.orders.find(order_id).await?;
                    orders.insert(order_id, fetched.clone());
                    fetched
                }
            };
            views.push(TaskView::new(task, order, now));
        }
        Ok(views)
    }

    /// Opens a running interval.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] with an invalid-transition
    /// error when the task is finished or already running.
    #[tracing::instrument(skip_all, fields(task_id = %task_id))]
    pub async fn start(&self, task_id: TaskId) -> TaskLifecycleResult<TaskView> {
        self.apply(task_id, |task, clock| task.start(clock)).await
    }

    /// Folds the running interval into the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] with an invalid-transition
    /// error when the task is not running.
    #[tracing::instrument(skip_all, fields(task_id = %task_id))]
    pub async fn pause(&self, task_id: TaskId) -> TaskLifecycleResult<TaskView> {
        self.apply(task_id, |task, clock| task.pause(clock)).await
    }

    /// Completes the task, folding any running interval.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] with an invalid-transition
    /// error when the task is already finished.
    #[tracing::instrument(skip_all, fields(task_id = %task_id))]
    pub async fn finish(&self, task_id: TaskId) -> TaskLifecycleResult<TaskView> {
        self.apply(task_id, |task, clock| task.finish(clock)).await
    }

    /// Applies a board move, translating it into start, pause or finish.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::InvalidState`] for an unknown target
    /// label and [`TaskLifecycleError::Domain`] when the move is illegal.
    #[tracing::instrument(
        skip_all,
        fields(task_id = %request.task_id, target = %request.target_state)
    )]
    pub async fn set_status(&self, request: SetStatusRequest) -> TaskLifecycleResult<TaskView> {
        let target = TaskState::try_from(request.target_state.as_str())?;
        self.apply(request.task_id, move |task, clock| task.move_to(target, clock))
            .await
    }

    /// Builds the time report over finished tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the query fails.
    pub async fn time_report(&self, assignee: Option<Assignee>) -> TaskLifecycleResult<TimeReport> {
        let mut filter = TaskFilter::all().with_state(TaskState::Done);
        if let Some(operator) = assignee {
            filter = filter.with_assignee(operator);
        }
        let tasks = self.repository.list(&filter).await?;
        Ok(TimeReport::from_tasks(&tasks))
    }

    async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))
    }

    async fn view(&self, task: Task) -> TaskLifecycleResult<TaskView> {
        let order = self.orders.find(task.order_id()).await?;
        Ok(TaskView::new(task, order, self.clock.utc()))
    }

    async fn apply<F>(&self, task_id: TaskId, action: F) -> TaskLifecycleResult<TaskView>
    where
        F: Fn(&mut Task, &C) -> Result<(), TaskDomainError> + Send + Sync,
    {
        for attempt in 1..=self.conflict_attempts {
            let mut task = self.load(task_id).await?;
            let expected_revision = task.revision();
            action(&mut task, &*self.clock)?;

            match self.repository.update(&task, expected_revision).await {
                Ok(()) => {
                    tracing::info!(
                        state = %task.state(),
                        accumulated_seconds = task.accumulated_seconds(),
                        "task lifecycle updated"
                    );
                    return self.view(task).await;
                }
                Err(TaskRepositoryError::Conflict { .. }) => {
                    tracing::warn!(attempt, "lost update race, re-reading task");
                }
                Err(TaskRepositoryError::NotFound(_)) => {
                    return Err(TaskLifecycleError::NotFound(task_id));
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(TaskLifecycleError::Conflict(task_id))
    }
}
