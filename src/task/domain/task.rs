//! Task aggregate root, board states, and the time-ledger state machine.

use super::{
    Assignee, ParseTaskStateError, TaskAction, TaskDomainError, TaskId, open_interval_seconds,
};
use crate::order::domain::OrderId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board column a task sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskState {
    /// Not started, or paused with time already on the ledger.
    #[serde(rename = "Por Hacer")]
    ToDo,
    /// A running interval is open.
    #[serde(rename = "En Curso")]
    InProgress,
    /// Completed. No further lifecycle action is accepted.
    #[serde(rename = "Terminado")]
    Done,
}

impl TaskState {
    /// All board columns in display order.
    pub const ALL: [Self; 3] = [Self::ToDo, Self::InProgress, Self::Done];

    /// Returns the canonical storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToDo => "Por Hacer",
            Self::InProgress => "En Curso",
            Self::Done => "Terminado",
        }
    }

    /// Returns whether no transition leaves this state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns whether a board move from `self` to `target` is permitted.
    ///
    /// `En Curso -> Por Hacer` is the only backward move; nothing leaves
    /// `Terminado` and same-column moves are rejected.
    #[must_use]
    pub const fn can_move_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::ToDo, Self::InProgress)
                | (Self::InProgress, Self::ToDo)
                | (Self::ToDo | Self::InProgress, Self::Done)
        )
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "por hacer" | "pendiente" => Ok(Self::ToDo),
            "en curso" | "en proceso" => Ok(Self::InProgress),
            "terminado" => Ok(Self::Done),
            _ => Err(ParseTaskStateError(value.to_owned())),
        }
    }
}

/// Descriptive task fields. The lifecycle never modifies them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    title: String,
    description: Option<String>,
    area: String,
    priority: String,
}

impl TaskDetails {
    /// Creates validated task details.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] for a blank title,
    /// [`TaskDomainError::EmptyField`] for a blank area or priority and
    /// [`TaskDomainError::FieldTooLong`] when a value exceeds its column
    /// width.
    pub fn new(
        title: impl Into<String>,
        area: impl Into<String>,
        priority: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        let title = non_blank(title.into()).ok_or(TaskDomainError::EmptyTitle)?;
        let area = non_blank(area.into()).ok_or(TaskDomainError::EmptyField("area"))?;
        let priority =
            non_blank(priority.into()).ok_or(TaskDomainError::EmptyField("priority"))?;
        ensure_fits("title", &title, MAX_TITLE_CHARS)?;
        ensure_fits("area", &area, MAX_AREA_CHARS)?;
        ensure_fits("priority", &priority, MAX_PRIORITY_CHARS)?;
        Ok(Self {
            title,
            description: None,
            area,
            priority,
        })
    }

    /// Sets the free-text description. Blank descriptions are dropped.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = non_blank(description.into());
        self
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the shop area the task belongs to.
    #[must_use]
    pub fn area(&self) -> &str {
        &self.area
    }

    /// Returns the priority label.
    #[must_use]
    pub fn priority(&self) -> &str {
        &self.priority
    }
}

/// Longest accepted task title, in characters.
pub const MAX_TITLE_CHARS: usize = 255;
/// Longest accepted area label, in characters.
pub const MAX_AREA_CHARS: usize = 100;
/// Longest accepted priority label, in characters.
pub const MAX_PRIORITY_CHARS: usize = 50;

/// Rejects values longer than `max` characters.
pub(crate) fn ensure_fits(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), TaskDomainError> {
    if value.chars().count() > max {
        return Err(TaskDomainError::FieldTooLong { field, max });
    }
    Ok(())
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Task aggregate root.
///
/// `state == InProgress` holds exactly when `started_at` is set, and
/// `accumulated_seconds` only ever grows. Every successful lifecycle action
/// bumps `revision`, which adapters use for optimistic concurrency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    order_id: OrderId,
    details: TaskDetails,
    assignee: Assignee,
    state: TaskState,
    started_at: Option<DateTime<Utc>>,
    accumulated_seconds: u64,
    revision: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning order.
    pub order_id: OrderId,
    /// Persisted descriptive fields.
    pub details: TaskDetails,
    /// Persisted assignee.
    pub assignee: Assignee,
    /// Persisted board state.
    pub state: TaskState,
    /// Start of the open running interval, if any.
    pub started_at: Option<DateTime<Utc>>,
    /// Sum of closed running intervals in seconds.
    pub accumulated_seconds: u64,
    /// Optimistic concurrency revision.
    pub revision: u64,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in `Por Hacer` with an empty ledger.
    #[must_use]
    pub fn new(
        order_id: OrderId,
        details: TaskDetails,
        assignee: Assignee,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            order_id,
            details,
            assignee,
            state: TaskState::ToDo,
            started_at: None,
            accumulated_seconds: 0,
            revision: 0,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            order_id: data.order_id,
            details: data.details,
            assignee: data.assignee,
            state: data.state,
            started_at: data.started_at,
            accumulated_seconds: data.accumulated_seconds,
            revision: data.revision,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning order reference.
    #[must_use]
    pub const fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Returns the descriptive fields.
    #[must_use]
    pub const fn details(&self) -> &TaskDetails {
        &self.details
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee(&self) -> &Assignee {
        &self.assignee
    }

    /// Returns the board state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the start of the open running interval, if any.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Returns the sum of closed running intervals in seconds.
    #[must_use]
    pub const fn accumulated_seconds(&self) -> u64 {
        self.accumulated_seconds
    }

    /// Returns the optimistic concurrency revision.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether a running interval is open.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Total tracked time at `now`: the ledger plus the open interval.
    #[must_use]
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        self.started_at.map_or(self.accumulated_seconds, |started_at| {
            self.accumulated_seconds
                .saturating_add(open_interval_seconds(started_at, now))
        })
    }

    /// Opens a running interval.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] when the task is
    /// finished or already running. The clock is never restarted.
    pub fn start(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.state.is_terminal() || self.started_at.is_some() {
            return Err(self.reject(TaskAction::Start));
        }
        let now = clock.utc();
        self.started_at = Some(now);
        self.state = TaskState::InProgress;
        self.touch(now);
        Ok(())
    }

    /// Folds the running interval into the ledger and returns the task to
    /// `Por Hacer`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] when no interval is
    /// open.
    pub fn pause(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        let Some(started_at) = self.started_at.filter(|_| !self.state.is_terminal()) else {
            return Err(self.reject(TaskAction::Pause));
        };
        let now = clock.utc();
        self.fold_interval(started_at, now);
        self.state = TaskState::ToDo;
        self.touch(now);
        Ok(())
    }

    /// Folds any running interval into the ledger and completes the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] when the task is
    /// already finished.
    pub fn finish(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if self.state.is_terminal() {
            return Err(self.reject(TaskAction::Finish));
        }
        let now = clock.utc();
        if let Some(started_at) = self.started_at {
            self.fold_interval(started_at, now);
        }
        self.state = TaskState::Done;
        self.touch(now);
        Ok(())
    }

    /// Applies a board move by delegating to the matching lifecycle action.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] when
    /// [`TaskState::can_move_to`] rejects the move.
    pub fn move_to(
        &mut self,
        target: TaskState,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.state.can_move_to(target) {
            return Err(self.reject(TaskAction::MoveTo(target)));
        }
        match target {
            TaskState::InProgress => self.start(clock),
            TaskState::ToDo => self.pause(clock),
            TaskState::Done => self.finish(clock),
        }
    }

    fn fold_interval(&mut self, started_at: DateTime<Utc>, now: DateTime<Utc>) {
        self.accumulated_seconds = self
            .accumulated_seconds
            .saturating_add(open_interval_seconds(started_at, now));
        self.started_at = None;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.revision = self.revision.saturating_add(1);
    }

    const fn reject(&self, action: TaskAction) -> TaskDomainError {
        TaskDomainError::InvalidTransition {
            task_id: self.id,
            state: self.state,
            action,
        }
    }
}
