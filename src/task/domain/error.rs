//! Error types for task domain validation, parsing and lifecycle guards.

use super::{TaskId, TaskState};
use crate::order::domain::OrderDomainError;
use std::fmt;
use thiserror::Error;

/// Lifecycle action requested against a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskAction {
    /// Open a running interval.
    Start,
    /// Close the running interval and return the task to the backlog.
    Pause,
    /// Close any running interval and complete the task.
    Finish,
    /// Board move to the given column.
    MoveTo(TaskState),
}

impl fmt::Display for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Pause => f.write_str("pause"),
            Self::Finish => f.write_str("finish"),
            Self::MoveTo(target) => write!(f, "move to '{target}'"),
        }
    }
}

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The requested action is not permitted from the current state.
    #[error("cannot {action} task {task_id} while it is '{state}'")]
    InvalidTransition {
        /// Task the action was requested for.
        task_id: TaskId,
        /// State the task was in when the action was rejected.
        state: TaskState,
        /// Rejected action.
        action: TaskAction,
    },

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// A required descriptive field is empty after trimming.
    #[error("task {0} must not be empty")]
    EmptyField(&'static str),

    /// A descriptive field is longer than storage allows.
    #[error("task {field} must be at most {max} characters")]
    FieldTooLong {
        /// Offending field.
        field: &'static str,
        /// Maximum length in characters.
        max: usize,
    },

    /// The assignee is empty after trimming.
    #[error("task assignee must not be empty")]
    EmptyAssignee,

    /// The owning order reference is invalid.
    #[error(transparent)]
    Order(#[from] OrderDomainError),
}

/// Error returned while parsing task states from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);
