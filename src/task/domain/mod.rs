//! Domain model for the Kanban task lifecycle.
//!
//! The domain owns the board state machine and the time ledger. It knows
//! nothing about storage or transport; callers inject a clock and persist
//! the resulting aggregate through the repository port.

mod elapsed;
mod error;
mod ids;
mod task;

pub use elapsed::{format_hms, open_interval_seconds};
pub use error::{ParseTaskStateError, TaskAction, TaskDomainError};
pub use ids::{Assignee, MAX_ASSIGNEE_CHARS, TaskId};
pub use task::{
    MAX_AREA_CHARS, MAX_PRIORITY_CHARS, MAX_TITLE_CHARS, PersistedTaskData, Task, TaskDetails,
    TaskState,
};
