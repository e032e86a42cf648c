//! Application services for the task lifecycle and board read model.

mod board;
mod lifecycle;
mod report;

pub use board::TaskView;
pub use lifecycle::{
    CreateTaskRequest, DEFAULT_CONFLICT_ATTEMPTS, ErrorKind, SetStatusRequest, TaskLifecycleError,
    TaskLifecycleResult, TaskLifecycleService,
};
pub use report::{OperatorTimeSummary, TimeReport, TimeReportRow};
