//! Shared world state for task time ledger BDD scenarios.

use std::sync::Arc;

use carpenter::order::adapters::memory::InMemoryOrderDirectory;
use carpenter::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::TaskId,
    services::{TaskLifecycleError, TaskLifecycleService, TaskView},
};
use chrono::{DateTime, Utc};
use rstest::fixture;

use crate::test_helpers::{ManualClock, seeded_order};

/// Service type used by the BDD world.
pub type TestTaskService =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryOrderDirectory, ManualClock>;

/// Scenario world for time ledger behaviour tests.
pub struct TaskLedgerWorld {
    pub clock: ManualClock,
    pub service: TestTaskService,
    pub task_id: Option<TaskId>,
    pub first_started_at: Option<DateTime<Utc>>,
    pub last_result: Option<Result<TaskView, TaskLifecycleError>>,
    pub concurrent_results: Vec<Result<TaskView, TaskLifecycleError>>,
}

impl TaskLedgerWorld {
    /// Creates a world with one seeded order and a frozen clock.
    #[must_use]
    pub fn new() -> Self {
        let clock = ManualClock::default();
        let orders = InMemoryOrderDirectory::new();
        orders.insert(seeded_order()).expect("seed order");
        let service = TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(orders),
            Arc::new(clock.clone()),
        );

        Self {
            clock,
            service,
            task_id: None,
            first_started_at: None,
            last_result: None,
            concurrent_results: Vec::new(),
        }
    }

    /// Returns the scenario task.
    pub fn task_id(&self) -> Result<TaskId, eyre::Report> {
        self.task_id
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Reads the current card.
    pub fn current(&self) -> Result<TaskView, eyre::Report> {
        let task_id = self.task_id()?;
        Ok(run_async(self.service.find(task_id))?)
    }
}

impl Default for TaskLedgerWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskLedgerWorld {
    TaskLedgerWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
