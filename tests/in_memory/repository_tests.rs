//! Contract tests for the in-memory task repository.

use carpenter::order::domain::OrderId;
use carpenter::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Assignee, Task, TaskDetails, TaskState},
    ports::{TaskFilter, TaskRepository, TaskRepositoryError},
};
use eyre::{Result, ensure, eyre};
use rstest::{fixture, rstest};

use crate::test_helpers::ManualClock;

#[fixture]
fn clock() -> ManualClock {
    ManualClock::default()
}

fn task(clock: &ManualClock, title: &str, assignee: &str) -> Result<Task> {
    let details = TaskDetails::new(title, "Corte", "Alta")?;
    Ok(Task::new(
        OrderId::new(1)?,
        details,
        Assignee::new(assignee)?,
        clock,
    ))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_revision_is_rejected(clock: ManualClock) -> Result<()> {
    let repository = InMemoryTaskRepository::new();
    let mut stored = task(&clock, "Cortar", "ana")?;
    repository.store(&stored).await?;

    let mut concurrent = stored.clone();
    stored.start(&clock)?;
    repository.update(&stored, 0).await?;
    clock.advance(5);
    concurrent.finish(&clock)?;
    let result = repository.update(&concurrent, 0).await;

    ensure!(
        matches!(result, Err(TaskRepositoryError::Conflict { expected_revision: 0, .. })),
        "expected a conflict, got {result:?}"
    );
    let current = repository
        .find_by_id(stored.id())
        .await?
        .ok_or_else(|| eyre!("task disappeared"))?;
    ensure!(current.state() == TaskState::InProgress, "winner must be kept");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_store_and_missing_update_are_reported(clock: ManualClock) -> Result<()> {
    let repository = InMemoryTaskRepository::new();
    let stored = task(&clock, "Cortar", "ana")?;
    repository.store(&stored).await?;

    let duplicate = repository.store(&stored).await;
    let missing = repository
        .update(&task(&clock, "Lijar", "ana")?, 0)
        .await;

    ensure!(
        matches!(duplicate, Err(TaskRepositoryError::DuplicateTask(_))),
        "expected a duplicate error, got {duplicate:?}"
    );
    ensure!(
        matches!(missing, Err(TaskRepositoryError::NotFound(_))),
        "expected not found, got {missing:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_keeps_creation_order_and_applies_filters(clock: ManualClock) -> Result<()> {
    let repository = InMemoryTaskRepository::new();
    let mut running = task(&clock, "Cortar", "ana")?;
    repository.store(&running).await?;
    repository.store(&task(&clock, "Lijar", "luis")?).await?;
    repository.store(&task(&clock, "Pintar", "ana")?).await?;
    running.start(&clock)?;
    repository.update(&running, 0).await?;

    let all = repository.list(&TaskFilter::all()).await?;
    let titles: Vec<&str> = all.iter().map(|item| item.details().title()).collect();
    ensure!(titles == ["Cortar", "Lijar", "Pintar"], "unexpected order {titles:?}");

    let filter = TaskFilter::all()
        .with_assignee(Assignee::new("ana")?)
        .with_state(TaskState::ToDo);
    let idle_for_ana = repository.list(&filter).await?;
    ensure!(idle_for_ana.len() == 1, "expected one idle task for ana");
    Ok(())
}
