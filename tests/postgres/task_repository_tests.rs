//! `PostgreSQL` task repository and order directory tests.

use carpenter::order::{
    adapters::postgres::PostgresOrderDirectory, domain::OrderId, ports::OrderDirectory,
};
use carpenter::task::{
    adapters::postgres::PostgresTaskRepository,
    domain::{Assignee, Task, TaskDetails, TaskState},
    ports::{TaskFilter, TaskRepository, TaskRepositoryError},
};
use eyre::{Result, ensure, eyre};
use rstest::rstest;

use super::cluster::BoxError;
use super::helpers::{TestDatabase, test_database};
use crate::test_helpers::ManualClock;

fn task(order_id: OrderId, clock: &ManualClock, assignee: &str) -> Result<Task> {
    let details = TaskDetails::new("Cortar tableros", "Corte", "Alta")?
        .with_description("Tableros de 18mm");
    Ok(Task::new(order_id, details, Assignee::new(assignee)?, clock))
}

fn database(fixture: Result<TestDatabase, BoxError>) -> Result<TestDatabase> {
    fixture.map_err(|err| eyre!("test database setup failed: {err}"))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn round_trip_keeps_the_ledger_fields(
    #[future] test_database: Result<TestDatabase, BoxError>,
) -> Result<()> {
    let db = database(test_database.await)?;
    let order_id = db.insert_order("Muebles Ruiz").await.map_err(|err| eyre!("{err}"))?;
    let clock = ManualClock::default();
    let repository = PostgresTaskRepository::new(db.pool.clone());

    let mut stored = task(order_id, &clock, "ana")?;
    repository.store(&stored).await?;
    stored.start(&clock)?;
    repository.update(&stored, 0).await?;
    clock.advance(42);
    stored.pause(&clock)?;
    repository.update(&stored, 1).await?;

    let loaded = repository
        .find_by_id(stored.id())
        .await?
        .ok_or_else(|| eyre!("stored task not found"))?;
    ensure!(loaded == stored, "round trip changed the task: {loaded:?}");
    ensure!(loaded.accumulated_seconds() == 42, "ledger lost seconds");
    ensure!(loaded.started_at().is_none(), "paused task kept its interval");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_revision_is_a_conflict(
    #[future] test_database: Result<TestDatabase, BoxError>,
) -> Result<()> {
    let db = database(test_database.await)?;
    let order_id = db.insert_order("Muebles Ruiz").await.map_err(|err| eyre!("{err}"))?;
    let clock = ManualClock::default();
    let repository = PostgresTaskRepository::new(db.pool.clone());

    let mut winner = task(order_id, &clock, "ana")?;
    repository.store(&winner).await?;
    let mut loser = winner.clone();
    winner.start(&clock)?;
    repository.update(&winner, 0).await?;
    loser.finish(&clock)?;

    let result = repository.update(&loser, 0).await;
    ensure!(
        matches!(result, Err(TaskRepositoryError::Conflict { expected_revision: 0, .. })),
        "expected a conflict, got {result:?}"
    );

    let orphan = task(order_id, &clock, "ana")?;
    let missing = repository.update(&orphan, 0).await;
    ensure!(
        matches!(missing, Err(TaskRepositoryError::NotFound(id)) if id == orphan.id()),
        "expected not found, got {missing:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn list_filters_by_operator_and_state(
    #[future] test_database: Result<TestDatabase, BoxError>,
) -> Result<()> {
    let db = database(test_database.await)?;
    let order_id = db.insert_order("Muebles Ruiz").await.map_err(|err| eyre!("{err}"))?;
    let clock = ManualClock::default();
    let repository = PostgresTaskRepository::new(db.pool.clone());
    let operator = "ana";

    let idle = task(order_id, &clock, operator)?;
    repository.store(&idle).await?;
    clock.advance(1);
    let mut running = task(order_id, &clock, operator)?;
    repository.store(&running).await?;
    running.start(&clock)?;
    repository.update(&running, 0).await?;
    repository
        .store(&task(order_id, &clock, "luis")?)
        .await?;

    let mine = repository
        .list(&TaskFilter::all().with_assignee(Assignee::new(operator)?))
        .await?;
    let mine_ids: Vec<_> = mine.iter().map(Task::id).collect();
    ensure!(mine_ids == vec![idle.id(), running.id()], "unexpected listing {mine_ids:?}");

    let in_progress = repository
        .list(
            &TaskFilter::all()
                .with_assignee(Assignee::new(operator)?)
                .with_state(TaskState::InProgress),
        )
        .await?;
    ensure!(
        in_progress.iter().map(Task::id).eq([running.id()]),
        "state filter returned {in_progress:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn order_directory_reads_the_summary(
    #[future] test_database: Result<TestDatabase, BoxError>,
) -> Result<()> {
    let db = database(test_database.await)?;
    let order_id = db.insert_order("Carpintería Sur").await.map_err(|err| eyre!("{err}"))?;
    let directory = PostgresOrderDirectory::new(db.pool.clone());

    let summary = directory
        .find(order_id)
        .await?
        .ok_or_else(|| eyre!("order not found"))?;
    ensure!(summary.client_name() == "Carpintería Sur", "wrong client");
    ensure!(summary.area() == "Corte", "wrong area");
    ensure!(summary.commitment_date().is_some(), "commitment date missing");
    Ok(())
}
