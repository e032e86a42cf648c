//! In-memory integration tests for board moves and the time ledger.

use std::sync::Arc;

use carpenter::order::adapters::memory::InMemoryOrderDirectory;
use carpenter::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{TaskId, TaskState},
    services::{CreateTaskRequest, ErrorKind, SetStatusRequest, TaskLifecycleService},
};
use eyre::{Result, ensure, eyre};
use rstest::{fixture, rstest};

use crate::test_helpers::{ManualClock, epoch, seeded_order};

type TestService =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryOrderDirectory, ManualClock>;

struct Board {
    clock: ManualClock,
    service: TestService,
}

#[fixture]
fn board() -> Board {
    let clock = ManualClock::default();
    let orders = InMemoryOrderDirectory::new();
    orders.insert(seeded_order()).expect("seed order");
    let service = TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        Arc::new(orders),
        Arc::new(clock.clone()),
    );
    Board { clock, service }
}

async fn new_task(board: &Board, assignee: &str) -> Result<TaskId> {
    let view = board
        .service
        .create_task(CreateTaskRequest::new(1, "Cortar tableros", assignee))
        .await?;
    Ok(view.task().id())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn elapsed_time_advances_while_running(board: Board) -> Result<()> {
    let task_id = new_task(&board, "ana").await?;
    board.service.start(task_id).await?;

    board.clock.advance(45);
    let first = board.service.find(task_id).await?;
    board.clock.advance(15);
    let second = board.service.find(task_id).await?;

    ensure!(first.elapsed_seconds() == 45, "first poll saw {}", first.elapsed_seconds());
    ensure!(second.elapsed_seconds() == 60, "second poll saw {}", second.elapsed_seconds());
    ensure!(second.task().accumulated_seconds() == 0, "ledger must not move while running");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_full_shift_of_board_moves_keeps_the_invariants(board: Board) -> Result<()> {
    let task_id = new_task(&board, "ana").await?;
    let moves = [
        ("En Curso", 600),
        ("Por Hacer", 120),
        ("En Curso", 300),
        ("Por Hacer", 60),
        ("En Curso", 30),
        ("Terminado", 0),
    ];

    let mut previous = 0;
    for (target, wait) in moves {
        let view = board
            .service
            .set_status(SetStatusRequest::new(task_id, target))
            .await?;
        let task = view.task();
        ensure!(
            (task.state() == TaskState::InProgress) == task.started_at().is_some(),
            "running flag and start time disagree after moving to {target}"
        );
        ensure!(task.accumulated_seconds() >= previous, "ledger went backwards");
        previous = task.accumulated_seconds();
        board.clock.advance(wait);
    }

    let done = board.service.find(task_id).await?;
    ensure!(done.task().state() == TaskState::Done, "task should be finished");
    ensure!(
        done.task().accumulated_seconds() == 930,
        "ledger is {}",
        done.task().accumulated_seconds()
    );
    ensure!(done.task().updated_at() > epoch(), "updated_at must follow the clock");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn finished_tasks_reject_every_action(board: Board) -> Result<()> {
    let task_id = new_task(&board, "ana").await?;
    board.service.finish(task_id).await?;

    let outcomes = [
        board.service.start(task_id).await.err(),
        board.service.pause(task_id).await.err(),
        board.service.finish(task_id).await.err(),
        board
            .service
            .set_status(SetStatusRequest::new(task_id, "En Curso"))
            .await
            .err(),
    ];

    for outcome in outcomes {
        let err = outcome.ok_or_else(|| eyre!("action on a finished task succeeded"))?;
        ensure!(err.kind() == ErrorKind::InvalidTransition, "unexpected error {err}");
    }
    Ok(())
}
