//! When steps for task time ledger BDD scenarios.

use super::world::{TaskLedgerWorld, run_async};
use carpenter::task::services::SetStatusRequest;
use rstest_bdd_macros::when;

#[when("{seconds:u64} seconds pass")]
fn seconds_pass(world: &mut TaskLedgerWorld, seconds: u64) -> Result<(), eyre::Report> {
    world.clock.advance(i64::try_from(seconds)?);
    Ok(())
}

#[when("the task is started")]
fn task_is_started(world: &mut TaskLedgerWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let result = run_async(world.service.start(task_id));
    if let (None, Ok(view)) = (world.first_started_at, &result) {
        world.first_started_at = view.task().started_at();
    }
    world.last_result = Some(result);
    Ok(())
}

#[when("the task is paused")]
fn task_is_paused(world: &mut TaskLedgerWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    world.last_result = Some(run_async(world.service.pause(task_id)));
    Ok(())
}

#[when("the task is finished")]
fn task_is_finished(world: &mut TaskLedgerWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    world.last_result = Some(run_async(world.service.finish(task_id)));
    Ok(())
}

#[when(r#"the task is moved to "{target_state}""#)]
fn task_is_moved(world: &mut TaskLedgerWorld, target_state: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    world.last_result = Some(run_async(
        world
            .service
            .set_status(SetStatusRequest::new(task_id, target_state)),
    ));
    Ok(())
}

#[when("two operators pause the task at the same time")]
fn two_operators_pause(world: &mut TaskLedgerWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let first = world.service.clone();
    let second = world.service.clone();
    let (left, right) = run_async(async move {
        tokio::join!(
            tokio::spawn(async move { first.pause(task_id).await }),
            tokio::spawn(async move { second.pause(task_id).await }),
        )
    });
    world.concurrent_results = vec![left?, right?];
    Ok(())
}
