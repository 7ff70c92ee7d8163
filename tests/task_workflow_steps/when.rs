//! When steps for task workflow BDD scenarios.

use super::world::{TaskWorkflowWorld, run_async};
use rstest_bdd_macros::when;
use workfloor::workplace::domain::OperatorId;

#[when(r#""{operator}" starts work on "{name}""#)]
fn operator_starts_work(
    world: &mut TaskWorkflowWorld,
    operator: String,
    name: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task(&name)?;
    let operator_id = OperatorId::new(operator)?;
    world.last_result = Some(run_async(world.engine.start_work(task_id, &operator_id)));
    Ok(())
}

#[when(r#"task "{name}" is completed"#)]
fn task_is_completed(world: &mut TaskWorkflowWorld, name: String) -> Result<(), eyre::Report> {
    let task_id = world.task(&name)?;
    world.last_result = Some(run_async(world.engine.complete_task(task_id)));
    Ok(())
}

#[when(r#""{operator}" cancels "{name}" because "{reason}""#)]
fn operator_cancels(
    world: &mut TaskWorkflowWorld,
    operator: String,
    name: String,
    reason: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task(&name)?;
    let operator_id = OperatorId::new(operator)?;
    world.last_result = Some(run_async(
        world.engine.cancel_task(task_id, &operator_id, &reason),
    ));
    Ok(())
}

#[when(r#"task "{name}" is flagged defective because "{reason}""#)]
fn task_is_flagged(
    world: &mut TaskWorkflowWorld,
    name: String,
    reason: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task(&name)?;
    world.last_result = Some(run_async(world.engine.flag_defect(task_id, &reason)));
    Ok(())
}
