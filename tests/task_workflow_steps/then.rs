//! Then steps for task workflow BDD scenarios.

use super::world::{TaskWorkflowWorld, run_async};
use eyre::eyre;
use rstest_bdd_macros::then;
use workfloor::task::domain::TaskStatus;

#[then(r#"the task "{name}" is "{status}""#)]
fn task_has_status(
    world: &TaskWorkflowWorld,
    name: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre!("invalid expected status in scenario: {err}"))?;
    let task = run_async(world.engine.get(world.task(&name)?))?;
    if task.status() != expected {
        return Err(eyre!("expected {name} to be {expected}, found {}", task.status()));
    }
    Ok(())
}

#[then(r#"workplace "{code}" seats only "{operator}""#)]
fn workplace_seats_only(
    world: &TaskWorkflowWorld,
    code: String,
    operator: String,
) -> Result<(), eyre::Report> {
    let workplace = run_async(world.engine.registry().get(world.workplace(&code)?))?;
    let seated: Vec<String> = workplace
        .current_operators()
        .iter()
        .map(ToString::to_string)
        .collect();
    if seated != [operator.as_str()] {
        return Err(eyre!("expected only {operator} at {code}, found {seated:?}"));
    }
    Ok(())
}

#[then(r#"workplace "{code}" has no operators"#)]
fn workplace_is_empty(world: &TaskWorkflowWorld, code: String) -> Result<(), eyre::Report> {
    let workplace = run_async(world.engine.registry().get(world.workplace(&code)?))?;
    if !workplace.current_operators().is_empty() {
        return Err(eyre!(
            "expected {code} to be empty, found {:?}",
            workplace.current_operators()
        ));
    }
    Ok(())
}

#[then(r#"the last operation fails as "{kind}""#)]
fn last_operation_fails(world: &TaskWorkflowWorld, kind: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre!("missing operation result"))?;
    match result {
        Err(err) if err.kind().as_str() == kind => Ok(()),
        Err(err) => Err(eyre!("expected a {kind} failure, got {:?}: {err}", err.kind())),
        Ok(task) => Err(eyre!("expected a {kind} failure, but {} succeeded", task.name())),
    }
}

#[then(r#"the notes of "{name}" read "{notes}""#)]
fn task_notes_read(
    world: &TaskWorkflowWorld,
    name: String,
    notes: String,
) -> Result<(), eyre::Report> {
    let task = run_async(world.engine.get(world.task(&name)?))?;
    if task.notes() != Some(notes.as_str()) {
        return Err(eyre!("expected notes {notes:?}, found {:?}", task.notes()));
    }
    Ok(())
}
