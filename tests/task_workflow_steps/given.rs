//! Given steps for task workflow BDD scenarios.

use super::world::{TaskWorkflowWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use workfloor::task::services::CreateTaskRequest;
use workfloor::workplace::{domain::OperatorId, services::CreateWorkplaceRequest};

#[given(r#"a workplace "{code}" with capacity {capacity:i64}"#)]
fn workplace_with_capacity(
    world: &mut TaskWorkflowWorld,
    code: String,
    capacity: i64,
) -> Result<(), eyre::Report> {
    let workplace = run_async(world.engine.registry().create(CreateWorkplaceRequest::new(
        format!("Workplace {code}"),
        code.clone(),
        capacity,
    )))
    .wrap_err("register workplace for scenario")?;
    world.workplaces.insert(code, workplace.id());
    Ok(())
}

#[given(r#"a task "{name}" at "{code}" allowing "{operator}""#)]
fn task_at_workplace(
    world: &mut TaskWorkflowWorld,
    name: String,
    code: String,
    operator: String,
) -> Result<(), eyre::Report> {
    let workplace_id = world.workplace(&code)?;
    let request = CreateTaskRequest::new(name.clone(), [OperatorId::new(operator)?])
        .at_workplace(workplace_id);
    let task = run_async(world.engine.create_task(request)).wrap_err("create scenario task")?;
    world.tasks.insert(name, task.id());
    Ok(())
}

#[given(r#""{operator}" has started work on "{name}""#)]
fn operator_has_started(
    world: &mut TaskWorkflowWorld,
    operator: String,
    name: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task(&name)?;
    let operator_id = OperatorId::new(operator)?;
    run_async(world.engine.start_work(task_id, &operator_id))
        .wrap_err("start work in scenario setup")?;
    Ok(())
}
