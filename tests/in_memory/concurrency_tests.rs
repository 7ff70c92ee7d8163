//! Concurrent seat requests against shared workplaces.

use super::helpers::{TestEngine, create_task, engine, operator, register_workplace, seated};
use eyre::{bail, ensure};
use rstest::rstest;
use tokio::task::JoinSet;
use workfloor::task::{
    domain::{TaskId, TaskStatus},
    ports::TaskQuery,
};
use workfloor::workplace::domain::OperatorId;

const CAPACITY: usize = 3;

async fn start_then_maybe_leave(
    engine: TestEngine,
    task_id: TaskId,
    op: OperatorId,
    leaves: bool,
) -> eyre::Result<()> {
    match engine.start_work(task_id, &op).await {
        Ok(_) if leaves => {
            engine.remove_operator(task_id, &op).await?;
            Ok(())
        }
        Ok(_) => Ok(()),
        Err(err) if err.is_capacity_exceeded() => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_operators_never_overfill_a_workplace(engine: TestEngine) -> eyre::Result<()> {
    let seats = i64::try_from(CAPACITY)?;
    let bench = register_workplace(&engine, "W", seats).await?;
    let names: Vec<String> = (0..=CAPACITY).map(|n| format!("op-{n}")).collect();
    let mut tasks = Vec::with_capacity(names.len());
    for name in &names {
        let task_id = create_task(&engine, bench, &format!("Task for {name}"), &[name.as_str()]).await?;
        tasks.push((task_id, operator(name)));
    }

    let mut attempts = JoinSet::new();
    for (task_id, op) in tasks {
        let racer = engine.clone();
        attempts.spawn(async move { racer.start_work(task_id, &op).await });
    }

    let mut started = 0_usize;
    let mut refused = 0_usize;
    while let Some(joined) = attempts.join_next().await {
        match joined? {
            Ok(_) => started += 1,
            Err(err) if err.is_capacity_exceeded() => refused += 1,
            Err(err) => bail!("unexpected failure: {err}"),
        }
    }

    ensure!(started == CAPACITY, "expected {CAPACITY} starts, got {started}");
    ensure!(refused == 1, "expected one refusal, got {refused}");
    ensure!(seated(&engine, bench).await?.len() == CAPACITY);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_closes_release_a_shared_seat_once(engine: TestEngine) -> eyre::Result<()> {
    let bench = register_workplace(&engine, "W", 2).await?;
    let first = create_task(&engine, bench, "T1", &["alice"]).await?;
    let second = create_task(&engine, bench, "T2", &["alice"]).await?;
    engine.start_work(first, &operator("alice")).await?;
    engine.start_work(second, &operator("alice")).await?;

    let completer = engine.clone();
    let defector = engine.clone();
    let (completed, flagged) = tokio::join!(
        tokio::spawn(async move { completer.complete_task(first).await }),
        tokio::spawn(async move { defector.flag_defect(second, "chipped edge").await }),
    );
    completed??;
    flagged??;

    ensure!(seated(&engine, bench).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn in_progress_operators_always_hold_seats(engine: TestEngine) -> eyre::Result<()> {
    let bench = register_workplace(&engine, "W", 2).await?;
    let crew = ["alice", "bob", "carol", "dave"];
    let mut task_ids = Vec::new();
    for index in 0..6 {
        task_ids.push(create_task(&engine, bench, &format!("T{index}"), &crew).await?);
    }

    let mut work = JoinSet::new();
    for (index, task_id) in task_ids.iter().copied().enumerate() {
        for name in crew {
            let worker = engine.clone();
            let op = operator(name);
            let leaves = index == 0 || name == "bob";
            work.spawn(start_then_maybe_leave(worker, task_id, op, leaves));
        }
    }
    while let Some(joined) = work.join_next().await {
        joined??;
    }

    let occupants = seated(&engine, bench).await?;
    ensure!(occupants.len() <= 2, "workplace overfilled: {occupants:?}");
    let running = engine
        .search(&TaskQuery::new().with_statuses([TaskStatus::InProgress]))
        .await?;
    for task in running {
        for current in task.current_operators() {
            ensure!(
                occupants.contains(&current.to_string()),
                "{current} works {} without a seat",
                task.name()
            );
        }
    }
    Ok(())
}
