//! In-memory integration tests for end-to-end task workflows.

use super::helpers::{TestEngine, create_task, engine, operator, register_workplace, seated};
use chrono::{TimeZone, Utc};
use eyre::{OptionExt, ensure};
use rstest::rstest;
use workfloor::failure::FailureKind;
use workfloor::task::{
    domain::TaskStatus,
    ports::TaskQuery,
    services::CreateTaskRequest,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn operator_works_a_task_from_start_to_completion(engine: TestEngine) -> eyre::Result<()> {
    let bench = register_workplace(&engine, "W", 2).await?;
    let task_id = create_task(&engine, bench, "Assemble gearbox", &["alice"]).await?;

    let started = engine.start_work(task_id, &operator("alice")).await?;
    ensure!(started.status() == TaskStatus::InProgress);
    ensure!(started.color() == 1);
    ensure!(seated(&engine, bench).await? == ["alice"]);

    let completed = engine.complete_task(task_id).await?;
    ensure!(completed.status() == TaskStatus::Completed);
    ensure!(completed.color() == 10);
    ensure!(completed.current_operators().is_empty());
    ensure!(completed.operator_history().contains(&operator("alice")));
    ensure!(seated(&engine, bench).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_operator_waits_for_a_free_seat(engine: TestEngine) -> eyre::Result<()> {
    let bench = register_workplace(&engine, "W", 1).await?;
    let first = create_task(&engine, bench, "T1", &["alice", "bob"]).await?;
    let second = create_task(&engine, bench, "T2", &["alice", "bob"]).await?;
    engine.start_work(first, &operator("alice")).await?;

    let refused = engine.start_work(second, &operator("bob")).await;
    ensure!(refused.is_err_and(|err| err.kind() == FailureKind::CapacityExceeded));
    ensure!(engine.get(second).await?.status() == TaskStatus::Ready);

    engine.complete_task(first).await?;
    let retried = engine.start_work(second, &operator("bob")).await?;
    ensure!(retried.status() == TaskStatus::InProgress);
    ensure!(seated(&engine, bench).await? == ["bob"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shared_seat_survives_cancelling_one_of_two_tasks(engine: TestEngine) -> eyre::Result<()> {
    let bench = register_workplace(&engine, "W", 2).await?;
    let first = create_task(&engine, bench, "T1", &["alice"]).await?;
    let second = create_task(&engine, bench, "T2", &["alice"]).await?;
    engine.start_work(first, &operator("alice")).await?;
    engine.start_work(second, &operator("alice")).await?;

    let cancelled = engine
        .cancel_task(first, &operator("alice"), "wrong drawing")
        .await?;
    ensure!(cancelled.status() == TaskStatus::Cancelled);
    ensure!(seated(&engine, bench).await? == ["alice"]);

    engine.remove_operator(second, &operator("alice")).await?;
    ensure!(seated(&engine, bench).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn defect_frees_every_operator(engine: TestEngine) -> eyre::Result<()> {
    let bench = register_workplace(&engine, "W", 3).await?;
    let task_id = create_task(&engine, bench, "Cast housing", &["alice", "bob", "carol"]).await?;
    for name in ["alice", "bob", "carol"] {
        engine.start_work(task_id, &operator(name)).await?;
    }
    ensure!(seated(&engine, bench).await?.len() == 3);

    let flagged = engine.flag_defect(task_id, "porosity").await?;

    ensure!(flagged.status() == TaskStatus::Defect);
    ensure!(flagged.operator_history().len() == 3);
    ensure!(seated(&engine, bench).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_task_notes_accumulate(engine: TestEngine) -> eyre::Result<()> {
    let bench = register_workplace(&engine, "W", 1).await?;
    let task_id = create_task(&engine, bench, "Paint", &["alice"]).await?;
    engine.append_note(task_id, "primer applied").await?;
    engine.start_work(task_id, &operator("alice")).await?;

    let cancelled = engine
        .cancel_task(task_id, &operator("alice"), "  out of topcoat  ")
        .await?;

    ensure!(cancelled.notes() == Some("primer applied\nCancelled: out of topcoat"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn order_date_window_filters_tasks(engine: TestEngine) -> eyre::Result<()> {
    let bench = register_workplace(&engine, "W", 1).await?;
    let march = Utc
        .with_ymd_and_hms(2026, 3, 10, 8, 0, 0)
        .single()
        .ok_or_eyre("valid timestamp")?;
    let june = Utc
        .with_ymd_and_hms(2026, 6, 1, 8, 0, 0)
        .single()
        .ok_or_eyre("valid timestamp")?;
    for (name, date) in [("Spring order", march), ("Summer order", june)] {
        engine
            .create_task(
                CreateTaskRequest::new(name, [operator("alice")])
                    .at_workplace(bench)
                    .with_customer_order_number(format!("SO-{name}"))
                    .with_order_date(date),
            )
            .await?;
    }

    let april = Utc
        .with_ymd_and_hms(2026, 4, 1, 0, 0, 0)
        .single()
        .ok_or_eyre("valid timestamp")?;
    let recent = engine
        .search(&TaskQuery::new().ordered_since(april))
        .await?;
    let older = engine
        .search(&TaskQuery::new().ordered_before(april))
        .await?;

    ensure!(recent.iter().map(|task| task.name()).eq(["Summer order"]));
    ensure!(older.iter().map(|task| task.name()).eq(["Spring order"]));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn summary_is_scoped_to_one_workplace(engine: TestEngine) -> eyre::Result<()> {
    let bench = register_workplace(&engine, "W", 1).await?;
    let press = register_workplace(&engine, "P", 1).await?;
    let at_bench = create_task(&engine, bench, "T1", &["alice"]).await?;
    create_task(&engine, press, "T2", &["alice"]).await?;
    engine.flag_defect(at_bench, "bad blank").await?;

    let summary = engine
        .status_summary(&TaskQuery::new().at_workplace(bench))
        .await?;

    let defect = summary
        .iter()
        .find(|group| group.status == TaskStatus::Defect)
        .ok_or_eyre("defect group present")?;
    ensure!(defect.count == 1);
    ensure!(summary.iter().map(|group| group.count).sum::<usize>() == 1);
    ensure!(summary.len() == TaskStatus::ALL.len());
    Ok(())
}
