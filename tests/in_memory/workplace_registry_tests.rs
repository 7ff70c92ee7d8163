//! In-memory integration tests for the workplace registry.

use super::helpers::{TestEngine, engine, operator, register_workplace, seated};
use eyre::ensure;
use rstest::rstest;
use workfloor::failure::FailureKind;
use workfloor::workplace::{
    domain::{Capacity, WorkplaceDetails, WorkplaceStatus},
    services::CreateWorkplaceRequest,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registered_workplace_is_listed_and_findable(engine: TestEngine) -> eyre::Result<()> {
    let registry = engine.registry();
    let created = registry
        .create(
            CreateWorkplaceRequest::new("Paint booth", "PB-1", 3)
                .with_description("Spray booth with extraction")
                .with_location("Hall C"),
        )
        .await?;

    let listed = registry.list_active().await?;
    ensure!(listed.len() == 1);
    ensure!(listed.first().map(|workplace| workplace.id()) == Some(created.id()));

    let found = registry.find_by_id(created.id()).await?;
    ensure!(found.as_ref() == Some(&created));
    ensure!(created.description() == Some("Spray booth with extraction"));
    ensure!(created.capacity().seats() == 3);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lookup_by_unknown_or_blank_code(engine: TestEngine) -> eyre::Result<()> {
    register_workplace(&engine, "PB-1", 1).await?;

    ensure!(engine.registry().find_by_code("PB-2").await?.is_none());
    let blank = engine.registry().find_by_code("  ").await;
    ensure!(blank.is_err_and(|err| err.kind() == FailureKind::Validation));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn details_update_keeps_occupancy(engine: TestEngine) -> eyre::Result<()> {
    let id = register_workplace(&engine, "PB-1", 1).await?;
    engine
        .registry()
        .try_acquire_seat(id, &operator("alice"))
        .await?;

    let updated = engine
        .registry()
        .update_details(
            id,
            WorkplaceDetails {
                name: Some("Booth one".to_owned()),
                notes: Some("filters changed".to_owned()),
                capacity: Some(Capacity::new(2)?),
                ..WorkplaceDetails::default()
            },
        )
        .await?;

    ensure!(updated.name() == "Booth one");
    ensure!(updated.notes() == Some("filters changed"));
    ensure!(updated.capacity().seats() == 2);
    ensure!(seated(&engine, id).await? == ["alice"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn authorised_operators_are_replaced(engine: TestEngine) -> eyre::Result<()> {
    let id = register_workplace(&engine, "PB-1", 1).await?;

    let updated = engine
        .registry()
        .set_authorized_operators(id, vec![operator("carol"), operator("dave")])
        .await?;

    let names: Vec<String> = updated
        .authorized_operators()
        .iter()
        .map(ToString::to_string)
        .collect();
    ensure!(names == ["carol", "dave"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn maintenance_does_not_evict_operators(engine: TestEngine) -> eyre::Result<()> {
    let id = register_workplace(&engine, "PB-1", 2).await?;
    engine
        .registry()
        .try_acquire_seat(id, &operator("alice"))
        .await?;

    let workplace = engine.registry().set_maintenance(id).await?;

    ensure!(workplace.status() == WorkplaceStatus::Maintenance);
    ensure!(seated(&engine, id).await? == ["alice"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn released_seat_can_be_taken_by_someone_else(engine: TestEngine) -> eyre::Result<()> {
    let id = register_workplace(&engine, "PB-1", 1).await?;
    let registry = engine.registry();
    registry.try_acquire_seat(id, &operator("alice")).await?;

    let refused = registry.try_acquire_seat(id, &operator("bob")).await;
    ensure!(refused.is_err_and(|err| err.kind() == FailureKind::CapacityExceeded));

    registry.release_seat(id, &operator("alice")).await?;
    registry.try_acquire_seat(id, &operator("bob")).await?;
    ensure!(seated(&engine, id).await? == ["bob"]);
    Ok(())
}
