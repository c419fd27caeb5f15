use std::sync::Arc;

use orchard_schedule::{
    AgendaQuery, Change, DateRange, Kind, MemoryStore, SkipDetails, SkipReason, Status, Store,
    TargetStatus,
};
use temp_dir::TempDir;
use time::macros::date;

mod helpers;

const WEEKLY_MONDAY: &str = r#"{"mode":"WE_GET_ORDER","frequency":"WEEKLY","orderDay1":"mon"}"#;

#[tokio::test]
async fn done_then_undo_leaves_no_record() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = state.command();
    let range = DateRange::week(date!(2025 - 01 - 06));

    let mut snapshot = command.load(range).await?;
    command
        .import_customers(&mut snapshot, vec![helpers::customer("c1", WEEKLY_MONDAY)])
        .await?;

    let query = AgendaQuery::new(range);
    let delivery = snapshot
        .agenda(&query)
        .into_iter()
        .find(|item| item.occurrence.kind == Kind::Delivery)
        .unwrap();

    command
        .set_status(&mut snapshot, &delivery.occurrence, TargetStatus::Done)
        .await?;

    let reloaded = command.load(range).await?;
    let item = reloaded
        .agenda(&query)
        .into_iter()
        .find(|item| item.selection_id == delivery.selection_id)
        .unwrap();
    assert_eq!(item.status, Status::Done);
    assert!(item.completed_at.is_some());

    let change = command
        .set_status(&mut snapshot, &delivery.occurrence, TargetStatus::Pending)
        .await?;
    assert!(matches!(change, Change::Remove(_)));

    let reloaded = command.load(range).await?;
    assert!(reloaded.status_records.is_empty());
    assert!(snapshot.status_records.is_empty());
    let item = reloaded
        .agenda(&query)
        .into_iter()
        .find(|item| item.selection_id == delivery.selection_id)
        .unwrap();
    assert_eq!(item.status, Status::Pending);
    assert_eq!(item.skipped_reason, None);
    assert_eq!(item.skipped_reason_text, None);
    assert_eq!(item.completed_at, None);

    let change = command
        .set_status(&mut snapshot, &delivery.occurrence, TargetStatus::Pending)
        .await?;
    assert_eq!(change, Change::Unchanged);

    Ok(())
}

#[tokio::test]
async fn skip_reason_is_persisted() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = state.command();
    let range = DateRange::day(date!(2025 - 01 - 06));

    let mut snapshot = command.load(range).await?;
    command
        .import_customers(&mut snapshot, vec![helpers::customer("c1", WEEKLY_MONDAY)])
        .await?;
    let order = snapshot
        .agenda(&AgendaQuery::new(range))
        .into_iter()
        .find(|item| item.occurrence.kind == Kind::ExpectedOrder)
        .unwrap();

    command
        .set_status(
            &mut snapshot,
            &order.occurrence,
            TargetStatus::Skipped(SkipDetails::new(
                SkipReason::Custom,
                Some("  closed for stocktake ".to_owned()),
            )),
        )
        .await?;

    let records = state.store.status_records(range).await?;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, Status::Skipped);
    assert_eq!(records[0].skipped_reason, Some(SkipReason::Custom));
    assert_eq!(
        records[0].skipped_reason_text.as_deref(),
        Some("closed for stocktake")
    );
    assert_eq!(records[0].run_index, Some(1));
    assert_eq!(records[0].completed_at, None);

    Ok(())
}

#[tokio::test]
async fn custom_skip_without_text_writes_nothing() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let remote = Arc::new(MemoryStore::new());
    let command = state.command().with_remote(remote.clone());
    let range = DateRange::day(date!(2025 - 01 - 06));

    let mut snapshot = command.load(range).await?;
    command
        .import_customers(&mut snapshot, vec![helpers::customer("c1", WEEKLY_MONDAY)])
        .await?;
    let item = snapshot.agenda(&AgendaQuery::new(range)).remove(0);

    let result = command
        .set_status(
            &mut snapshot,
            &item.occurrence,
            TargetStatus::Skipped(SkipDetails::new(SkipReason::Custom, Some(" ".to_owned()))),
        )
        .await;

    assert!(matches!(result, Err(orchard_shared::Error::Validate(_))));
    assert!(remote.status_records(range).await?.is_empty());
    assert!(state.store.status_records(range).await?.is_empty());
    assert!(snapshot.status_records.is_empty());

    Ok(())
}

#[tokio::test]
async fn writes_reach_remote_then_local() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let remote = Arc::new(MemoryStore::new());
    let command = state.command().with_remote(remote.clone());
    let range = DateRange::day(date!(2025 - 01 - 06));

    let mut snapshot = command.load(range).await?;
    command
        .import_customers(&mut snapshot, vec![helpers::customer("c1", WEEKLY_MONDAY)])
        .await?;
    assert_eq!(remote.customers().await?.len(), 1);

    let item = snapshot.agenda(&AgendaQuery::new(range)).remove(0);
    command
        .set_status(&mut snapshot, &item.occurrence, TargetStatus::Done)
        .await?;

    let remote_records = remote.status_records(range).await?;
    let local_records = state.store.status_records(range).await?;
    assert_eq!(remote_records.len(), 1);
    assert_eq!(local_records.len(), 1);
    assert_eq!(remote_records[0].id, local_records[0].id);
    assert_eq!(local_records[0].status, Status::Done);

    Ok(())
}

#[tokio::test]
async fn failed_remote_write_keeps_snapshot_unchanged() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let range = DateRange::day(date!(2025 - 01 - 06));

    let mut snapshot = state.command().load(range).await?;
    state
        .command()
        .import_customers(&mut snapshot, vec![helpers::customer("c1", WEEKLY_MONDAY)])
        .await?;

    let command = state
        .command()
        .with_remote(Arc::new(helpers::UnreachableStore::default()));
    let item = snapshot.agenda(&AgendaQuery::new(range)).remove(0);

    let result = command
        .set_status(&mut snapshot, &item.occurrence, TargetStatus::Done)
        .await;

    assert_eq!(result.unwrap_err().to_string(), "remote unreachable");
    assert!(snapshot.status_records.is_empty());
    assert!(state.store.status_records(range).await?.is_empty());
    assert!(
        snapshot
            .agenda(&AgendaQuery::new(range))
            .iter()
            .all(|item| item.status == Status::Pending)
    );

    Ok(())
}
