use std::sync::Arc;

use orchard_schedule::{
    AgendaQuery, CreateOneOffInput, DateRange, Kind, Status, TargetStatus,
};
use temp_dir::TempDir;
use time::macros::date;

mod helpers;

fn input(kind: Kind, customer_id: Option<&str>) -> CreateOneOffInput {
    CreateOneOffInput {
        kind,
        date: date!(2025 - 01 - 08),
        customer_id: customer_id.map(str::to_owned),
        rep_id: None,
        note: "Trial delivery".to_owned(),
    }
}

#[tokio::test]
async fn create_delete_restore() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = state.command();
    let range = DateRange::week(date!(2025 - 01 - 06));

    let mut snapshot = command.load(range).await?;
    command
        .import_customers(
            &mut snapshot,
            vec![helpers::customer("c1", r#"{"mode":"THEY_PUT_ORDER"}"#)],
        )
        .await?;

    let item = command
        .create_one_off(&mut snapshot, input(Kind::Delivery, Some("c1")))
        .await?;

    let agenda = command.load(range).await?.agenda(&AgendaQuery::new(range));
    assert_eq!(agenda.len(), 1);
    assert_eq!(agenda[0].occurrence.source_id(), Some(item.id.as_str()));
    assert_eq!(agenda[0].occurrence.title, "Store c1");
    assert_eq!(agenda[0].occurrence.rep_id, "rep-1");
    assert_eq!(
        agenda[0].selection_id.to_string(),
        format!("oneoff|{}|2025-01-08|delivery", item.id)
    );

    command.delete_one_off(&mut snapshot, &item.id).await?;
    assert!(snapshot.agenda(&AgendaQuery::new(range)).is_empty());
    assert!(
        command
            .load(range)
            .await?
            .agenda(&AgendaQuery::new(range))
            .is_empty()
    );

    let restored = command.restore_one_off(&mut snapshot, &item.id).await?;
    assert!(!restored.is_deleted);
    assert_eq!(snapshot.agenda(&AgendaQuery::new(range)).len(), 1);

    Ok(())
}

#[tokio::test]
async fn create_rejects_bad_input() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = state.command();
    let mut snapshot = command.load(DateRange::day(date!(2025 - 01 - 08))).await?;

    let missing_customer = command
        .create_one_off(&mut snapshot, input(Kind::Delivery, None))
        .await;
    assert!(matches!(
        missing_customer,
        Err(orchard_shared::Error::Validate(_))
    ));

    let unknown_customer = command
        .create_one_off(&mut snapshot, input(Kind::Pack, Some("nobody")))
        .await;
    assert_eq!(
        unknown_customer.unwrap_err().to_string(),
        "customer 'nobody' not found"
    );

    let weekend = CreateOneOffInput {
        date: date!(2025 - 01 - 11),
        ..input(Kind::Pack, None)
    };
    assert!(command.create_one_off(&mut snapshot, weekend).await.is_err());
    assert!(snapshot.one_off_items.is_empty());

    Ok(())
}

#[tokio::test]
async fn shift_moves_item_and_drops_its_status() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = state.command();
    let range = DateRange::week(date!(2025 - 01 - 06));

    let mut snapshot = command.load(range).await?;
    let item = command
        .create_one_off(&mut snapshot, input(Kind::Pack, None))
        .await?;

    let occurrence = snapshot.agenda(&AgendaQuery::new(range))[0]
        .occurrence
        .clone();
    command
        .set_status(&mut snapshot, &occurrence, TargetStatus::Done)
        .await?;

    let shifted = command.shift_one_off(&mut snapshot, &item.id, -1).await?;
    assert_eq!(shifted.date, date!(2025 - 01 - 07));

    let agenda = command.load(range).await?.agenda(&AgendaQuery::new(range));
    assert_eq!(agenda.len(), 1);
    assert_eq!(agenda[0].occurrence.date, date!(2025 - 01 - 07));
    assert_eq!(agenda[0].occurrence.title, "Trial delivery");
    assert_eq!(agenda[0].status, Status::Pending);

    Ok(())
}

#[tokio::test]
async fn weekend_shift_hides_item() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = state.command();
    let range = DateRange::week(date!(2025 - 01 - 06));

    let mut snapshot = command.load(range).await?;
    let item = command
        .create_one_off(&mut snapshot, input(Kind::ExpectedOrder, None))
        .await?;
    command.shift_one_off(&mut snapshot, &item.id, 3).await?;

    assert!(snapshot.agenda(&AgendaQuery::new(range)).is_empty());
    assert_eq!(
        command.load(range).await?.one_off_items[0].date,
        date!(2025 - 01 - 11)
    );

    Ok(())
}

#[tokio::test]
async fn failed_remote_create_is_not_kept() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = state
        .command()
        .with_remote(Arc::new(helpers::UnreachableStore::default()));
    let range = DateRange::week(date!(2025 - 01 - 06));
    let mut snapshot = command.load(range).await?;

    assert!(
        command
            .create_one_off(&mut snapshot, input(Kind::Pack, None))
            .await
            .is_err()
    );
    assert!(snapshot.one_off_items.is_empty());
    assert!(command.load(range).await?.one_off_items.is_empty());

    Ok(())
}
