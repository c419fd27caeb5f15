use std::sync::Arc;

use orchard_schedule::{DateRange, Store};
use temp_dir::TempDir;
use time::macros::date;

mod helpers;

const WEEKLY: &str = r#"{"mode":"WE_GET_ORDER","frequency":"WEEKLY","orderDay1":1}"#;

#[tokio::test]
async fn import_rejects_ids_that_cannot_be_keyed() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = state.command();
    let mut snapshot = command.load(DateRange::day(date!(2025 - 01 - 06))).await?;

    for bad in ["a|b", "oneoff", " c1", ""] {
        let result = command
            .import_customers(
                &mut snapshot,
                vec![helpers::customer("c1", WEEKLY), helpers::customer(bad, WEEKLY)],
            )
            .await;

        assert!(
            matches!(result, Err(orchard_shared::Error::Validate(_))),
            "{bad:?} accepted"
        );
    }

    assert!(snapshot.customers.is_empty());
    assert!(state.store.customers().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn interrupted_import_keeps_written_customers() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = state
        .command()
        .with_remote(Arc::new(helpers::UnreachableStore::after_customer_writes(1)));
    let mut snapshot = command.load(DateRange::day(date!(2025 - 01 - 06))).await?;

    let result = command
        .import_customers(
            &mut snapshot,
            vec![
                helpers::customer("c1", WEEKLY),
                helpers::customer("c2", WEEKLY),
            ],
        )
        .await;
    assert!(result.is_err());

    let stored = state.store.customers().await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, "c1");
    assert_eq!(snapshot.customers, stored);

    Ok(())
}
