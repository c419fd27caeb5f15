use orchard_schedule::{AgendaQuery, DateRange, Filters, Kind, Summary, Toggles};
use temp_dir::TempDir;
use time::macros::date;

mod helpers;

#[tokio::test]
async fn month_grid_mixes_fortnightly_and_weekly() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = state.command();
    let range = DateRange::month_grid(date!(2025 - 01 - 15))?;
    assert_eq!(range.start(), date!(2024 - 12 - 30));
    assert_eq!(range.end(), date!(2025 - 02 - 02));

    let mut snapshot = command.load(range).await?;
    let mut fortnightly = helpers::customer(
        "c1",
        r#"{"mode":"WE_GET_ORDER","frequency":"FORTNIGHTLY","anchorDate":"2025-01-06","orderDay1":"thu","deliverDay1":"fri"}"#,
    );
    fortnightly.assigned_rep_id = "rep-2".to_owned();
    command
        .import_customers(
            &mut snapshot,
            vec![
                fortnightly,
                helpers::customer(
                    "c2",
                    r#"{"mode":"THEY_PUT_ORDER","frequency":"WEEKLY","customerOrderDays":["mon"],"packDays":["tue"],"deliverDays":["wed"]}"#,
                ),
            ],
        )
        .await?;

    let snapshot = command.load(range).await?;
    let items = snapshot.agenda(&AgendaQuery::new(range));
    assert_eq!(
        Summary::of(&items),
        Summary {
            expected_orders: 7,
            packs: 7,
            deliveries: 7,
        }
    );

    let c1_orders = items
        .iter()
        .filter(|i| {
            i.occurrence.customer_id.as_deref() == Some("c1")
                && i.occurrence.kind == Kind::ExpectedOrder
        })
        .map(|i| i.occurrence.date)
        .collect::<Vec<_>>();
    assert_eq!(c1_orders, vec![date!(2025 - 01 - 09), date!(2025 - 01 - 23)]);

    let dates = items.iter().map(|i| i.occurrence.date).collect::<Vec<_>>();
    let mut sorted = dates.clone();
    sorted.sort();
    assert_eq!(dates, sorted);

    Ok(())
}

#[tokio::test]
async fn rep_search_and_toggles_narrow_the_week() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let command = state.command();
    let range = DateRange::week(date!(2025 - 01 - 06));

    let mut snapshot = command.load(range).await?;
    let mut other_rep = helpers::customer(
        "c2",
        r#"{"mode":"WE_GET_ORDER","frequency":"WEEKLY","orderDay1":"mon"}"#,
    );
    other_rep.assigned_rep_id = "rep-2".to_owned();
    other_rep.phone = "03 5555 0101".to_owned();
    command
        .import_customers(
            &mut snapshot,
            vec![
                helpers::customer(
                    "c1",
                    r#"{"mode":"WE_GET_ORDER","frequency":"WEEKLY","orderDay1":"mon"}"#,
                ),
                other_rep,
            ],
        )
        .await?;

    let by_rep = snapshot.agenda(&AgendaQuery {
        range,
        filters: Filters {
            rep: "rep-2".parse()?,
            ..Default::default()
        },
    });
    assert_eq!(by_rep.len(), 3);
    assert!(by_rep.iter().all(|i| i.occurrence.rep_id == "rep-2"));

    let by_phone = snapshot.agenda(&AgendaQuery {
        range,
        filters: Filters {
            search: Some("5555".to_owned()),
            ..Default::default()
        },
    });
    assert_eq!(by_phone.len(), 3);

    let deliveries_only = snapshot.agenda(&AgendaQuery {
        range,
        filters: Filters {
            toggles: Toggles {
                expected_orders: false,
                packs: false,
                deliveries: true,
            },
            ..Default::default()
        },
    });
    assert_eq!(deliveries_only.len(), 2);
    assert!(
        deliveries_only
            .iter()
            .all(|i| i.occurrence.kind == Kind::Delivery
                && i.occurrence.date == date!(2025 - 01 - 07))
    );

    Ok(())
}
