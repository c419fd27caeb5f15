mod customer_create_table;
mod one_off_item_create_date_idx;
mod one_off_item_create_table;
mod schedule_event_create_date_idx;
mod schedule_event_create_table;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "orchard",
    "m0_1",
    vec_box![],
    vec_box![
        customer_create_table::Operation,
        one_off_item_create_table::Operation,
        one_off_item_create_date_idx::Operation,
        schedule_event_create_table::Operation,
        schedule_event_create_date_idx::Operation
    ]
);
