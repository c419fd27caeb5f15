//! Storage collaborator seam. The engine never does I/O itself: the command
//! service loads a [`Snapshot`](crate::agenda::Snapshot) through a [`Store`]
//! and writes status and one-off changes back through it.

pub mod memory;

use crate::one_off::OneOffItem;
use crate::range::DateRange;
use crate::schedule::Customer;
use crate::status::StatusRecord;

#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn customers(&self) -> orchard_shared::Result<Vec<Customer>>;

    async fn find_customer(&self, id: &str) -> orchard_shared::Result<Option<Customer>>;

    async fn put_customer(&self, customer: &Customer) -> orchard_shared::Result<()>;

    /// Items dated inside `range`, deleted ones included.
    async fn one_off_items(&self, range: DateRange) -> orchard_shared::Result<Vec<OneOffItem>>;

    async fn find_one_off(&self, id: &str) -> orchard_shared::Result<Option<OneOffItem>>;

    async fn put_one_off(&self, item: &OneOffItem) -> orchard_shared::Result<()>;

    async fn status_records(&self, range: DateRange) -> orchard_shared::Result<Vec<StatusRecord>>;

    /// Inserts or replaces by record id.
    async fn put_status(&self, record: &StatusRecord) -> orchard_shared::Result<()>;

    /// Removing a missing record is not an error.
    async fn delete_status(&self, id: &str) -> orchard_shared::Result<()>;
}
