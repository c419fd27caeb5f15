use std::sync::Arc;

use time::OffsetDateTime;
use validator::Validate;

use crate::agenda::Snapshot;
use crate::key::EventKey;
use crate::migration::{Confirmation, migrate_schedule};
use crate::occurrence::Occurrence;
use crate::one_off::{CreateOneOffInput, OneOffItem};
use crate::range::DateRange;
use crate::schedule::Customer;
use crate::status::{Change, TargetStatus, plan_transition};
use crate::store::Store;

/// Write side of the scheduler. Every mutation goes to the remote store
/// first when one is configured, then to the local store. The first failure
/// is returned and the snapshot is left as it was.
#[derive(Clone)]
pub struct Command {
    local: Arc<dyn Store>,
    remote: Option<Arc<dyn Store>>,
}

impl Command {
    pub fn new(local: Arc<dyn Store>) -> Self {
        Self {
            local,
            remote: None,
        }
    }

    pub fn with_remote(self, remote: Arc<dyn Store>) -> Self {
        Self {
            remote: Some(remote),
            ..self
        }
    }

    fn stores(&self) -> impl Iterator<Item = &Arc<dyn Store>> {
        self.remote.iter().chain(std::iter::once(&self.local))
    }

    /// Reads customers plus the one-offs and status records dated in `range`
    /// from the local store.
    #[tracing::instrument(skip(self), fields(start = %range.start(), end = %range.end()))]
    pub async fn load(&self, range: DateRange) -> orchard_shared::Result<Snapshot> {
        let snapshot = Snapshot {
            customers: self.local.customers().await?,
            one_off_items: self.local.one_off_items(range).await?,
            status_records: self.local.status_records(range).await?,
        };

        tracing::debug!(
            customers = snapshot.customers.len(),
            one_off_items = snapshot.one_off_items.len(),
            status_records = snapshot.status_records.len(),
            "snapshot loaded"
        );

        Ok(snapshot)
    }

    async fn write_customer(&self, customer: &Customer) -> orchard_shared::Result<()> {
        for store in self.stores() {
            store.put_customer(customer).await?;
        }

        Ok(())
    }

    async fn write_one_off(&self, item: &OneOffItem) -> orchard_shared::Result<()> {
        for store in self.stores() {
            store.put_one_off(item).await?;
        }

        Ok(())
    }

    /// Upserts customers by id. Every id is checked before anything is
    /// written. Each customer enters the snapshot as soon as its own writes
    /// succeed, so a failure part way leaves the snapshot matching what the
    /// stores hold.
    #[tracing::instrument(skip_all, fields(count = customers.len()))]
    pub async fn import_customers(
        &self,
        snapshot: &mut Snapshot,
        customers: Vec<Customer>,
    ) -> orchard_shared::Result<usize> {
        for customer in &customers {
            customer.validate()?;
        }

        let count = customers.len();
        for customer in customers {
            self.write_customer(&customer).await?;
            snapshot.put_customer(customer);
        }

        tracing::info!(count, "customers imported");

        Ok(count)
    }

    /// Moves an occurrence to `target`. Pending deletes the stored record and
    /// is a no-op when there is none.
    #[tracing::instrument(skip_all, fields(key = %EventKey::from(occurrence)))]
    pub async fn set_status(
        &self,
        snapshot: &mut Snapshot,
        occurrence: &Occurrence,
        target: TargetStatus,
    ) -> orchard_shared::Result<Change> {
        let key = EventKey::from(occurrence);
        let change = plan_transition(
            snapshot.find_status(&key),
            occurrence,
            target,
            OffsetDateTime::now_utc(),
        )?;

        match &change {
            Change::Unchanged => {}
            Change::Put(record) => {
                for store in self.stores() {
                    store.put_status(record).await?;
                }
            }
            Change::Remove(record) => {
                for store in self.stores() {
                    store.delete_status(&record.id).await?;
                }
            }
        }

        tracing::info!(?change, "status updated");
        snapshot.apply_status(change.clone());

        Ok(change)
    }

    async fn find_one_off(
        &self,
        snapshot: &Snapshot,
        id: &str,
    ) -> orchard_shared::Result<OneOffItem> {
        if let Some(item) = snapshot.find_one_off(id) {
            return Ok(item.clone());
        }

        self.local
            .find_one_off(id)
            .await?
            .ok_or_else(|| orchard_shared::Error::NotFound(format!("one-off item '{id}'")))
    }

    #[tracing::instrument(skip_all, fields(kind = %input.kind, date = %input.date))]
    pub async fn create_one_off(
        &self,
        snapshot: &mut Snapshot,
        input: CreateOneOffInput,
    ) -> orchard_shared::Result<OneOffItem> {
        let input = input.normalized();
        input.validate()?;

        if let Some(customer_id) = &input.customer_id {
            let known = match snapshot.find_customer(customer_id) {
                Some(_) => true,
                None => self.local.find_customer(customer_id).await?.is_some(),
            };
            if !known {
                return Err(orchard_shared::Error::NotFound(format!(
                    "customer '{customer_id}'"
                )));
            }
        }

        let item = OneOffItem {
            id: ulid::Ulid::new().to_string(),
            kind: input.kind,
            date: input.date,
            customer_id: input.customer_id,
            rep_id: input.rep_id,
            note: input.note,
            is_deleted: false,
        };

        self.write_one_off(&item).await?;
        snapshot.put_one_off(item.clone());

        tracing::info!(id = %item.id, "one-off created");

        Ok(item)
    }

    async fn set_one_off_deleted(
        &self,
        snapshot: &mut Snapshot,
        id: &str,
        is_deleted: bool,
    ) -> orchard_shared::Result<OneOffItem> {
        let item = OneOffItem {
            is_deleted,
            ..self.find_one_off(snapshot, id).await?
        };

        self.write_one_off(&item).await?;
        snapshot.put_one_off(item.clone());

        Ok(item)
    }

    #[tracing::instrument(skip(self, snapshot))]
    pub async fn delete_one_off(
        &self,
        snapshot: &mut Snapshot,
        id: &str,
    ) -> orchard_shared::Result<OneOffItem> {
        self.set_one_off_deleted(snapshot, id, true).await
    }

    #[tracing::instrument(skip(self, snapshot))]
    pub async fn restore_one_off(
        &self,
        snapshot: &mut Snapshot,
        id: &str,
    ) -> orchard_shared::Result<OneOffItem> {
        self.set_one_off_deleted(snapshot, id, false).await
    }

    /// Moves a one-off by `days` calendar days. The item keeps its id, so an
    /// existing status record no longer matches it.
    #[tracing::instrument(skip(self, snapshot))]
    pub async fn shift_one_off(
        &self,
        snapshot: &mut Snapshot,
        id: &str,
        days: i64,
    ) -> orchard_shared::Result<OneOffItem> {
        let item = self.find_one_off(snapshot, id).await?;
        let Some(item) = item.shifted(days) else {
            orchard_shared::bail!("one-off item '{id}' cannot move by {days} days");
        };

        self.write_one_off(&item).await?;
        snapshot.put_one_off(item.clone());

        Ok(item)
    }

    /// Rewrites every customer's day indices from Sunday = 0 to Monday = 0.
    /// Not idempotent: running it twice shifts days twice. Customers are
    /// applied to the snapshot one by one after their writes succeed.
    #[tracing::instrument(skip_all)]
    pub async fn migrate_day_indexes(
        &self,
        snapshot: &mut Snapshot,
        _confirmation: Confirmation,
    ) -> orchard_shared::Result<usize> {
        let migrated = snapshot
            .customers
            .iter()
            .map(|customer| Customer {
                schedule: migrate_schedule(&customer.schedule),
                ..customer.clone()
            })
            .collect::<Vec<_>>();

        let count = migrated.len();
        for customer in migrated {
            self.write_customer(&customer).await?;
            snapshot.put_customer(customer);
        }

        tracing::warn!(count, "day indexes migrated from sunday-first to monday-first");

        Ok(count)
    }
}
