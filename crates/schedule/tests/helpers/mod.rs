use std::{
    path::PathBuf,
    str::FromStr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use orchard_schedule::{
    Command, Customer, DateRange, MemoryStore, OneOffItem, ScheduleRecord, SqliteStore,
    StatusRecord, Store,
};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};

pub struct TestState {
    pub pool: SqlitePool,
    pub store: Arc<SqliteStore>,
}

impl TestState {
    #[allow(dead_code)]
    pub fn command(&self) -> Command {
        Command::new(self.store.clone())
    }
}

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<TestState> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    orchard_db::migrator()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(TestState {
        store: Arc::new(SqliteStore(pool.clone())),
        pool,
    })
}

#[allow(dead_code)]
pub fn customer(id: &str, schedule: &str) -> Customer {
    Customer {
        id: id.to_owned(),
        assigned_rep_id: "rep-1".to_owned(),
        store_name: format!("Store {id}"),
        contact_name: format!("Contact {id}"),
        full_address: format!("{id} Orchard Lane"),
        phone: "0400 000 000".to_owned(),
        email: format!("{id}@orchard.localhost"),
        schedule: serde_json::from_str::<ScheduleRecord>(schedule).unwrap(),
    }
}

/// Remote stand-in that accepts reads and rejects writes. The default
/// rejects every write; [`UnreachableStore::after_customer_writes`] lets a
/// number of customer writes through first.
#[allow(dead_code)]
#[derive(Default)]
pub struct UnreachableStore {
    inner: MemoryStore,
    customer_writes: AtomicUsize,
}

#[allow(dead_code)]
impl UnreachableStore {
    pub fn after_customer_writes(count: usize) -> Self {
        Self {
            inner: MemoryStore::new(),
            customer_writes: AtomicUsize::new(count),
        }
    }
}

#[async_trait::async_trait]
impl Store for UnreachableStore {
    async fn customers(&self) -> orchard_shared::Result<Vec<Customer>> {
        self.inner.customers().await
    }

    async fn find_customer(&self, id: &str) -> orchard_shared::Result<Option<Customer>> {
        self.inner.find_customer(id).await
    }

    async fn put_customer(&self, customer: &Customer) -> orchard_shared::Result<()> {
        let accepted = self
            .customer_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if !accepted {
            return Err(orchard_shared::Error::Server("remote unreachable".to_owned()));
        }

        self.inner.put_customer(customer).await
    }

    async fn one_off_items(&self, range: DateRange) -> orchard_shared::Result<Vec<OneOffItem>> {
        self.inner.one_off_items(range).await
    }

    async fn find_one_off(&self, id: &str) -> orchard_shared::Result<Option<OneOffItem>> {
        self.inner.find_one_off(id).await
    }

    async fn put_one_off(&self, _item: &OneOffItem) -> orchard_shared::Result<()> {
        Err(orchard_shared::Error::Server("remote unreachable".to_owned()))
    }

    async fn status_records(&self, range: DateRange) -> orchard_shared::Result<Vec<StatusRecord>> {
        self.inner.status_records(range).await
    }

    async fn put_status(&self, _record: &StatusRecord) -> orchard_shared::Result<()> {
        Err(orchard_shared::Error::Server("remote unreachable".to_owned()))
    }

    async fn delete_status(&self, _id: &str) -> orchard_shared::Result<()> {
        Err(orchard_shared::Error::Server("remote unreachable".to_owned()))
    }
}
