use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use super::Store;
use crate::one_off::OneOffItem;
use crate::range::DateRange;
use crate::schedule::Customer;
use crate::status::StatusRecord;

/// Process-local [`Store`] keyed by id. Used when no database is configured
/// and as a remote stand-in in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    customers: RwLock<BTreeMap<String, Customer>>,
    one_off_items: RwLock<BTreeMap<String, OneOffItem>>,
    status_records: RwLock<BTreeMap<String, StatusRecord>>,
}

fn poisoned<T>(_: PoisonError<T>) -> orchard_shared::Error {
    orchard_shared::Error::Server("memory store lock poisoned".to_owned())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_customers(customers: impl IntoIterator<Item = Customer>) -> Self {
        let store = Self::default();
        if let Ok(mut map) = store.customers.write() {
            map.extend(customers.into_iter().map(|c| (c.id.to_owned(), c)));
        }

        store
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn customers(&self) -> orchard_shared::Result<Vec<Customer>> {
        Ok(self.customers.read().map_err(poisoned)?.values().cloned().collect())
    }

    async fn find_customer(&self, id: &str) -> orchard_shared::Result<Option<Customer>> {
        Ok(self.customers.read().map_err(poisoned)?.get(id).cloned())
    }

    async fn put_customer(&self, customer: &Customer) -> orchard_shared::Result<()> {
        self.customers
            .write()
            .map_err(poisoned)?
            .insert(customer.id.to_owned(), customer.clone());

        Ok(())
    }

    async fn one_off_items(&self, range: DateRange) -> orchard_shared::Result<Vec<OneOffItem>> {
        Ok(self
            .one_off_items
            .read()
            .map_err(poisoned)?
            .values()
            .filter(|item| range.contains(item.date))
            .cloned()
            .collect())
    }

    async fn find_one_off(&self, id: &str) -> orchard_shared::Result<Option<OneOffItem>> {
        Ok(self.one_off_items.read().map_err(poisoned)?.get(id).cloned())
    }

    async fn put_one_off(&self, item: &OneOffItem) -> orchard_shared::Result<()> {
        self.one_off_items
            .write()
            .map_err(poisoned)?
            .insert(item.id.to_owned(), item.clone());

        Ok(())
    }

    async fn status_records(&self, range: DateRange) -> orchard_shared::Result<Vec<StatusRecord>> {
        Ok(self
            .status_records
            .read()
            .map_err(poisoned)?
            .values()
            .filter(|record| range.contains(record.date))
            .cloned()
            .collect())
    }

    async fn put_status(&self, record: &StatusRecord) -> orchard_shared::Result<()> {
        self.status_records
            .write()
            .map_err(poisoned)?
            .insert(record.id.to_owned(), record.clone());

        Ok(())
    }

    async fn delete_status(&self, id: &str) -> orchard_shared::Result<()> {
        self.status_records.write().map_err(poisoned)?.remove(id);

        Ok(())
    }
}
