use serde::Serialize;

use crate::day::{is_weekday_index, weekday_index};
use crate::filter::{self, Filters};
use crate::generator::generate;
use crate::key::EventKey;
use crate::occurrence::Kind;
use crate::one_off::{OneOffItem, overlay};
use crate::range::DateRange;
use crate::schedule::Customer;
use crate::status::{AgendaItem, Change, StatusRecord, merge};

/// Read-only collections a query runs against.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub customers: &'a [Customer],
    pub one_off_items: &'a [OneOffItem],
    pub status_records: &'a [StatusRecord],
}

#[derive(Debug, Clone)]
pub struct AgendaQuery {
    pub range: DateRange,
    pub filters: Filters,
}

impl AgendaQuery {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            filters: Filters::default(),
        }
    }
}

/// Builds the ordered agenda for a date range: recurring occurrences and
/// live one-offs, weekend items dropped, status attached, then filtered and
/// sorted.
pub fn agenda(context: &Context<'_>, query: &AgendaQuery) -> Vec<AgendaItem> {
    let mut occurrences = generate(context.customers, query.range);
    occurrences.extend(overlay(context.one_off_items, context.customers, query.range));
    occurrences.retain(|o| is_weekday_index(weekday_index(o.date)));

    let merged = merge(occurrences, context.status_records);
    let mut items = filter::apply(merged, &query.filters, context.customers);
    filter::sort(&mut items);

    tracing::debug!(
        start = %query.range.start(),
        end = %query.range.end(),
        items = items.len(),
        "built agenda"
    );

    items
}

/// Work counts per kind, as shown on the daily panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub expected_orders: usize,
    pub packs: usize,
    pub deliveries: usize,
}

impl Summary {
    pub fn of(items: &[AgendaItem]) -> Self {
        items
            .iter()
            .fold(Self::default(), |mut summary, item| {
                match item.occurrence.kind {
                    Kind::ExpectedOrder => summary.expected_orders += 1,
                    Kind::Pack => summary.packs += 1,
                    Kind::Delivery => summary.deliveries += 1,
                }
                summary
            })
    }
}

/// Owned copy of the collections loaded from the store. Only the command
/// service mutates it, and only after its writes are confirmed.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub customers: Vec<Customer>,
    pub one_off_items: Vec<OneOffItem>,
    pub status_records: Vec<StatusRecord>,
}

impl Snapshot {
    pub fn context(&self) -> Context<'_> {
        Context {
            customers: &self.customers,
            one_off_items: &self.one_off_items,
            status_records: &self.status_records,
        }
    }

    pub fn agenda(&self, query: &AgendaQuery) -> Vec<AgendaItem> {
        agenda(&self.context(), query)
    }

    pub fn find_customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn find_one_off(&self, id: &str) -> Option<&OneOffItem> {
        self.one_off_items.iter().find(|item| item.id == id)
    }

    pub fn find_status(&self, key: &EventKey) -> Option<&StatusRecord> {
        self.status_records
            .iter()
            .find(|record| EventKey::from(*record) == *key)
    }

    pub fn apply_status(&mut self, change: Change) {
        match change {
            Change::Unchanged => {}
            Change::Put(record) => {
                match self.status_records.iter_mut().find(|r| r.id == record.id) {
                    Some(existing) => *existing = record,
                    None => self.status_records.push(record),
                }
            }
            Change::Remove(record) => self.status_records.retain(|r| r.id != record.id),
        }
    }

    pub fn put_one_off(&mut self, item: OneOffItem) {
        match self.one_off_items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => *existing = item,
            None => self.one_off_items.push(item),
        }
    }

    pub fn put_customer(&mut self, customer: Customer) {
        match self.customers.iter_mut().find(|c| c.id == customer.id) {
            Some(existing) => *existing = customer,
            None => self.customers.push(customer),
        }
    }
}
