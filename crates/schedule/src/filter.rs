use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::occurrence::Kind;
use crate::schedule::Customer;
use crate::status::{AgendaItem, Status};

/// Which kinds of work are shown. Everything is on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toggles {
    pub expected_orders: bool,
    pub packs: bool,
    pub deliveries: bool,
}

impl Default for Toggles {
    fn default() -> Self {
        Self {
            expected_orders: true,
            packs: true,
            deliveries: true,
        }
    }
}

impl Toggles {
    pub fn shows(&self, kind: Kind) -> bool {
        match kind {
            Kind::ExpectedOrder => self.expected_orders,
            Kind::Pack => self.packs,
            Kind::Delivery => self.deliveries,
        }
    }
}

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Done,
    Skipped,
}

impl StatusFilter {
    pub fn matches(&self, status: Status) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == Status::Pending,
            Self::Done => status == Status::Done,
            Self::Skipped => status == Status::Skipped,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RepFilter {
    #[default]
    All,
    Rep(String),
}

impl FromStr for RepFilter {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        Ok(Self::Rep(value.to_owned()))
    }
}

impl RepFilter {
    pub fn matches(&self, rep_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Rep(rep) => rep == rep_id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub toggles: Toggles,
    pub status: StatusFilter,
    pub rep: RepFilter,
    pub search: Option<String>,
}

fn normalize_search(value: &str) -> String {
    value.trim().to_lowercase()
}

fn search_text(item: &AgendaItem, customer: Option<&Customer>) -> String {
    let occurrence = &item.occurrence;
    let mut parts = vec![occurrence.title.as_str(), occurrence.subtitle.as_str()];
    if let Some(customer) = customer {
        parts.extend([
            customer.full_address.as_str(),
            customer.phone.as_str(),
            customer.email.as_str(),
        ]);
    }

    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Keeps the items passing, in order, the kind toggles, the status filter,
/// the rep filter and a case-insensitive substring search.
pub fn apply(items: Vec<AgendaItem>, filters: &Filters, customers: &[Customer]) -> Vec<AgendaItem> {
    let term = filters
        .search
        .as_deref()
        .map(normalize_search)
        .filter(|term| !term.is_empty());

    let customers = customers
        .iter()
        .map(|c| (c.id.as_str(), c))
        .collect::<HashMap<_, _>>();

    items
        .into_iter()
        .filter(|item| filters.toggles.shows(item.occurrence.kind))
        .filter(|item| filters.status.matches(item.status))
        .filter(|item| filters.rep.matches(&item.occurrence.rep_id))
        .filter(|item| {
            let Some(term) = &term else {
                return true;
            };

            let customer = item
                .occurrence
                .customer_id
                .as_deref()
                .and_then(|id| customers.get(id).copied());

            normalize_search(&search_text(item, customer)).contains(term.as_str())
        })
        .collect()
}

fn compare(a: &AgendaItem, b: &AgendaItem) -> Ordering {
    a.occurrence
        .date
        .cmp(&b.occurrence.date)
        .then_with(|| a.occurrence.kind.rank().cmp(&b.occurrence.kind.rank()))
        .then_with(|| a.occurrence.title.cmp(&b.occurrence.title))
        .then_with(|| a.selection_id.cmp(&b.selection_id))
}

/// Date, then kind rank (delivery, pack, expected order), then title. The
/// selection id breaks remaining ties so the order is total.
pub fn sort(items: &mut [AgendaItem]) {
    items.sort_by(compare);
}
