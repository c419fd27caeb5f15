use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::Date;
use validator::{Validate, ValidationError};

use crate::day::{is_weekday_index, weekday_index};
use crate::occurrence::{Kind, Occurrence, Origin};
use crate::range::DateRange;
use crate::schedule::Customer;

const UNTITLED: &str = "One-off item";

/// Ad hoc item outside the recurrence rules. Deleting only sets `is_deleted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneOffItem {
    pub id: String,
    pub kind: Kind,
    #[serde(with = "orchard_shared::date_key")]
    pub date: Date,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub rep_id: Option<String>,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_delivery_customer"))]
pub struct CreateOneOffInput {
    pub kind: Kind,
    #[validate(custom(function = "validate_weekday"))]
    pub date: Date,
    pub customer_id: Option<String>,
    pub rep_id: Option<String>,
    #[validate(length(max = 120, message = "Note must be at most 120 characters"))]
    pub note: String,
}

fn validate_weekday(date: &Date) -> Result<(), ValidationError> {
    if is_weekday_index(weekday_index(*date)) {
        return Ok(());
    }

    Err(ValidationError::new("weekend").with_message("Weekend dates are not allowed".into()))
}

fn validate_delivery_customer(input: &CreateOneOffInput) -> Result<(), ValidationError> {
    if input.kind != Kind::Delivery || input.customer_id.is_some() {
        return Ok(());
    }

    Err(ValidationError::new("delivery_customer")
        .with_message("Delivery one-offs require a customer".into()))
}

impl CreateOneOffInput {
    /// Trims free text and drops blank ids before validation.
    pub fn normalized(self) -> Self {
        let blank_to_none = |value: Option<String>| {
            value
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        Self {
            customer_id: blank_to_none(self.customer_id),
            rep_id: blank_to_none(self.rep_id),
            note: self.note.trim().to_owned(),
            ..self
        }
    }
}

impl OneOffItem {
    pub fn shifted(&self, days: i64) -> Option<Self> {
        let date = self.date.checked_add(time::Duration::days(days))?;

        Some(Self {
            date,
            ..self.clone()
        })
    }

    fn to_occurrence(&self, customer: Option<&Customer>) -> Occurrence {
        let title = customer
            .map(|c| c.store_name.as_str())
            .filter(|name| !name.is_empty())
            .or_else(|| Some(self.note.as_str()).filter(|note| !note.is_empty()))
            .unwrap_or(UNTITLED)
            .to_owned();

        let rep_id = self
            .rep_id
            .as_deref()
            .filter(|rep| !rep.is_empty())
            .or_else(|| customer.map(|c| c.assigned_rep_id.as_str()))
            .unwrap_or_default()
            .to_owned();

        Occurrence {
            kind: self.kind,
            date: self.date,
            customer_id: self.customer_id.to_owned(),
            rep_id,
            origin: Origin::OneOff {
                source_id: self.id.to_owned(),
                note: self.note.to_owned(),
            },
            title,
            subtitle: customer.map(|c| c.contact_name.to_owned()).unwrap_or_default(),
            order_mode: customer.and_then(|c| c.schedule.mode),
        }
    }
}

/// Maps live one-off items dated inside `range` to occurrences. They keep
/// their own identity and never collapse into recurring occurrences.
pub fn overlay(items: &[OneOffItem], customers: &[Customer], range: DateRange) -> Vec<Occurrence> {
    let customers = customers
        .iter()
        .map(|c| (c.id.as_str(), c))
        .collect::<HashMap<_, _>>();

    items
        .iter()
        .filter(|item| !item.is_deleted && range.contains(item.date))
        .map(|item| {
            let customer = item
                .customer_id
                .as_deref()
                .and_then(|id| customers.get(id).copied());

            item.to_occurrence(customer)
        })
        .collect()
}
