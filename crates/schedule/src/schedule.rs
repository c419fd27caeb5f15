use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::Date;
use validator::Validate;

use crate::cadence::{Cadence, Frequency};
use crate::day::{RawDay, next_weekday_index, normalize_day_array, normalize_weekday_value};
use crate::key::validate_customer_segment;

#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
pub enum OrderMode {
    /// The rep calls the customer to take the order.
    #[serde(rename = "WE_GET_ORDER")]
    #[strum(serialize = "WE_GET_ORDER")]
    WeGetOrder,
    /// The customer places the order themselves.
    #[serde(rename = "THEY_PUT_ORDER")]
    #[strum(serialize = "THEY_PUT_ORDER")]
    TheyPutOrder,
}

/// Schedule as persisted on the customer record. Day fields hold whatever the
/// source data contained; [`ScheduleRecord::resolve`] turns it into a
/// [`Schedule`]. Reading never fails on a badly typed field: it falls back to
/// the field's default so the rest of the schedule stays usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleRecord {
    #[serde(deserialize_with = "lenient")]
    pub mode: Option<OrderMode>,
    #[serde(deserialize_with = "lenient")]
    pub frequency: Option<Frequency>,
    pub order_day1: Option<RawDay>,
    pub pack_day1: Option<RawDay>,
    pub deliver_day1: Option<RawDay>,
    #[serde(deserialize_with = "lenient_flag")]
    pub is_bi_weekly_second_run: bool,
    pub order_day2: Option<RawDay>,
    pub pack_day2: Option<RawDay>,
    pub deliver_day2: Option<RawDay>,
    #[serde(deserialize_with = "lenient_days")]
    pub customer_order_days: Vec<RawDay>,
    #[serde(deserialize_with = "lenient_days")]
    pub pack_days: Vec<RawDay>,
    #[serde(deserialize_with = "lenient_days")]
    pub deliver_days: Vec<RawDay>,
    #[serde(
        serialize_with = "orchard_shared::date_key::option::serialize",
        deserialize_with = "lenient_date"
    )]
    pub anchor_date: Option<Date>,
}

/// Unknown enum spellings in stored data read as unset.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let Value::String(value) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    Ok(value.trim().parse().ok())
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::String(value) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    Ok(orchard_shared::parse_date_key(value.trim()).ok())
}

/// Anything but a JSON array reads as no days.
fn lenient_days<'de, D>(deserializer: D) -> Result<Vec<RawDay>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items.into_iter().map(RawDay::from).collect())
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

/// One weekly order/pack/deliver cycle of a `WE_GET_ORDER` schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub index: u8,
    pub order_day: Option<u8>,
    pub pack_day: Option<u8>,
    pub deliver_day: Option<u8>,
}

impl Run {
    /// Pack defaults to the order day.
    pub fn resolved_pack_day(&self) -> Option<u8> {
        self.pack_day.or(self.order_day)
    }

    /// Delivery defaults to the business day after the order day.
    pub fn resolved_deliver_day(&self) -> Option<u8> {
        self.deliver_day.or(self.order_day.map(next_weekday_index))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    WeGetOrder {
        first: Run,
        second: Option<Run>,
    },
    TheyPutOrder {
        order_days: Vec<u8>,
        pack_days: Vec<u8>,
        deliver_days: Vec<u8>,
    },
}

impl Plan {
    pub fn mode(&self) -> OrderMode {
        match self {
            Self::WeGetOrder { .. } => OrderMode::WeGetOrder,
            Self::TheyPutOrder { .. } => OrderMode::TheyPutOrder,
        }
    }
}

/// An active schedule: a cadence that says which weeks apply and a plan that
/// says which weekdays produce work in those weeks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub cadence: Cadence,
    pub plan: Plan,
}

impl Schedule {
    pub fn applies_on(&self, date: Date) -> bool {
        self.cadence.applies_on(date)
    }
}

fn weekday(raw: &Option<RawDay>) -> Option<u8> {
    raw.as_ref().and_then(normalize_weekday_value)
}

impl ScheduleRecord {
    /// Resolves the stored schedule. Unset mode or frequency, or a multi-week
    /// frequency without anchor, yields `None`: the schedule is inactive.
    pub fn resolve(&self) -> Option<Schedule> {
        let mode = self.mode?;
        let cadence = Cadence::new(self.frequency?, self.anchor_date)?;

        let plan = match mode {
            OrderMode::WeGetOrder => Plan::WeGetOrder {
                first: Run {
                    index: 1,
                    order_day: weekday(&self.order_day1),
                    pack_day: weekday(&self.pack_day1),
                    deliver_day: weekday(&self.deliver_day1),
                },
                second: self.is_bi_weekly_second_run.then(|| Run {
                    index: 2,
                    order_day: weekday(&self.order_day2),
                    pack_day: weekday(&self.pack_day2),
                    deliver_day: weekday(&self.deliver_day2),
                }),
            },
            OrderMode::TheyPutOrder => Plan::TheyPutOrder {
                order_days: normalize_day_array(&self.customer_order_days),
                pack_days: normalize_day_array(&self.pack_days),
                deliver_days: normalize_day_array(&self.deliver_days),
            },
        };

        Some(Schedule { cadence, plan })
    }

    pub fn applies_on(&self, date: Date) -> bool {
        schedule_applies_on_date(self, date)
    }
}

/// Whether a stored schedule produces work in the week containing `date`.
pub fn schedule_applies_on_date(schedule: &ScheduleRecord, date: Date) -> bool {
    schedule.resolve().is_some_and(|s| s.applies_on(date))
}

/// Customer as read from the customer store. The engine never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    #[validate(custom(function = "validate_customer_segment"))]
    pub id: String,
    pub assigned_rep_id: String,
    pub store_name: String,
    pub contact_name: String,
    pub full_address: String,
    pub phone: String,
    pub email: String,
    pub schedule: ScheduleRecord,
}
