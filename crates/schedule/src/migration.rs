//! One-time rewrite of stored day indices from a Sunday = 0 convention to
//! Monday = 0. Irreversible, so it only runs with an explicit
//! [`Confirmation`].

use std::str::FromStr;

use crate::day::{RawDay, normalize_day_array, normalize_weekday_value};
use crate::schedule::ScheduleRecord;

const CONFIRMATION_TOKEN: &str = "MIGRATE";

/// Proof that the operator typed the confirmation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confirmation(());

impl Confirmation {
    pub fn parse(token: impl AsRef<str>) -> orchard_shared::Result<Self> {
        if token.as_ref() != CONFIRMATION_TOKEN {
            orchard_shared::bail!("type {CONFIRMATION_TOKEN} to confirm the day index migration");
        }

        Ok(Self(()))
    }
}

impl FromStr for Confirmation {
    type Err = orchard_shared::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

fn shift_number(value: f64) -> Option<RawDay> {
    if !value.is_finite() {
        return None;
    }

    let value = value.trunc() as i64;
    if !(0..=6).contains(&value) {
        return None;
    }

    Some(RawDay::Integer((value + 6) % 7))
}

/// Converts one legacy Sunday = 0 value. Numbers outside 0..=6 become unset.
/// Weekday names carry no numbering convention and are kept.
pub fn sun0_to_mon0(raw: &RawDay) -> Option<RawDay> {
    match raw {
        RawDay::Integer(value) => shift_number(*value as f64),
        RawDay::Float(value) => shift_number(*value),
        RawDay::Text(value) => match value.trim().parse::<f64>() {
            Ok(number) => shift_number(number),
            Err(_) if value.trim().is_empty() => None,
            Err(_) => Some(raw.clone()),
        },
        RawDay::Null | RawDay::Other(_) => None,
    }
}

fn migrate_day(raw: &Option<RawDay>) -> Option<RawDay> {
    raw.as_ref()
        .and_then(sun0_to_mon0)
        .as_ref()
        .and_then(normalize_weekday_value)
        .map(RawDay::from)
}

fn migrate_days(raw: &[RawDay]) -> Vec<RawDay> {
    let shifted = raw.iter().filter_map(sun0_to_mon0).collect::<Vec<_>>();

    normalize_day_array(&shifted)
        .into_iter()
        .map(RawDay::from)
        .collect()
}

/// Rewrites every day field of a schedule and re-normalizes the result to
/// Monday to Friday indices. Mode, frequency and anchor are untouched.
pub fn migrate_schedule(schedule: &ScheduleRecord) -> ScheduleRecord {
    ScheduleRecord {
        order_day1: migrate_day(&schedule.order_day1),
        pack_day1: migrate_day(&schedule.pack_day1),
        deliver_day1: migrate_day(&schedule.deliver_day1),
        order_day2: migrate_day(&schedule.order_day2),
        pack_day2: migrate_day(&schedule.pack_day2),
        deliver_day2: migrate_day(&schedule.deliver_day2),
        customer_order_days: migrate_days(&schedule.customer_order_days),
        pack_days: migrate_days(&schedule.pack_days),
        deliver_days: migrate_days(&schedule.deliver_days),
        ..schedule.clone()
    }
}
