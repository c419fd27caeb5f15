//! Canonical weekday indices: Monday = 0 .. Sunday = 6.
//!
//! Stored schedules come from legacy records and spreadsheet imports, so day
//! values arrive as numbers, numeric strings or weekday names. Anything that
//! cannot be read as a day normalizes to `None` and is dropped by callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::Date;

const LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// A day value as found in stored data, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawDay {
    Integer(i64),
    Float(f64),
    Text(String),
    Null,
    /// Booleans, objects and arrays: kept as stored, never a day.
    Other(Value),
}

impl From<Value> for RawDay {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::String(text) => Self::Text(text),
            Value::Number(number) => match (number.as_i64(), number.as_f64()) {
                (Some(value), _) => Self::Integer(value),
                (None, Some(value)) => Self::Float(value),
                (None, None) => Self::Other(Value::Number(number)),
            },
            other => Self::Other(other),
        }
    }
}

impl From<u8> for RawDay {
    fn from(value: u8) -> Self {
        Self::Integer(value.into())
    }
}

impl From<&str> for RawDay {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Business weekdays are Monday to Friday.
pub fn is_weekday_index(index: u8) -> bool {
    index <= 4
}

pub fn weekday_index(date: Date) -> u8 {
    date.weekday().number_days_from_monday()
}

pub fn day_label(index: u8) -> Option<&'static str> {
    LABELS.get(usize::from(index)).copied()
}

fn normalize_day_number(value: i64) -> Option<u8> {
    match value {
        0..=6 => u8::try_from(value).ok(),
        // legacy 1-based (Monday = 1 .. Sunday = 7)
        7 => Some(6),
        _ => None,
    }
}

fn normalize_day_float(value: f64) -> Option<u8> {
    if !value.is_finite() {
        return None;
    }

    normalize_day_number(value.trunc() as i64)
}

fn label_to_index(label: &str) -> Option<u8> {
    let index = match label {
        "mon" | "monday" => 0,
        "tue" | "tues" | "tuesday" => 1,
        "wed" | "weds" | "wednesday" => 2,
        "thu" | "thur" | "thurs" | "thursday" => 3,
        "fri" | "friday" => 4,
        "sat" | "saturday" => 5,
        "sun" | "sunday" => 6,
        _ => return None,
    };

    Some(index)
}

pub fn normalize_day_value(raw: &RawDay) -> Option<u8> {
    match raw {
        RawDay::Integer(value) => normalize_day_number(*value),
        RawDay::Float(value) => normalize_day_float(*value),
        RawDay::Text(value) => {
            let value = value.trim().to_lowercase();
            if value.is_empty() {
                return None;
            }

            match value.parse::<f64>() {
                Ok(number) => normalize_day_float(number),
                Err(_) => label_to_index(&value),
            }
        }
        RawDay::Null | RawDay::Other(_) => None,
    }
}

/// Like [`normalize_day_value`] but only keeps Monday to Friday.
pub fn normalize_weekday_value(raw: &RawDay) -> Option<u8> {
    normalize_day_value(raw).filter(|index| is_weekday_index(*index))
}

/// Normalizes a list of days into a sorted, deduplicated set of weekdays.
pub fn normalize_day_array(raw: &[RawDay]) -> Vec<u8> {
    let mut days = raw
        .iter()
        .filter_map(normalize_weekday_value)
        .collect::<Vec<_>>();

    days.sort_unstable();
    days.dedup();
    days
}

/// Next business weekday strictly after `index`: Friday rolls over to Monday.
pub fn next_weekday_index(index: u8) -> u8 {
    let mut next = (index % 7 + 1) % 7;
    while !is_weekday_index(next) {
        next = (next + 1) % 7;
    }

    next
}
