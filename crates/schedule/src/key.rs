//! Identity linking a generated occurrence to its persisted status record.
//!
//! Occurrences are recomputed on every query, so the key is derived from
//! business fields only. Its text form is produced by [`EventKey`]'s
//! `Display` and read back by its `FromStr`, nowhere else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::Date;
use validator::ValidationError;

use crate::occurrence::{Kind, Occurrence, Origin};
use crate::status::StatusRecord;

const ONE_OFF_TAG: &str = "oneoff";
const SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKey {
    /// `{customer}|{kind}|{date}|{run}` where a missing run index reads as 0.
    Recurring {
        customer_id: String,
        kind: Kind,
        date: Date,
        run_index: u8,
    },
    /// `oneoff|{source}|{date}|{kind}`
    OneOff {
        source_id: String,
        date: Date,
        kind: Kind,
    },
}

/// A customer id must survive the round trip through a recurring key's text
/// form: no separator, not the one-off tag, no surrounding whitespace.
pub fn validate_customer_segment(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() || id.trim() != id {
        return Err(ValidationError::new("blank_or_padded")
            .with_message("Customer id must be non-empty without surrounding spaces".into()));
    }

    if id.contains(SEPARATOR) {
        return Err(ValidationError::new("separator")
            .with_message(format!("Customer id must not contain '{SEPARATOR}'").into()));
    }

    if id == ONE_OFF_TAG {
        return Err(ValidationError::new("reserved")
            .with_message(format!("Customer id '{ONE_OFF_TAG}' is reserved").into()));
    }

    Ok(())
}

impl EventKey {
    pub fn date(&self) -> Date {
        match self {
            Self::Recurring { date, .. } | Self::OneOff { date, .. } => *date,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Self::Recurring { kind, .. } | Self::OneOff { kind, .. } => *kind,
        }
    }
}

impl From<&Occurrence> for EventKey {
    fn from(occurrence: &Occurrence) -> Self {
        match &occurrence.origin {
            Origin::OneOff { source_id, .. } => Self::OneOff {
                source_id: source_id.to_owned(),
                date: occurrence.date,
                kind: occurrence.kind,
            },
            Origin::Recurring { run_index } => Self::Recurring {
                customer_id: occurrence.customer_id.to_owned().unwrap_or_default(),
                kind: occurrence.kind,
                date: occurrence.date,
                run_index: run_index.unwrap_or(0),
            },
        }
    }
}

impl From<&StatusRecord> for EventKey {
    fn from(record: &StatusRecord) -> Self {
        match &record.source_id {
            Some(source_id) => Self::OneOff {
                source_id: source_id.to_owned(),
                date: record.date,
                kind: record.kind,
            },
            None => Self::Recurring {
                customer_id: record.customer_id.to_owned().unwrap_or_default(),
                kind: record.kind,
                date: record.date,
                run_index: record.run_index.unwrap_or(0),
            },
        }
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = SEPARATOR;
        match self {
            Self::Recurring {
                customer_id,
                kind,
                date,
                run_index,
            } => write!(
                f,
                "{customer_id}{s}{kind}{s}{}{s}{run_index}",
                orchard_shared::format_date_key(*date)
            ),
            Self::OneOff {
                source_id,
                date,
                kind,
            } => write!(
                f,
                "{ONE_OFF_TAG}{s}{source_id}{s}{}{s}{kind}",
                orchard_shared::format_date_key(*date)
            ),
        }
    }
}

impl FromStr for EventKey {
    type Err = orchard_shared::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts = value.trim().split(SEPARATOR).collect::<Vec<_>>();
        let [first, second, third, fourth] = parts.as_slice() else {
            orchard_shared::bail!("invalid event key '{value}'");
        };

        let kind_of = |raw: &str| {
            Kind::from_str(raw).map_err(|_| {
                orchard_shared::Error::Server(format!("invalid kind '{raw}' in event key"))
            })
        };

        if *first == ONE_OFF_TAG {
            return Ok(Self::OneOff {
                source_id: (*second).to_owned(),
                date: orchard_shared::parse_date_key(third)?,
                kind: kind_of(fourth)?,
            });
        }

        let Ok(run_index) = fourth.parse::<u8>() else {
            orchard_shared::bail!("invalid run index '{fourth}' in event key");
        };

        Ok(Self::Recurring {
            customer_id: (*first).to_owned(),
            kind: kind_of(second)?,
            date: orchard_shared::parse_date_key(third)?,
            run_index,
        })
    }
}

impl Serialize for EventKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EventKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
