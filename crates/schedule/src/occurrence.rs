use serde::{Deserialize, Serialize, Serializer};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::Date;

use crate::schedule::OrderMode;

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
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    ExpectedOrder,
    Pack,
    Delivery,
}

impl Kind {
    /// Same-day display order: deliveries first, expected orders last.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Delivery => 1,
            Self::Pack => 2,
            Self::ExpectedOrder => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Recurring { run_index: Option<u8> },
    OneOff { source_id: String, note: String },
}

/// A dated unit of work. Occurrences are rebuilt on every query and never
/// stored. Serializes flat, with `runIndex` and `sourceId` next to the other
/// fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub kind: Kind,
    pub date: Date,
    pub customer_id: Option<String>,
    pub rep_id: String,
    pub origin: Origin,
    pub title: String,
    pub subtitle: String,
    pub order_mode: Option<OrderMode>,
}

impl Occurrence {
    pub fn run_index(&self) -> Option<u8> {
        match &self.origin {
            Origin::Recurring { run_index } => *run_index,
            Origin::OneOff { .. } => None,
        }
    }

    pub fn source_id(&self) -> Option<&str> {
        match &self.origin {
            Origin::Recurring { .. } => None,
            Origin::OneOff { source_id, .. } => Some(source_id),
        }
    }

    pub fn is_one_off(&self) -> bool {
        matches!(self.origin, Origin::OneOff { .. })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OccurrenceFields<'a> {
    kind: Kind,
    #[serde(serialize_with = "orchard_shared::date_key::serialize")]
    date: Date,
    customer_id: Option<&'a str>,
    rep_id: &'a str,
    run_index: Option<u8>,
    source_id: Option<&'a str>,
    note: Option<&'a str>,
    title: &'a str,
    subtitle: &'a str,
    order_mode: Option<OrderMode>,
}

impl Serialize for Occurrence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let note = match &self.origin {
            Origin::Recurring { .. } => None,
            Origin::OneOff { note, .. } => Some(note.as_str()),
        };

        OccurrenceFields {
            kind: self.kind,
            date: self.date,
            customer_id: self.customer_id.as_deref(),
            rep_id: &self.rep_id,
            run_index: self.run_index(),
            source_id: self.source_id(),
            note,
            title: &self.title,
            subtitle: &self.subtitle,
            order_mode: self.order_mode,
        }
        .serialize(serializer)
    }
}
