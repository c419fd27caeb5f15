use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::{Date, OffsetDateTime};
use validator::{Validate, ValidationError};

use crate::key::EventKey;
use crate::occurrence::{Kind, Occurrence};

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
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Never persisted: the absence of a record is the pending state.
    #[default]
    Pending,
    Done,
    Skipped,
}

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
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    EnoughStock,
    NoAnswer,
    Unspecified,
    Custom,
}

/// Persisted outcome of an occurrence. Only `DONE` and `SKIPPED` are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRecord {
    pub id: String,
    pub customer_id: Option<String>,
    pub kind: Kind,
    #[serde(with = "orchard_shared::date_key")]
    pub date: Date,
    pub run_index: Option<u8>,
    pub source_id: Option<String>,
    pub status: Status,
    pub skipped_reason: Option<SkipReason>,
    pub skipped_reason_text: Option<String>,
    #[serde(with = "time::serde::timestamp::option", default)]
    pub completed_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
#[validate(schema(function = "validate_custom_text"))]
pub struct SkipDetails {
    pub reason: SkipReason,
    pub text: Option<String>,
}

fn validate_custom_text(details: &SkipDetails) -> Result<(), ValidationError> {
    if details.reason != SkipReason::Custom
        || details.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    {
        return Ok(());
    }

    Err(ValidationError::new("custom_reason")
        .with_message("Please enter a custom reason".into()))
}

impl SkipDetails {
    pub fn new(reason: SkipReason, text: Option<String>) -> Self {
        Self { reason, text }
    }

    /// Free text only survives for a custom reason.
    fn stored_text(&self) -> Option<String> {
        if self.reason != SkipReason::Custom {
            return None;
        }

        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetStatus {
    Pending,
    Done,
    Skipped(SkipDetails),
}

/// Store mutation needed to move an occurrence to a target status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Undo of an item that was never acted on.
    Unchanged,
    Put(StatusRecord),
    Remove(StatusRecord),
}

/// Works out the record write for a status transition. Moving to pending
/// removes the existing record, any other target upserts one keyed by the
/// existing record id when there is one. Skip details are validated first.
pub fn plan_transition(
    existing: Option<&StatusRecord>,
    occurrence: &Occurrence,
    target: TargetStatus,
    now: OffsetDateTime,
) -> orchard_shared::Result<Change> {
    let (status, skipped_reason, skipped_reason_text, completed_at) = match target {
        TargetStatus::Pending => {
            return Ok(existing.map_or(Change::Unchanged, |record| Change::Remove(record.clone())));
        }
        TargetStatus::Done => (Status::Done, None, None, Some(now)),
        TargetStatus::Skipped(details) => {
            details.validate()?;
            (
                Status::Skipped,
                Some(details.reason),
                details.stored_text(),
                None,
            )
        }
    };

    let id = existing
        .map(|record| record.id.to_owned())
        .unwrap_or_else(|| ulid::Ulid::new().to_string());

    Ok(Change::Put(StatusRecord {
        id,
        customer_id: occurrence.customer_id.to_owned(),
        kind: occurrence.kind,
        date: occurrence.date,
        run_index: occurrence.run_index(),
        source_id: occurrence.source_id().map(str::to_owned),
        status,
        skipped_reason,
        skipped_reason_text,
        completed_at,
    }))
}

/// An occurrence joined with its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    #[serde(flatten)]
    pub occurrence: Occurrence,
    pub selection_id: EventKey,
    pub status: Status,
    pub skipped_reason: Option<SkipReason>,
    pub skipped_reason_text: Option<String>,
    #[serde(with = "time::serde::timestamp::option")]
    pub completed_at: Option<OffsetDateTime>,
}

impl AgendaItem {
    fn pending(occurrence: Occurrence) -> Self {
        Self {
            selection_id: EventKey::from(&occurrence),
            occurrence,
            status: Status::Pending,
            skipped_reason: None,
            skipped_reason_text: None,
            completed_at: None,
        }
    }
}

/// Attaches persisted status to each occurrence by event key. Occurrences
/// without a record stay pending.
pub fn merge(occurrences: Vec<Occurrence>, records: &[StatusRecord]) -> Vec<AgendaItem> {
    let records = records
        .iter()
        .map(|record| (EventKey::from(record), record))
        .collect::<HashMap<_, _>>();

    occurrences
        .into_iter()
        .map(|occurrence| {
            let mut item = AgendaItem::pending(occurrence);
            if let Some(record) = records.get(&item.selection_id) {
                item.status = record.status;
                item.skipped_reason = record.skipped_reason;
                item.skipped_reason_text = record.skipped_reason_text.to_owned();
                item.completed_at = record.completed_at;
            }

            item
        })
        .collect()
}
