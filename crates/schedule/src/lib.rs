//! Recurring order, pack and delivery scheduling.
//!
//! Customer schedules are expanded into dated occurrences on every query,
//! merged with ad hoc one-off items, joined with their persisted status and
//! then filtered and sorted into an agenda.

pub mod agenda;
pub mod cadence;
pub mod command;
pub mod day;
pub mod filter;
pub mod generator;
pub mod key;
pub mod migration;
pub mod occurrence;
pub mod one_off;
pub mod range;
pub mod schedule;
pub mod status;
pub mod store;

pub use agenda::{AgendaQuery, Context, Snapshot, Summary, agenda};
pub use cadence::{Cadence, Frequency, is_week_aligned};
pub use command::Command;
pub use day::RawDay;
pub use filter::{Filters, RepFilter, StatusFilter, Toggles};
pub use key::EventKey;
pub use migration::Confirmation;
pub use occurrence::{Kind, Occurrence, Origin};
pub use one_off::{CreateOneOffInput, OneOffItem};
pub use range::DateRange;
pub use schedule::{Customer, OrderMode, Schedule, ScheduleRecord, schedule_applies_on_date};
pub use status::{AgendaItem, Change, SkipDetails, SkipReason, Status, StatusRecord, TargetStatus};
pub use store::{Store, memory::MemoryStore};

cfg_if::cfg_if! {
    if #[cfg(feature = "full")] {
        mod repository;

        pub use repository::SqliteStore;
    }
}
