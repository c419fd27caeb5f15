use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use time::Date;

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
pub enum Frequency {
    #[serde(rename = "WEEKLY")]
    #[strum(serialize = "WEEKLY")]
    Weekly,
    #[serde(rename = "FORTNIGHTLY")]
    #[strum(serialize = "FORTNIGHTLY")]
    Fortnightly,
    #[serde(rename = "EVERY_3_WEEKS")]
    #[strum(serialize = "EVERY_3_WEEKS")]
    EveryThreeWeeks,
}

/// How often a schedule repeats. Multi-week cycles always carry the anchor
/// date whose week starts the cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cadence {
    Weekly,
    Fortnightly { anchor: Date },
    EveryThreeWeeks { anchor: Date },
}

impl Cadence {
    /// Returns `None` for a multi-week frequency without an anchor date: such
    /// a schedule is inactive.
    pub fn new(frequency: Frequency, anchor: Option<Date>) -> Option<Self> {
        match (frequency, anchor) {
            (Frequency::Weekly, _) => Some(Self::Weekly),
            (Frequency::Fortnightly, Some(anchor)) => Some(Self::Fortnightly { anchor }),
            (Frequency::EveryThreeWeeks, Some(anchor)) => Some(Self::EveryThreeWeeks { anchor }),
            _ => None,
        }
    }

    pub fn frequency(&self) -> Frequency {
        match self {
            Self::Weekly => Frequency::Weekly,
            Self::Fortnightly { .. } => Frequency::Fortnightly,
            Self::EveryThreeWeeks { .. } => Frequency::EveryThreeWeeks,
        }
    }

    pub fn anchor(&self) -> Option<Date> {
        match self {
            Self::Weekly => None,
            Self::Fortnightly { anchor } | Self::EveryThreeWeeks { anchor } => Some(*anchor),
        }
    }

    pub fn applies_on(&self, date: Date) -> bool {
        match self {
            Self::Weekly => true,
            Self::Fortnightly { anchor } => is_week_aligned(date, *anchor, 2),
            Self::EveryThreeWeeks { anchor } => is_week_aligned(date, *anchor, 3),
        }
    }
}

/// True when `date` falls in a week that is a whole number of cycles away
/// from the week starting at `anchor`. Weeks are counted in 7-day blocks from
/// the anchor itself, not from the calendar Monday, and dates before the
/// anchor align the same way as dates after it.
pub fn is_week_aligned(date: Date, anchor: Date, cycle_weeks: i64) -> bool {
    if cycle_weeks <= 0 {
        return false;
    }

    let diff_days = (date - anchor).whole_days();
    let weeks = diff_days.div_euclid(7);

    weeks.rem_euclid(cycle_weeks) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Duration, macros::date};

    #[test]
    fn test_fortnight_alignment_around_anchor() {
        let anchor = date!(2025 - 01 - 06);

        for offset in 0..7 {
            let day = date!(2025 - 01 - 06) + Duration::days(offset);
            assert!(is_week_aligned(day, anchor, 2), "{day} should align");

            let day = date!(2025 - 01 - 13) + Duration::days(offset);
            assert!(!is_week_aligned(day, anchor, 2), "{day} should not align");

            let day = date!(2025 - 01 - 20) + Duration::days(offset);
            assert!(is_week_aligned(day, anchor, 2), "{day} should align");
        }
    }

    #[test]
    fn test_alignment_before_anchor() {
        let anchor = date!(2025 - 01 - 06);

        assert!(!is_week_aligned(date!(2025 - 01 - 05), anchor, 2));
        assert!(!is_week_aligned(date!(2024 - 12 - 30), anchor, 2));
        assert!(is_week_aligned(date!(2024 - 12 - 23), anchor, 2));
        assert!(is_week_aligned(date!(2024 - 12 - 16), anchor, 3));
        assert!(!is_week_aligned(date!(2024 - 12 - 23), anchor, 3));
    }

    #[test]
    fn test_alignment_counts_from_anchor_weekday() {
        // anchored on a Wednesday: the cycle week runs Wed..Tue
        let anchor = date!(2025 - 01 - 08);

        assert!(is_week_aligned(date!(2025 - 01 - 14), anchor, 2));
        assert!(!is_week_aligned(date!(2025 - 01 - 15), anchor, 2));
    }

    #[test]
    fn test_cadence_requires_anchor() {
        assert_eq!(Cadence::new(Frequency::Weekly, None), Some(Cadence::Weekly));
        assert_eq!(Cadence::new(Frequency::Fortnightly, None), None);
        assert_eq!(Cadence::new(Frequency::EveryThreeWeeks, None), None);

        let cadence = Cadence::new(Frequency::EveryThreeWeeks, Some(date!(2025 - 01 - 06)));
        assert_eq!(cadence.map(|c| c.frequency()), Some(Frequency::EveryThreeWeeks));
    }

    #[test]
    fn test_frequency_wire_names() {
        assert_eq!(Frequency::EveryThreeWeeks.to_string(), "EVERY_3_WEEKS");
        assert_eq!("FORTNIGHTLY".parse::<Frequency>().ok(), Some(Frequency::Fortnightly));
        assert!("MONTHLY".parse::<Frequency>().is_err());
    }
}
