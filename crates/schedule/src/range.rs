use time::{Date, Duration, Month};

use crate::day::weekday_index;

/// Inclusive calendar date window. Generation cost grows with customers times
/// days in the window, so callers keep windows to a day, a week or a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> orchard_shared::Result<Self> {
        if end < start {
            orchard_shared::bail!("date range ends on {end} before it starts on {start}");
        }

        Ok(Self { start, end })
    }

    pub fn day(date: Date) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// The Monday to Sunday week containing `date`.
    pub fn week(date: Date) -> Self {
        let start = date - Duration::days(weekday_index(date).into());

        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// Whole weeks covering the month of `date`, from the Monday on or before
    /// the 1st to the Sunday on or after the last day.
    pub fn month_grid(date: Date) -> orchard_shared::Result<Self> {
        let first = date.replace_day(1)?;
        let next_first = match first.month() {
            Month::December => Date::from_calendar_date(first.year() + 1, Month::January, 1)?,
            month => Date::from_calendar_date(first.year(), month.next(), 1)?,
        };
        let last = next_first - Duration::days(1);

        Ok(Self {
            start: Self::week(first).start,
            end: Self::week(last).end,
        })
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> impl Iterator<Item = Date> + use<> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |date| {
            date.next_day().filter(|next| *next <= end)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_week_from_wednesday() {
        let week = DateRange::week(date!(2025 - 01 - 22));
        assert_eq!(week.start(), date!(2025 - 01 - 20));
        assert_eq!(week.end(), date!(2025 - 01 - 26));
    }

    #[test]
    fn test_week_from_sunday() {
        let week = DateRange::week(date!(2025 - 01 - 26));
        assert_eq!(week.start(), date!(2025 - 01 - 20));
        assert_eq!(week.end(), date!(2025 - 01 - 26));
    }

    #[test]
    fn test_month_grid() {
        // February 2025 starts on a Saturday and ends on a Friday
        let grid = DateRange::month_grid(date!(2025 - 02 - 14)).unwrap();
        assert_eq!(grid.start(), date!(2025 - 01 - 27));
        assert_eq!(grid.end(), date!(2025 - 03 - 02));

        let grid = DateRange::month_grid(date!(2025 - 12 - 01)).unwrap();
        assert_eq!(grid.start(), date!(2025 - 12 - 01));
        assert_eq!(grid.end(), date!(2026 - 01 - 04));
    }

    #[test]
    fn test_days_are_inclusive() {
        let range = DateRange::new(date!(2025 - 01 - 30), date!(2025 - 02 - 02)).unwrap();
        let days = range.days().collect::<Vec<_>>();

        assert_eq!(
            days,
            vec![
                date!(2025 - 01 - 30),
                date!(2025 - 01 - 31),
                date!(2025 - 02 - 01),
                date!(2025 - 02 - 02),
            ]
        );
        assert_eq!(DateRange::day(date!(2025 - 01 - 30)).days().count(), 1);
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        assert!(DateRange::new(date!(2025 - 02 - 02), date!(2025 - 02 - 01)).is_err());
    }
}
