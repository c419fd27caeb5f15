use time::{
    Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};
use time_tz::{ToTimezone, timezones};

const DATE_KEY: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parses a canonical `YYYY-MM-DD` date key.
pub fn parse_date_key(value: impl AsRef<str>) -> crate::Result<Date> {
    Ok(Date::parse(value.as_ref().trim(), DATE_KEY)?)
}

/// Formats a date as its canonical `YYYY-MM-DD` key. Keys sort
/// lexicographically in calendar order.
pub fn format_date_key(date: Date) -> String {
    date.format(DATE_KEY)
        .unwrap_or_else(|_| date.to_string())
}

pub fn is_known_timezone(tz: impl AsRef<str>) -> bool {
    timezones::get_by_name(tz.as_ref()).is_some()
}

/// Calendar date of "now" in the given IANA timezone, falling back to UTC
/// when the name is unknown.
pub fn today(tz: impl AsRef<str>) -> Date {
    let now = OffsetDateTime::now_utc();

    match timezones::get_by_name(tz.as_ref()) {
        Some(tz) => now.to_timezone(tz).date(),
        None => now.date(),
    }
}

/// Serde adapter storing a [`Date`] as a `YYYY-MM-DD` string.
pub mod date_key {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date_key(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let value = String::deserialize(deserializer)?;
        super::parse_date_key(&value).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::Date;

        pub fn serialize<S: Serializer>(
            date: &Option<Date>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => serializer.serialize_str(&crate::format_date_key(*date)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Date>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(value) if !value.trim().is_empty() => crate::parse_date_key(&value)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                _ => Ok(None),
            }
        }
    }
}
