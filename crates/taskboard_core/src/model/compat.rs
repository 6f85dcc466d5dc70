//! Lenient readers for date and time fields in stored snapshots.
//!
//! Snapshots written by earlier board versions mix plain `YYYY-MM-DD` dates,
//! RFC 3339 timestamps (serialized `Date` objects) and epoch milliseconds.
//! Writers always emit the canonical form chosen by chrono's serde support.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInstant {
    Millis(i64),
    Text(String),
}

pub(crate) fn parse_date_text(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}

fn parse_timestamp_text(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|| {
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

fn instant_to_date(raw: RawInstant) -> Option<NaiveDate> {
    match raw {
        RawInstant::Text(text) => parse_date_text(&text),
        RawInstant::Millis(ms) => Utc.timestamp_millis_opt(ms).single().map(|dt| dt.date_naive()),
    }
}

/// Reads a required calendar date.
pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = RawInstant::deserialize(deserializer)?;
    instant_to_date(raw).ok_or_else(|| D::Error::custom("unrecognized date value"))
}

/// Reads an optional calendar date; `null` and blank strings are `None`.
pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawInstant>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawInstant::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(raw) => instant_to_date(raw)
            .map(Some)
            .ok_or_else(|| D::Error::custom("unrecognized date value")),
    }
}

/// Reads a point in time from RFC 3339 text or epoch milliseconds.
pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match RawInstant::deserialize(deserializer)? {
        RawInstant::Millis(ms) => Utc.timestamp_millis_opt(ms).single(),
        RawInstant::Text(text) => parse_timestamp_text(&text),
    };
    parsed.ok_or_else(|| D::Error::custom("unrecognized timestamp value"))
}

#[cfg(test)]
mod tests {
    use super::parse_date_text;
    use chrono::NaiveDate;

    #[test]
    fn date_text_accepts_plain_and_rfc3339() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_date_text("2024-03-09"), Some(expected));
        assert_eq!(parse_date_text("2024-03-09T15:04:05.000Z"), Some(expected));
        assert_eq!(parse_date_text("09/03/2024"), None);
    }
}
