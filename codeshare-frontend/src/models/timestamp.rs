//! Lenient timestamp parsing for dates produced by the file API.
//!
//! The server has been seen to send RFC 3339 strings, naive ISO strings
//! without an offset, plain dates and epoch milliseconds. Naive values are
//! taken as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientTimestamp {
    Millis(i64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

pub fn parse(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Millis(millis) => DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {}", millis))),
        RawTimestamp::Text(text) => parse(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp: {}", text))),
    }
}

/// Like [`deserialize`], but a null, malformed or out-of-range value becomes
/// `None` instead of failing the surrounding document.
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LenientTimestamp::deserialize(deserializer)? {
        LenientTimestamp::Millis(millis) => DateTime::from_timestamp_millis(millis),
        LenientTimestamp::Text(text) => parse(&text),
        LenientTimestamp::Other(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_rfc3339_with_offset() {
        let parsed = parse("2024-09-01T10:30:00.000+05:30").unwrap();
        assert_eq!(parsed.hour(), 5);
        assert_eq!(parsed.minute(), 0);
    }

    #[test]
    fn parses_naive_values_as_utc() {
        let parsed = parse("2024-09-01T10:30:00.123").unwrap();
        assert_eq!(parsed.hour(), 10);

        let parsed = parse("2024-09-01 10:30:00").unwrap();
        assert_eq!(parsed.minute(), 30);

        let parsed = parse("2024-09-01").unwrap();
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2024, 9, 1));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("yesterday").is_none());
        assert!(parse("").is_none());
    }
}
