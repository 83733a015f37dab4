//! Timestamp parsing shared by every store backend.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A row timestamp together with the text the store holds for it.
/// Serializes back to that text unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    at: DateTime<Utc>,
    text: String,
}

impl Timestamp {
    pub fn parse(raw: &str) -> Option<Self> {
        parse(raw).map(|at| Self {
            at,
            text: raw.to_string(),
        })
    }

    /// Current time at the microsecond precision the stores keep.
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    pub fn at(&self) -> DateTime<Utc> {
        self.at
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// Truncates to microseconds and renders fixed-width RFC 3339, so text
/// ordering matches time ordering.
impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        let at = at.trunc_subsecs(6);
        Self {
            at,
            text: at.to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}

/// Parses RFC 3339 timestamps, falling back to offset-less forms
/// (`timestamp without time zone` columns, SQLite `datetime('now')`), read as UTC.
pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ndt| ndt.and_utc())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_offset_and_naive_forms() {
        let expected = Utc.with_ymd_and_hms(2026, 10, 1, 8, 30, 0).unwrap();
        assert_eq!(parse("2026-10-01T08:30:00+00:00"), Some(expected));
        assert_eq!(parse("2026-10-01T10:30:00+02:00"), Some(expected));
        assert_eq!(parse("2026-10-01T08:30:00"), Some(expected));
        assert_eq!(parse("2026-10-01 08:30:00"), Some(expected));
        assert!(parse("2026-10-01T08:30:00.5").is_some());
        assert_eq!(parse("yesterday"), None);
    }

    #[test]
    fn fetched_text_is_echoed_unchanged() {
        let ts: Timestamp = serde_json::from_str(r#""2026-10-01T08:30:00.123456+00:00""#).unwrap();
        assert_eq!(ts.at(), Utc.with_ymd_and_hms(2026, 10, 1, 8, 30, 0).unwrap() + chrono::Duration::microseconds(123_456));
        assert_eq!(serde_json::to_string(&ts).unwrap(), r#""2026-10-01T08:30:00.123456+00:00""#);
    }

    #[test]
    fn generated_timestamps_keep_micros() {
        let at = Utc.with_ymd_and_hms(2026, 10, 1, 8, 30, 0).unwrap() + chrono::Duration::nanoseconds(405_231_768);
        let ts = Timestamp::from(at);
        assert_eq!(ts.as_str(), "2026-10-01T08:30:00.405231Z");
        assert_eq!(Timestamp::parse(ts.as_str()), Some(ts.clone()));
        assert_eq!(ts.at().timestamp_subsec_nanos(), 405_231_000);
    }
}
