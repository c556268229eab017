//! Date parsing for string → date coercion

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Supported date string formats.
///
/// `Custom` takes a `strftime`-style pattern as understood by
/// [`chrono::format::strftime`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `2024-01-15T00:00:00Z`, `2024-01-15T00:00:00`, `2024-01-15`
    #[default]
    Iso8601,
    /// RFC 2822, e.g. `Mon, 15 Jan 2024 00:00:00 +0000`
    Rss,
    /// `15 Jan 2024 00:00:00 +0000`
    AltRss,
    /// `/Date(1705276800000)/`, optionally with a `±hhmm` suffix
    DotNet,
    Custom(String),
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFormat::Iso8601 => write!(f, "ISO-8601"),
            DateFormat::Rss => write!(f, "RSS"),
            DateFormat::AltRss => write!(f, "alt-RSS"),
            DateFormat::DotNet => write!(f, ".NET"),
            DateFormat::Custom(pattern) => write!(f, "custom `{}`", pattern),
        }
    }
}

/// Date parsing failure. Always recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("empty date string")]
    Empty,

    #[error("`{input}` is not a valid {format} date")]
    Mismatch { input: String, format: String },
}

/// Parses date strings in one of the enumerated formats
pub trait DateParser: Send + Sync {
    fn parse(&self, input: &str, format: &DateFormat) -> Result<DateTime<Utc>, DateParseError>;
}

/// Default parser backed by `chrono`
#[derive(Debug, Clone, Copy, Default)]
pub struct ChronoDateParser;

impl DateParser for ChronoDateParser {
    fn parse(&self, input: &str, format: &DateFormat) -> Result<DateTime<Utc>, DateParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DateParseError::Empty);
        }

        let parsed = match format {
            DateFormat::Iso8601 => parse_iso8601(trimmed),
            DateFormat::Rss => DateTime::parse_from_rfc2822(trimmed)
                .ok()
                .map(|d| d.with_timezone(&Utc)),
            DateFormat::AltRss => parse_alt_rss(trimmed),
            DateFormat::DotNet => parse_dot_net(trimmed),
            DateFormat::Custom(pattern) => parse_custom(trimmed, pattern),
        };

        parsed.ok_or_else(|| DateParseError::Mismatch {
            input: input.to_string(),
            format: format.to_string(),
        })
    }
}

fn naive_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&naive)
}

fn midnight_utc(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(naive_utc)
}

fn parse_iso8601(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(d) = DateTime::parse_from_rfc3339(input) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(d) = DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(d.with_timezone(&Utc));
    }
    // No offset: read as UTC
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive_utc(naive));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(midnight_utc)
}

fn parse_alt_rss(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(d) = DateTime::parse_from_str(input, "%d %b %Y %H:%M:%S %z") {
        return Some(d.with_timezone(&Utc));
    }
    let bare = input
        .strip_suffix(" GMT")
        .or_else(|| input.strip_suffix(" UTC"))?;
    NaiveDateTime::parse_from_str(bare, "%d %b %Y %H:%M:%S")
        .ok()
        .map(naive_utc)
}

fn parse_dot_net(input: &str) -> Option<DateTime<Utc>> {
    let body = input.strip_prefix("/Date(")?.strip_suffix(")/")?;

    // Millisecond digits, then an optional ±hhmm that does not move the instant
    let sign_len = usize::from(body.starts_with('-'));
    let digits_end = body[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map(|i| i + sign_len)
        .unwrap_or(body.len());
    let (millis, offset) = body.split_at(digits_end);
    if !offset.is_empty() && !is_hhmm_offset(offset) {
        return None;
    }

    let millis: i64 = millis.parse().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

fn is_hhmm_offset(offset: &str) -> bool {
    let bytes = offset.as_bytes();
    bytes.len() == 5
        && (bytes[0] == b'+' || bytes[0] == b'-')
        && bytes[1..].iter().all(u8::is_ascii_digit)
}

fn parse_custom(input: &str, pattern: &str) -> Option<DateTime<Utc>> {
    if let Ok(d) = DateTime::parse_from_str(input, pattern) {
        return Some(d.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, pattern) {
        return Some(naive_utc(naive));
    }
    NaiveDate::parse_from_str(input, pattern)
        .ok()
        .and_then(midnight_utc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    fn parse(input: &str, format: DateFormat) -> Result<DateTime<Utc>, DateParseError> {
        ChronoDateParser.parse(input, &format)
    }

    #[test]
    fn iso8601_variants() {
        let expected = utc(2024, 1, 15, 0, 0, 0);
        assert_eq!(parse("2024-01-15T00:00:00Z", DateFormat::Iso8601), Ok(expected));
        assert_eq!(parse("2024-01-15T00:00:00", DateFormat::Iso8601), Ok(expected));
        assert_eq!(parse("2024-01-15", DateFormat::Iso8601), Ok(expected));
        assert_eq!(
            parse("2024-01-15T02:00:00+02:00", DateFormat::Iso8601),
            Ok(expected)
        );
        assert_eq!(
            parse("2024-01-15T02:00:00+0200", DateFormat::Iso8601),
            Ok(expected)
        );
    }

    #[test]
    fn iso8601_rejects_garbage() {
        let err = parse("yesterday", DateFormat::Iso8601).unwrap_err();
        assert_eq!(
            err.to_string(),
            "`yesterday` is not a valid ISO-8601 date"
        );
        assert_eq!(parse("   ", DateFormat::Iso8601), Err(DateParseError::Empty));
        assert!(parse("2024-13-40", DateFormat::Iso8601).is_err());
    }

    #[test]
    fn rss_formats() {
        let expected = utc(2024, 1, 15, 10, 30, 0);
        assert_eq!(
            parse("Mon, 15 Jan 2024 10:30:00 +0000", DateFormat::Rss),
            Ok(expected)
        );
        assert_eq!(
            parse("15 Jan 2024 10:30:00 +0000", DateFormat::AltRss),
            Ok(expected)
        );
        assert_eq!(
            parse("15 Jan 2024 10:30:00 GMT", DateFormat::AltRss),
            Ok(expected)
        );
        assert!(parse("2024-01-15", DateFormat::Rss).is_err());
    }

    #[test]
    fn dot_net_format() {
        let expected = utc(2024, 1, 15, 0, 0, 0);
        assert_eq!(parse("/Date(1705276800000)/", DateFormat::DotNet), Ok(expected));
        assert_eq!(
            parse("/Date(1705276800000+0100)/", DateFormat::DotNet),
            Ok(expected)
        );
        assert_eq!(
            parse("/Date(-1000)/", DateFormat::DotNet),
            Ok(utc(1969, 12, 31, 23, 59, 59))
        );
        assert!(parse("/Date(abc)/", DateFormat::DotNet).is_err());
        assert!(parse("/Date(1705276800000+01)/", DateFormat::DotNet).is_err());
        assert!(parse("1705276800000", DateFormat::DotNet).is_err());
    }

    #[test]
    fn custom_patterns() {
        assert_eq!(
            parse("15/01/2024", DateFormat::Custom("%d/%m/%Y".into())),
            Ok(utc(2024, 1, 15, 0, 0, 0))
        );
        assert_eq!(
            parse("15/01/2024 08:05", DateFormat::Custom("%d/%m/%Y %H:%M".into())),
            Ok(utc(2024, 1, 15, 8, 5, 0))
        );
        assert!(parse("2024-01-15", DateFormat::Custom("%d/%m/%Y".into())).is_err());
    }

    #[test]
    fn format_serde_names() {
        assert_eq!(
            serde_json::to_string(&DateFormat::AltRss).unwrap(),
            r#""alt_rss""#
        );
        let custom: DateFormat = serde_json::from_str(r#"{"custom":"%Y"}"#).unwrap();
        assert_eq!(custom, DateFormat::Custom("%Y".into()));
        let iso: DateFormat = serde_json::from_str(r#""iso8601""#).unwrap();
        assert_eq!(iso, DateFormat::Iso8601);
    }
}
