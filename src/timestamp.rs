//! Timestamp normalization for device payloads
//!
//! Wearable exports mix several timestamp shapes, sometimes within one batch:
//! `2024-03-01T10:00:00+01:00`, `2024-03-01 10:00:00 +0100`,
//! `2024-03-01 10:00:00` and plain `2024-03-01`. Everything here resolves
//! those into timezone-aware instants.

use chrono::{
    DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Timelike,
    Utc,
};

use crate::error::{IngestError, Result};

/// Hour reported by [`local_date_and_hour`] when nothing could be parsed
pub const DEFAULT_HOUR: u32 = 12;

/// Shapes that carry their own UTC offset
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%d %H:%M%z",
    "%Y-%m-%d %H:%M %z",
];

/// Shapes without an offset, read as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse any accepted timestamp shape into a timezone-aware instant.
///
/// Strings without an offset are taken as UTC, a bare date as UTC midnight.
pub fn parse_any_datetime(value: &str) -> Result<DateTime<FixedOffset>> {
    let s = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&naive).into());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::default())).into());
    }

    Err(IngestError::format(s))
}

/// Convert any accepted timestamp to the canonical UTC form used for storage,
/// e.g. `2024-03-01T09:00:00+00:00`.
pub fn normalize_to_utc_iso(value: &str) -> Result<String> {
    let dt = parse_any_datetime(value)?;
    Ok(to_utc_iso(&dt.with_timezone(&Utc)))
}

/// Render a UTC instant in the canonical storage form
pub fn to_utc_iso(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

/// Local calendar date and hour of day as written in the string.
///
/// The two common shapes (`YYYY-MM-DD HH:..` and `YYYY-MM-DDTHH:..`) are read
/// directly without interpreting the offset. Other shapes go through a full
/// parse. When nothing works the date is `None` and the hour is
/// [`DEFAULT_HOUR`], so sleep dating degrades instead of failing.
pub fn local_date_and_hour(value: &str) -> (Option<NaiveDate>, u32) {
    let s = value.trim();

    if let Some((date, hour)) = match_date_and_hour(s) {
        return (Some(date), hour);
    }

    match parse_any_datetime(s) {
        Ok(dt) => (Some(dt.date_naive()), dt.hour()),
        Err(_) => (None, DEFAULT_HOUR),
    }
}

fn match_date_and_hour(s: &str) -> Option<(NaiveDate, u32)> {
    let date = NaiveDate::parse_from_str(s.get(..10)?, DATE_FORMAT).ok()?;
    let rest = s.get(10..)?;

    let time = match rest.strip_prefix('T') {
        Some(time) => time,
        None => {
            let time = rest.trim_start();
            if time.len() == rest.len() {
                return None;
            }
            time
        }
    };

    let hour = time.get(..2)?;
    if !hour.bytes().all(|b| b.is_ascii_digit()) || time.as_bytes().get(2) != Some(&b':') {
        return None;
    }

    Some((date, hour.parse().ok()?))
}

/// The calendar day before `date`
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.pred_opt().unwrap_or(date)
}

/// Date portion of a timestamp string (everything before the first space or `T`)
pub fn plain_date_part(value: &str) -> &str {
    let s = value.trim();
    s.split([' ', 'T']).next().unwrap_or(s)
}

/// Parse the date portion of a timestamp string
pub fn parse_plain_date(value: &str) -> Result<NaiveDate> {
    let part = plain_date_part(value);
    NaiveDate::parse_from_str(part, DATE_FORMAT).map_err(|_| IngestError::format(value.trim()))
}

/// Milliseconds since the Unix epoch
pub fn epoch_millis<Tz: TimeZone>(dt: &DateTime<Tz>) -> i64 {
    dt.timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(value: &str) -> DateTime<Utc> {
        parse_any_datetime(value).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_same_instant_across_shapes() {
        let expected = utc("2024-03-01T09:00:00+00:00");
        assert_eq!(utc("2024-03-01 10:00:00 +0100"), expected);
        assert_eq!(utc("2024-03-01 10:00:00+01:00"), expected);
        assert_eq!(utc("2024-03-01T10:00:00+01:00"), expected);
        assert_eq!(utc("2024-03-01T09:00:00Z"), expected);
        assert_eq!(utc("2024-03-01 09:00:00"), expected);
        assert_eq!(utc("  2024-03-01T09:00:00  "), expected);
    }

    #[test]
    fn test_minute_precision_with_either_separator() {
        let expected = utc("2024-03-01T09:00:00+00:00");
        assert_eq!(utc("2024-03-01T09:00"), expected);
        assert_eq!(utc("2024-03-01 09:00"), expected);
        assert_eq!(utc("2024-03-01T10:00+01:00"), expected);
        assert_eq!(utc("2024-03-01 10:00+01:00"), expected);
        assert_eq!(utc("2024-03-01 10:00+0100"), expected);
        assert_eq!(utc("2024-03-01 10:00 +0100"), expected);

        let may_10 = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert_eq!(local_date_and_hour("2024-05-10 10:00"), (Some(may_10), 10));
        assert!(parse_any_datetime("2024-05-10 10:00").is_ok());
    }

    #[test]
    fn test_naive_iso_is_utc() {
        assert_eq!(utc("2024-03-01T09:00:00"), utc("2024-03-01T09:00:00+00:00"));
    }

    #[test]
    fn test_bare_date_is_utc_midnight() {
        let dt = parse_any_datetime("2024-05-10").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 0);
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.date_naive(), NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
    }

    #[test]
    fn test_fractional_seconds() {
        assert_eq!(
            epoch_millis(&parse_any_datetime("2024-03-01 10:00:00.250 +0100").unwrap()),
            epoch_millis(&parse_any_datetime("2024-03-01T09:00:00.250Z").unwrap())
        );
    }

    #[test]
    fn test_offset_is_preserved() {
        let dt = parse_any_datetime("2024-03-01 23:30:00 +0200").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(dt.hour(), 23);
    }

    #[test]
    fn test_unsupported_format() {
        for bad in ["", "yesterday", "01/03/2024 10:00", "2024-13-01", "2024-03-01 25:00:00"] {
            let err = parse_any_datetime(bad).unwrap_err();
            assert!(matches!(err, IngestError::Format(_)), "expected format error for {bad:?}");
        }
    }

    #[test]
    fn test_normalize_to_utc_iso() {
        assert_eq!(
            normalize_to_utc_iso("2024-03-01 10:00:00 +0100").unwrap(),
            "2024-03-01T09:00:00+00:00"
        );
        assert_eq!(
            normalize_to_utc_iso("2024-03-01").unwrap(),
            "2024-03-01T00:00:00+00:00"
        );
        assert!(normalize_to_utc_iso("not a date").is_err());
    }

    #[test]
    fn test_local_date_and_hour_fast_paths() {
        let may_10 = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert_eq!(local_date_and_hour("2024-05-10 23:00:00 +0200"), (Some(may_10), 23));
        assert_eq!(local_date_and_hour("2024-05-10T03:15:00+02:00"), (Some(may_10), 3));
        // Offsets are not applied; the wall-clock hour wins.
        assert_eq!(local_date_and_hour("2024-05-10T01:00:00-09:00"), (Some(may_10), 1));
    }

    #[test]
    fn test_local_date_and_hour_fallbacks() {
        let may_10 = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        assert_eq!(local_date_and_hour("2024-05-10"), (Some(may_10), 0));
        assert_eq!(local_date_and_hour("garbage"), (None, DEFAULT_HOUR));
    }

    #[test]
    fn test_previous_day_rolls_over() {
        let jan_1 = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(previous_day(jan_1), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        let mar_1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(previous_day(mar_1), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_plain_date_part() {
        assert_eq!(plain_date_part("2024-03-01 10:00:00 +0100"), "2024-03-01");
        assert_eq!(plain_date_part("2024-03-01T10:00:00Z"), "2024-03-01");
        assert_eq!(plain_date_part("2024-03-01"), "2024-03-01");
        assert!(parse_plain_date("03/01/2024 10:00").is_err());
    }
}
