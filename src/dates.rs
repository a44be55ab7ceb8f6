//! Lenient temporal parsing.
//!
//! Task timestamps come from an external record store and may be stored
//! in several text forms: RFC 3339 with an offset or `Z`, a naive
//! ISO-8601 timestamp, or a plain `YYYY-MM-DD` date. They may also be
//! malformed. The engine's policy is to degrade ordering rather than
//! fail the listing, so every parser here returns `Option` and never
//! errors.
//!
//! Offset-aware timestamps keep their offset: the calendar day of a
//! completion is the day where the work happened, not the UTC day.
//! Naive forms are treated as offset zero, so durations between mixed
//! forms stay comparable.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Parse a timestamp in any accepted form.
///
/// A plain date parses as midnight.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(aware) = DateTime::parse_from_rfc3339(raw) {
        return Some(aware);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc().fixed_offset());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc().fixed_offset());
    }
    parse_plain_date(raw)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().fixed_offset())
}

/// Parse the calendar-day component of a timestamp or plain date.
///
/// For offset-aware timestamps this is the day in the timestamp's own
/// offset.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|ts| ts.date_naive())
}

fn parse_plain_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Elapsed time between two timestamps in fractional hours.
///
/// Subtraction compares instants, so differing offsets do not skew the
/// duration. Negative when `end` precedes `start`; callers that care
/// must reject that ordering before computing.
pub fn hours_between(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> f64 {
    let elapsed = end.signed_duration_since(start);
    elapsed.num_milliseconds() as f64 / 3_600_000.0
}
