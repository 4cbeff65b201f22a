use crate::error::CoreError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, SecondsFormat, TimeZone, Utc};

/// Date-time layouts accepted without an explicit offset, tried in order.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y%m%dT%H%M%S",
];

/// Date-only layouts, interpreted as midnight.
const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// The zero offset used for UNTIL values and naive inputs without context.
pub fn utc() -> FixedOffset {
    Utc.fix()
}

/// An instant as written: either with an explicit offset, or as local wall time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrittenInstant {
    Fixed(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}

/// Reads an instant without deciding what offset a naive input belongs to.
///
/// Accepted forms, tried in order: RFC 3339, ISO 8601 with an offset but no
/// seconds, iCalendar basic form in UTC (`20231231T000000Z`), naive ISO 8601
/// date-times, and bare dates (midnight).
pub fn read_instant(text: &str) -> Result<WrittenInstant, CoreError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(WrittenInstant::Fixed(dt));
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M%:z") {
        return Ok(WrittenInstant::Fixed(dt));
    }

    // iCalendar basic form in UTC, e.g. 20231231T000000Z
    if let Some(stripped) = text.strip_suffix('Z') {
        if let Ok(naive) = NaiveDateTime::parse_from_str(stripped, "%Y%m%dT%H%M%S") {
            return localize(naive, utc(), text).map(WrittenInstant::Fixed);
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(WrittenInstant::Naive(naive));
        }
    }

    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(WrittenInstant::Naive)
                .ok_or_else(|| CoreError::InvalidInstant(text.to_string()));
        }
    }

    Err(CoreError::InvalidInstant(text.to_string()))
}

/// Parses an instant in any of the supported textual forms.
///
/// # Arguments
/// * `text` - RFC 3339, naive ISO 8601, ISO date or iCalendar basic form
/// * `default_offset` - Offset applied to inputs that carry none
///
/// # Returns
/// * `Result<DateTime<FixedOffset>, CoreError>` - The instant or `InvalidInstant`
pub fn parse_instant(
    text: &str,
    default_offset: FixedOffset,
) -> Result<DateTime<FixedOffset>, CoreError> {
    match read_instant(text)? {
        WrittenInstant::Fixed(dt) => Ok(dt),
        WrittenInstant::Naive(naive) => localize(naive, default_offset, text),
    }
}

/// Parses an instant, reading naive inputs as UTC.
pub fn parse_instant_utc(text: &str) -> Result<DateTime<FixedOffset>, CoreError> {
    parse_instant(text, utc())
}

/// Formats an instant as RFC 3339 with second precision; a zero offset prints as `Z`.
pub fn format_instant(instant: &DateTime<FixedOffset>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn localize(
    naive: NaiveDateTime,
    offset: FixedOffset,
    original: &str,
) -> Result<DateTime<FixedOffset>, CoreError> {
    offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| CoreError::InvalidInstant(original.to_string()))
}
