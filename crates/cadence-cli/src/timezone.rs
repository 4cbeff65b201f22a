use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone};
use chrono_tz::Tz;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimezoneError {
    #[error("Invalid timezone: '{0}'. Use IANA timezone names like 'America/New_York'")]
    Invalid(String),
    #[error("{0} does not exist in {1:?}")]
    NonexistentLocalTime(NaiveDateTime, Tz),
}

/// Validate IANA timezone name
pub fn validate_timezone(timezone: &str) -> Result<Tz, TimezoneError> {
    Tz::from_str(timezone).map_err(|_| TimezoneError::Invalid(timezone.to_string()))
}

/// Detect system timezone
pub fn detect_system_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        if !tz.is_empty() && validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    if let Ok(tz) = iana_time_zone::get_timezone() {
        if validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    "UTC".to_string()
}

/// Pins local wall time to the offset `tz` has at that moment.
///
/// An ambiguous time (the repeated hour when clocks go back) takes the
/// earlier offset; a time skipped by a forward transition is an error.
pub fn localize(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<FixedOffset>, TimezoneError> {
    let local = tz
        .from_local_datetime(&naive)
        .earliest()
        .ok_or(TimezoneError::NonexistentLocalTime(naive, tz))?;
    Ok(local.with_timezone(&local.offset().fix()))
}
