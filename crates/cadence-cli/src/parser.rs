use anyhow::Result;
use cadence_core::timezone::{read_instant, WrittenInstant};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use chrono_english::{parse_date_string, Dialect};
use chrono_tz::Tz;

use crate::timezone::localize;

/// Parses a `--start` value.
///
/// Explicit offsets are kept; wall times without one are placed in `timezone`.
/// Anything the core cannot read is tried as an English phrase ("tomorrow",
/// "next friday 9am") relative to now in `timezone`. When both fail the core's
/// error is returned so it can be reported in the user's locale.
pub fn parse_start(text: &str, timezone: Tz) -> Result<DateTime<FixedOffset>> {
    match read_instant(text) {
        Ok(WrittenInstant::Fixed(instant)) => Ok(instant),
        Ok(WrittenInstant::Naive(naive)) => Ok(localize(naive, timezone)?),
        Err(core_error) => {
            let local_now = Utc::now().with_timezone(&timezone);
            let now = local_now.with_timezone(&local_now.offset().fix());
            match parse_date_string(text, now, Dialect::Us) {
                Ok(instant) => {
                    tracing::debug!(input = text, %instant, "Parsed relative start");
                    Ok(instant)
                }
                Err(_) => Err(core_error.into()),
            }
        }
    }
}
