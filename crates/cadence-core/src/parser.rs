//! Conversion between rule strings (`FREQ=WEEKLY;BYDAY=MO,WE`) and rule values.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::models::{ByValue, RecurrenceRule, RuleParts};
use crate::timezone::{format_instant, parse_instant_utc};

/// The closed set of keys a rule string may contain, in serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKey {
    Freq,
    Interval,
    Until,
    Count,
    BySecond,
    ByMinute,
    ByHour,
    ByDay,
    ByMonthDay,
    ByYearDay,
    ByWeekNo,
    ByMonth,
    BySetPos,
    Wkst,
}

impl RuleKey {
    pub const ALL: [RuleKey; 14] = [
        RuleKey::Freq,
        RuleKey::Interval,
        RuleKey::Until,
        RuleKey::Count,
        RuleKey::BySecond,
        RuleKey::ByMinute,
        RuleKey::ByHour,
        RuleKey::ByDay,
        RuleKey::ByMonthDay,
        RuleKey::ByYearDay,
        RuleKey::ByWeekNo,
        RuleKey::ByMonth,
        RuleKey::BySetPos,
        RuleKey::Wkst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKey::Freq => "FREQ",
            RuleKey::Interval => "INTERVAL",
            RuleKey::Until => "UNTIL",
            RuleKey::Count => "COUNT",
            RuleKey::BySecond => "BYSECOND",
            RuleKey::ByMinute => "BYMINUTE",
            RuleKey::ByHour => "BYHOUR",
            RuleKey::ByDay => "BYDAY",
            RuleKey::ByMonthDay => "BYMONTHDAY",
            RuleKey::ByYearDay => "BYYEARDAY",
            RuleKey::ByWeekNo => "BYWEEKNO",
            RuleKey::ByMonth => "BYMONTH",
            RuleKey::BySetPos => "BYSETPOS",
            RuleKey::Wkst => "WKST",
        }
    }

    fn list_mut<'a>(&self, parts: &'a mut RuleParts) -> Option<&'a mut Option<Vec<ByValue>>> {
        let by = &mut parts.by_rules;
        match self {
            RuleKey::BySecond => Some(&mut by.by_second),
            RuleKey::ByMinute => Some(&mut by.by_minute),
            RuleKey::ByHour => Some(&mut by.by_hour),
            RuleKey::ByDay => Some(&mut by.by_day),
            RuleKey::ByMonthDay => Some(&mut by.by_month_day),
            RuleKey::ByYearDay => Some(&mut by.by_year_day),
            RuleKey::ByWeekNo => Some(&mut by.by_week_no),
            RuleKey::ByMonth => Some(&mut by.by_month),
            RuleKey::BySetPos => Some(&mut by.by_set_pos),
            _ => None,
        }
    }

    fn list<'a>(&self, parts: &'a RuleParts) -> Option<&'a Vec<ByValue>> {
        let by = &parts.by_rules;
        match self {
            RuleKey::BySecond => by.by_second.as_ref(),
            RuleKey::ByMinute => by.by_minute.as_ref(),
            RuleKey::ByHour => by.by_hour.as_ref(),
            RuleKey::ByDay => by.by_day.as_ref(),
            RuleKey::ByMonthDay => by.by_month_day.as_ref(),
            RuleKey::ByYearDay => by.by_year_day.as_ref(),
            RuleKey::ByWeekNo => by.by_week_no.as_ref(),
            RuleKey::ByMonth => by.by_month.as_ref(),
            RuleKey::BySetPos => by.by_set_pos.as_ref(),
            _ => None,
        }
    }
}

impl FromStr for RuleKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| CoreError::UnknownRuleKey(s.to_string()))
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses and validates a rule string.
///
/// # Arguments
/// * `text` - `KEY=VALUE` segments separated by `;`, lists separated by `,`
///
/// # Returns
/// * `Result<RecurrenceRule, CoreError>` - The validated rule or the first error met
///
/// # Behavior
/// - A segment without `=` (or with an empty side) is `InvalidRulePart`
/// - Only the text between the first and second `=` is the value
/// - A key outside the closed set is `UnknownRuleKey`
/// - Once every segment is read: `FreqRequired`, then `UntilAndCountBothSet`
/// - INTERVAL defaults to 1
#[tracing::instrument(level = "debug")]
pub fn parse_string(text: &str) -> Result<RecurrenceRule, CoreError> {
    let parts = parse_parts(text)?;
    let rule = RecurrenceRule::try_from(parts)?;
    tracing::debug!(rule = %rule, "Parsed recurrence rule");
    Ok(rule)
}

/// Reads a rule string into unvalidated parts, checking only its syntax and keys.
pub fn parse_parts(text: &str) -> Result<RuleParts, CoreError> {
    if text.is_empty() {
        return Err(CoreError::FreqRequired);
    }

    let mut parts = RuleParts::default();
    for segment in text.split(';') {
        // Text after a second '=' is ignored: `COUNT=3=4` reads as `COUNT=3`.
        let mut pieces = segment.split('=');
        let (key, value) = match (pieces.next(), pieces.next()) {
            (Some(key), Some(value)) if !key.is_empty() && !value.is_empty() => (key, value),
            _ => return Err(CoreError::InvalidRulePart(segment.to_string())),
        };
        let key: RuleKey = key.parse()?;
        tracing::trace!(%key, value, "Rule segment");
        apply_value(&mut parts, key, value)?;
    }
    Ok(parts)
}

fn apply_value(parts: &mut RuleParts, key: RuleKey, value: &str) -> Result<(), CoreError> {
    match key {
        RuleKey::Freq => parts.freq = Some(value.to_string()),
        RuleKey::Wkst => parts.wkst = Some(value.to_string()),
        RuleKey::Until => {
            let until = parse_instant_utc(value)
                .map_err(|_| CoreError::invalid_value(key.as_str(), value))?;
            parts.until = Some(until);
        }
        RuleKey::Count => parts.count = Some(parse_number(key, value)?),
        RuleKey::Interval => parts.interval = Some(parse_number(key, value)?),
        list_key => {
            if let Some(slot) = list_key.list_mut(parts) {
                *slot = Some(value.split(',').map(ByValue::parse).collect());
            }
        }
    }
    Ok(())
}

fn parse_number(key: RuleKey, value: &str) -> Result<u32, CoreError> {
    value
        .parse::<u32>()
        .map_err(|_| CoreError::invalid_value(key.as_str(), value))
}

/// Serializes a rule value back into a rule string.
///
/// Fields appear in [`RuleKey::ALL`] order, which is not necessarily the order
/// of the string the value was parsed from.
pub fn generate(parts: &RuleParts) -> Result<String, CoreError> {
    if parts.freq.is_none() {
        return Err(CoreError::FreqRequired);
    }
    Ok(serialize_parts(parts))
}

pub(crate) fn serialize_parts(parts: &RuleParts) -> String {
    RuleKey::ALL
        .iter()
        .filter_map(|key| field_value(parts, *key).map(|value| format!("{}={}", key, value)))
        .collect::<Vec<_>>()
        .join(";")
}

fn field_value(parts: &RuleParts, key: RuleKey) -> Option<String> {
    match key {
        RuleKey::Freq => parts.freq.clone(),
        RuleKey::Interval => parts.interval.map(|interval| interval.to_string()),
        RuleKey::Until => parts.until.as_ref().map(format_instant),
        RuleKey::Count => parts.count.map(|count| count.to_string()),
        RuleKey::Wkst => parts.wkst.clone(),
        list_key => list_key.list(parts).map(|values| {
            values
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        }),
    }
}
