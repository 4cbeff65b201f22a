use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::CoreError;

// ============================================================================
// Rule vocabulary
// ============================================================================

/// Repetition granularity of a rule (the `FREQ` part).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub const ALL: [Frequency; 7] = [
        Frequency::Secondly,
        Frequency::Minutely,
        Frequency::Hourly,
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Secondly => "SECONDLY",
            Frequency::Minutely => "MINUTELY",
            Frequency::Hourly => "HOURLY",
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Yearly => "YEARLY",
        }
    }

    /// Number of days materialized per period when BY* parts are present.
    ///
    /// Months count as 30 days and years as 365, regardless of the calendar.
    pub fn period_days(&self) -> Option<i64> {
        match self {
            Frequency::Weekly => Some(7),
            Frequency::Monthly => Some(30),
            Frequency::Yearly => Some(365),
            _ => None,
        }
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frequency::ALL
            .into_iter()
            .find(|freq| freq.as_str() == s)
            .ok_or_else(|| CoreError::UnsupportedFreq(s.to_string()))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-letter weekday code as used by `BYDAY` and `WKST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Weekday {
    Mo,
    Tu,
    We,
    Th,
    Fr,
    Sa,
    Su,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid weekday code: {0}")]
pub struct ParseWeekdayError(String);

impl Weekday {
    pub fn code(&self) -> &'static str {
        match self {
            Weekday::Mo => "MO",
            Weekday::Tu => "TU",
            Weekday::We => "WE",
            Weekday::Th => "TH",
            Weekday::Fr => "FR",
            Weekday::Sa => "SA",
            Weekday::Su => "SU",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => Weekday::Mo,
            chrono::Weekday::Tue => Weekday::Tu,
            chrono::Weekday::Wed => Weekday::We,
            chrono::Weekday::Thu => Weekday::Th,
            chrono::Weekday::Fri => Weekday::Fr,
            chrono::Weekday::Sat => Weekday::Sa,
            chrono::Weekday::Sun => Weekday::Su,
        }
    }
}

impl FromStr for Weekday {
    type Err = ParseWeekdayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MO" => Ok(Weekday::Mo),
            "TU" => Ok(Weekday::Tu),
            "WE" => Ok(Weekday::We),
            "TH" => Ok(Weekday::Th),
            "FR" => Ok(Weekday::Fr),
            "SA" => Ok(Weekday::Sa),
            "SU" => Ok(Weekday::Su),
            _ => Err(ParseWeekdayError(s.to_string())),
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One token of a `BY*` list: a signed number, or a symbolic code such as `MO`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ByValue {
    Int(i64),
    Code(String),
}

impl ByValue {
    /// Numeric tokens become `Int`, everything else is kept verbatim.
    pub fn parse(token: &str) -> Self {
        match token.parse::<i64>() {
            Ok(number) => ByValue::Int(number),
            Err(_) => ByValue::Code(token.to_string()),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ByValue::Int(number) => Some(*number),
            ByValue::Code(_) => None,
        }
    }

    pub fn as_code(&self) -> Option<&str> {
        match self {
            ByValue::Int(_) => None,
            ByValue::Code(code) => Some(code),
        }
    }
}

impl From<i64> for ByValue {
    fn from(number: i64) -> Self {
        ByValue::Int(number)
    }
}

impl From<Weekday> for ByValue {
    fn from(day: Weekday) -> Self {
        ByValue::Code(day.code().to_string())
    }
}

impl From<&str> for ByValue {
    fn from(token: &str) -> Self {
        ByValue::parse(token)
    }
}

impl fmt::Display for ByValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByValue::Int(number) => write!(f, "{}", number),
            ByValue::Code(code) => f.write_str(code),
        }
    }
}

/// How a rule ends. COUNT and UNTIL are exclusive, so a rule holds at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Count(u32),
    Until(DateTime<FixedOffset>),
}

/// The `BY*` constraint lists of a rule. An absent list disables its filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByRules {
    #[serde(rename = "BYSECOND", default, skip_serializing_if = "Option::is_none")]
    pub by_second: Option<Vec<ByValue>>,
    #[serde(rename = "BYMINUTE", default, skip_serializing_if = "Option::is_none")]
    pub by_minute: Option<Vec<ByValue>>,
    #[serde(rename = "BYHOUR", default, skip_serializing_if = "Option::is_none")]
    pub by_hour: Option<Vec<ByValue>>,
    #[serde(rename = "BYDAY", default, skip_serializing_if = "Option::is_none")]
    pub by_day: Option<Vec<ByValue>>,
    #[serde(rename = "BYMONTHDAY", default, skip_serializing_if = "Option::is_none")]
    pub by_month_day: Option<Vec<ByValue>>,
    #[serde(rename = "BYYEARDAY", default, skip_serializing_if = "Option::is_none")]
    pub by_year_day: Option<Vec<ByValue>>,
    #[serde(rename = "BYWEEKNO", default, skip_serializing_if = "Option::is_none")]
    pub by_week_no: Option<Vec<ByValue>>,
    #[serde(rename = "BYMONTH", default, skip_serializing_if = "Option::is_none")]
    pub by_month: Option<Vec<ByValue>>,
    #[serde(rename = "BYSETPOS", default, skip_serializing_if = "Option::is_none")]
    pub by_set_pos: Option<Vec<ByValue>>,
}

impl ByRules {
    /// Whether coarse frequencies must materialize every day of a period.
    ///
    /// BYSECOND, BYMINUTE and BYHOUR never trigger expansion.
    pub fn expands_period(&self) -> bool {
        self.by_day.is_some()
            || self.by_week_no.is_some()
            || self.by_set_pos.is_some()
            || self.by_month.is_some()
            || self.by_month_day.is_some()
            || self.by_year_day.is_some()
    }
}

// ============================================================================
// Rule values
// ============================================================================

/// Unvalidated rule value, as produced by the natural-language front-end or
/// handed in by callers. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleParts {
    #[serde(rename = "FREQ", default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<String>,
    #[serde(rename = "INTERVAL", default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(rename = "UNTIL", default, skip_serializing_if = "Option::is_none")]
    pub until: Option<DateTime<FixedOffset>>,
    #[serde(rename = "COUNT", default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(flatten)]
    pub by_rules: ByRules,
    #[serde(rename = "WKST", default, skip_serializing_if = "Option::is_none")]
    pub wkst: Option<String>,
}

/// A validated recurrence rule.
///
/// Construction goes through [`RecurrenceRule::try_from`] (or
/// [`crate::parser::parse_string`]), which fills defaults once; the value is
/// immutable afterwards and safe to share between generation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    freq: Frequency,
    interval: u32,
    termination: Option<Termination>,
    by_rules: ByRules,
    week_start: Option<Weekday>,
}

impl RecurrenceRule {
    pub fn freq(&self) -> Frequency {
        self.freq
    }

    /// Always at least 1.
    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    pub fn count(&self) -> Option<u32> {
        match self.termination {
            Some(Termination::Count(count)) => Some(count),
            _ => None,
        }
    }

    pub fn until(&self) -> Option<DateTime<FixedOffset>> {
        match self.termination {
            Some(Termination::Until(until)) => Some(until),
            _ => None,
        }
    }

    pub fn by_rules(&self) -> &ByRules {
        &self.by_rules
    }

    /// The WKST part, defaulting to Monday. Week numbering does not consult it.
    pub fn week_start(&self) -> Weekday {
        self.week_start.unwrap_or(Weekday::Mo)
    }

    pub fn to_parts(&self) -> RuleParts {
        RuleParts::from(self)
    }
}

impl TryFrom<RuleParts> for RecurrenceRule {
    type Error = CoreError;

    /// Validates a loose rule value.
    ///
    /// # Behavior
    /// - `FreqRequired` when FREQ is absent, `UnsupportedFreq` when unknown
    /// - `UntilAndCountBothSet` when both bounds are present
    /// - INTERVAL defaults to 1; a zero INTERVAL or COUNT is rejected
    /// - WKST must be a weekday code when present
    fn try_from(parts: RuleParts) -> Result<Self, Self::Error> {
        let freq: Frequency = parts.freq.as_deref().ok_or(CoreError::FreqRequired)?.parse()?;

        let termination = match (parts.until, parts.count) {
            (Some(_), Some(_)) => return Err(CoreError::UntilAndCountBothSet),
            (Some(until), None) => Some(Termination::Until(until)),
            (None, Some(0)) => return Err(CoreError::invalid_value("COUNT", "0")),
            (None, Some(count)) => Some(Termination::Count(count)),
            (None, None) => None,
        };

        let interval = match parts.interval {
            Some(0) => return Err(CoreError::invalid_value("INTERVAL", "0")),
            Some(interval) => interval,
            None => 1,
        };

        let week_start = parts
            .wkst
            .as_deref()
            .map(|code| code.parse::<Weekday>().map_err(|_| CoreError::invalid_value("WKST", code)))
            .transpose()?;

        Ok(Self {
            freq,
            interval,
            termination,
            by_rules: parts.by_rules,
            week_start,
        })
    }
}

impl From<&RecurrenceRule> for RuleParts {
    fn from(rule: &RecurrenceRule) -> Self {
        RuleParts {
            freq: Some(rule.freq.as_str().to_string()),
            interval: Some(rule.interval),
            until: rule.until(),
            count: rule.count(),
            by_rules: rule.by_rules.clone(),
            wkst: rule.week_start.map(|day| day.code().to_string()),
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::parser::serialize_parts(&self.to_parts()))
    }
}
