//! BY* constraint filters applied to the candidate list after every step.

use chrono::{DateTime, Datelike, FixedOffset};

use crate::models::{ByRules, ByValue, Weekday};

/// One of the five candidate predicates, listed in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByFilter {
    Day,
    Month,
    MonthDay,
    YearDay,
    WeekNo,
}

impl ByFilter {
    pub const ORDER: [ByFilter; 5] = [
        ByFilter::Day,
        ByFilter::Month,
        ByFilter::MonthDay,
        ByFilter::YearDay,
        ByFilter::WeekNo,
    ];

    fn values<'a>(&self, rules: &'a ByRules) -> Option<&'a [ByValue]> {
        let values = match self {
            ByFilter::Day => &rules.by_day,
            ByFilter::Month => &rules.by_month,
            ByFilter::MonthDay => &rules.by_month_day,
            ByFilter::YearDay => &rules.by_year_day,
            ByFilter::WeekNo => &rules.by_week_no,
        };
        values.as_deref()
    }

    /// Tests one candidate against the filter's list.
    ///
    /// Signed lists match a value `n` when either `n` or `-n` is present;
    /// a negative entry is not counted back from the end of the month or year.
    pub fn matches(&self, values: &[ByValue], candidate: &DateTime<FixedOffset>) -> bool {
        match self {
            ByFilter::Day => {
                let code = Weekday::from(candidate.weekday()).code();
                values.iter().any(|value| value.as_code() == Some(code))
            }
            ByFilter::Month => contains_int(values, i64::from(candidate.month())),
            ByFilter::MonthDay => contains_magnitude(values, i64::from(candidate.day())),
            ByFilter::YearDay => contains_magnitude(values, i64::from(candidate.ordinal())),
            ByFilter::WeekNo => contains_magnitude(values, week_number(candidate)),
        }
    }
}

/// Week of the year as `ceil(ordinal / 7)`; this is not ISO 8601 numbering.
pub fn week_number(candidate: &DateTime<FixedOffset>) -> i64 {
    (i64::from(candidate.ordinal()) + 6) / 7
}

fn contains_int(values: &[ByValue], wanted: i64) -> bool {
    values.iter().any(|value| value.as_int() == Some(wanted))
}

fn contains_magnitude(values: &[ByValue], wanted: i64) -> bool {
    contains_int(values, wanted) || contains_int(values, -wanted)
}

/// Applies every configured BY* filter, in [`ByFilter::ORDER`], to a candidate list.
#[derive(Debug, Clone, Copy)]
pub struct FilterChain<'a> {
    rules: &'a ByRules,
}

impl<'a> FilterChain<'a> {
    pub fn new(rules: &'a ByRules) -> Self {
        Self { rules }
    }

    /// Whether at least one filter would narrow the candidates.
    pub fn is_active(&self) -> bool {
        ByFilter::ORDER
            .iter()
            .any(|filter| filter.values(self.rules).is_some())
    }

    /// Retains the candidates accepted by every filter whose list is present.
    pub fn apply(&self, candidates: &mut Vec<DateTime<FixedOffset>>) {
        for filter in ByFilter::ORDER {
            if let Some(values) = filter.values(self.rules) {
                candidates.retain(|candidate| filter.matches(values, candidate));
            }
        }
    }
}
