use chrono::{DateTime, Duration, FixedOffset, Months, NaiveDate, Utc};

use crate::error::CoreError;
use crate::filter::FilterChain;
use crate::locale::DEFAULT_LOCALE;
use crate::models::{ByValue, Frequency, RecurrenceRule, Termination};
use crate::natural::{self, NaturalRule};
use crate::timezone::format_instant;

/// Loop iterations allowed before a run is aborted with `TooManyOccurrences`.
pub const MAX_ITERATIONS: usize = 36_000;

/// Recurrence: expands one rule from one start instant into occurrences.
///
/// Responsibilities:
/// 1. Step forward from the start by the rule's frequency and interval
/// 2. Materialize every day of a period when BY* parts must select within it
/// 3. Narrow the accumulated candidates through the [`FilterChain`]
/// 4. Stop on COUNT, UNTIL or the iteration cap, then apply BYSETPOS
///
/// A run keeps all of its state on the stack; the same `Recurrence` can be
/// expanded any number of times, from any thread.
#[derive(Debug, Clone)]
pub struct Recurrence {
    /// The validated rule
    rule: RecurrenceRule,
    /// First candidate instant; generation fails without it
    dtstart: Option<DateTime<FixedOffset>>,
    /// Locale used by the natural-language front-end
    locale: String,
}

impl Recurrence {
    /// Creates an engine for a rule, an optional start and a locale tag.
    pub fn new(
        rule: RecurrenceRule,
        dtstart: Option<DateTime<FixedOffset>>,
        locale: impl Into<String>,
    ) -> Self {
        Self {
            rule,
            dtstart,
            locale: locale.into(),
        }
    }

    /// Creates an engine with the default locale.
    pub fn with_start(rule: RecurrenceRule, dtstart: DateTime<FixedOffset>) -> Self {
        Self::new(rule, Some(dtstart), DEFAULT_LOCALE)
    }

    pub fn rule(&self) -> &RecurrenceRule {
        &self.rule
    }

    pub fn dtstart(&self) -> Option<DateTime<FixedOffset>> {
        self.dtstart
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Replaces the rule with one read from free text in the engine's locale.
    ///
    /// # Behavior
    /// - The engine's rule is replaced by the translated rule
    /// - Without a start instant yet, the start becomes today at midnight UTC,
    ///   moved to the `at` time when the text carries one
    /// - An existing start is kept and the time token is not read
    pub fn from_natural_language(&mut self, input: &str) -> Result<&RecurrenceRule, CoreError> {
        let translated = natural::parse(input, &self.locale)?;
        self.apply_natural(translated, Utc::now().date_naive())
    }

    fn apply_natural(
        &mut self,
        translated: NaturalRule,
        today: NaiveDate,
    ) -> Result<&RecurrenceRule, CoreError> {
        if self.dtstart.is_none() {
            self.dtstart = Some(translated.default_start(today)?);
        }
        self.rule = translated.into_rule();
        Ok(&self.rule)
    }

    /// Expands the rule and formats every occurrence as RFC 3339 with an explicit offset.
    pub fn get_all_dates(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.occurrences()?.iter().map(format_instant).collect())
    }

    /// Expands the rule into occurrence instants.
    ///
    /// # Returns
    /// * `Result<Vec<DateTime<FixedOffset>>, CoreError>` - Ordered occurrences or error
    ///
    /// # Behavior
    /// - `DtStartRequired` without a start instant
    /// - Before each append: stop once `current` passes UNTIL or COUNT
    ///   occurrences survive the filters; fail with `TooManyOccurrences`
    ///   after `MAX_ITERATIONS` appends
    /// - After the loop: truncate to COUNT, then select BYSETPOS positions
    #[tracing::instrument(level = "debug", skip(self), fields(rule = %self.rule))]
    pub fn occurrences(&self) -> Result<Vec<DateTime<FixedOffset>>, CoreError> {
        let start = self.dtstart.ok_or(CoreError::DtStartRequired)?;
        let rule = &self.rule;
        let chain = FilterChain::new(rule.by_rules());

        let mut current = start;
        let mut accumulated: Vec<DateTime<FixedOffset>> = Vec::new();
        let mut steps = 0usize;

        loop {
            match rule.termination() {
                Some(Termination::Until(until)) if current > until => break,
                Some(Termination::Count(count)) if accumulated.len() >= count as usize => break,
                _ => {}
            }
            if steps >= MAX_ITERATIONS {
                tracing::warn!(steps, "Recurrence expansion hit the iteration cap");
                return Err(CoreError::TooManyOccurrences(rule.to_string()));
            }

            accumulated.push(current);
            steps += 1;

            current = self.advance(current, &mut accumulated)?;
            let filters_step = rule.freq().period_days().is_some() || rule.freq() == Frequency::Daily;
            if filters_step && chain.is_active() {
                chain.apply(&mut accumulated);
            }
        }

        if let Some(count) = rule.count() {
            accumulated.truncate(count as usize);
        }
        if let Some(positions) = &rule.by_rules().by_set_pos {
            accumulated = select_positions(&accumulated, positions);
        }

        tracing::debug!(steps, occurrences = accumulated.len(), "Expanded recurrence");
        Ok(accumulated)
    }

    /// Moves `current` one frequency step forward.
    ///
    /// On the expansion path every intermediate day of the period is pushed to
    /// `accumulated`, and the returned instant is the first day of the next period.
    fn advance(
        &self,
        current: DateTime<FixedOffset>,
        accumulated: &mut Vec<DateTime<FixedOffset>>,
    ) -> Result<DateTime<FixedOffset>, CoreError> {
        let interval = i64::from(self.rule.interval());
        match self.rule.freq() {
            Frequency::Secondly => add_duration(current, Duration::try_seconds(interval)),
            Frequency::Minutely => add_duration(current, Duration::try_minutes(interval)),
            Frequency::Hourly => add_duration(current, Duration::try_hours(interval)),
            Frequency::Daily => add_duration(current, Duration::try_days(interval)),
            freq => {
                let period_days = freq
                    .period_days()
                    .ok_or_else(|| CoreError::UnsupportedFreq(freq.to_string()))?;

                if self.rule.by_rules().expands_period() {
                    let span = interval * period_days;
                    let boundary = add_duration(current, Duration::try_days(span))?;
                    let mut day = current;
                    for _ in 1..span {
                        day = add_duration(day, Duration::try_days(1))?;
                        accumulated.push(day);
                    }
                    Ok(boundary)
                } else {
                    self.fast_step(current, freq)
                }
            }
        }
    }

    /// Steps a whole period at once when nothing has to be selected within it.
    fn fast_step(
        &self,
        current: DateTime<FixedOffset>,
        freq: Frequency,
    ) -> Result<DateTime<FixedOffset>, CoreError> {
        let interval = self.rule.interval();
        let next = match freq {
            Frequency::Weekly => {
                return add_duration(current, Duration::try_weeks(i64::from(interval)))
            }
            Frequency::Monthly => current.checked_add_months(Months::new(interval)),
            Frequency::Yearly => interval
                .checked_mul(12)
                .and_then(|months| current.checked_add_months(Months::new(months))),
            other => return Err(CoreError::UnsupportedFreq(other.to_string())),
        };
        next.ok_or_else(|| CoreError::DateOutOfRange(format_instant(&current)))
    }
}

fn add_duration(
    instant: DateTime<FixedOffset>,
    step: Option<Duration>,
) -> Result<DateTime<FixedOffset>, CoreError> {
    step.and_then(|step| instant.checked_add_signed(step))
        .ok_or_else(|| CoreError::DateOutOfRange(format_instant(&instant)))
}

/// Picks candidates by signed, one-based position.
///
/// `p > 0` selects `candidates[p - 1]`, `p < 0` selects `candidates[len + p]`.
/// Zero, out-of-range positions and non-numeric tokens are dropped silently;
/// output order follows `positions`, so a repeated position repeats its entry.
pub fn select_positions<T: Clone>(candidates: &[T], positions: &[ByValue]) -> Vec<T> {
    let len = candidates.len() as i64;
    positions
        .iter()
        .filter_map(ByValue::as_int)
        .filter_map(|position| match position {
            p if p > 0 => Some(p - 1),
            p if p < 0 => Some(len + p),
            _ => None,
        })
        .filter(|index| (0..len).contains(index))
        .filter_map(|index| usize::try_from(index).ok())
        .filter_map(|index| candidates.get(index).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ByRules, RuleParts};
    use crate::parser::parse_string;
    use crate::timezone::parse_instant_utc;
    use proptest::prelude::*;
    use rstest::rstest;

    const START: &str = "2023-10-01T00:00:00Z";

    fn expand(rule: &str, start: &str) -> Result<Vec<String>, CoreError> {
        let rule = parse_string(rule).unwrap();
        Recurrence::with_start(rule, parse_instant_utc(start).unwrap()).get_all_dates()
    }

    fn dates(days: &[&str]) -> Vec<String> {
        days.iter().map(|day| format!("{}T00:00:00Z", day)).collect()
    }

    mod simple_frequency_tests {
        use super::*;

        #[test]
        fn test_daily_count() {
            assert_eq!(
                expand("FREQ=DAILY;INTERVAL=1;COUNT=3", START).unwrap(),
                dates(&["2023-10-01", "2023-10-02", "2023-10-03"])
            );
        }

        #[test]
        fn test_daily_count_two() {
            assert_eq!(
                expand("FREQ=DAILY;COUNT=2", START).unwrap(),
                dates(&["2023-10-01", "2023-10-02"])
            );
        }

        #[test]
        fn test_weekly_fast_path() {
            assert_eq!(
                expand("FREQ=WEEKLY;INTERVAL=1;COUNT=3", START).unwrap(),
                dates(&["2023-10-01", "2023-10-08", "2023-10-15"])
            );
        }

        #[test]
        fn test_monthly_fast_path() {
            assert_eq!(
                expand("FREQ=MONTHLY;INTERVAL=1;COUNT=3", START).unwrap(),
                dates(&["2023-10-01", "2023-11-01", "2023-12-01"])
            );
        }

        #[test]
        fn test_yearly_fast_path() {
            assert_eq!(
                expand("FREQ=YEARLY;INTERVAL=1;COUNT=3", START).unwrap(),
                dates(&["2023-10-01", "2024-10-01", "2025-10-01"])
            );
        }

        #[test]
        fn test_monthly_fast_path_clamps_month_end() {
            assert_eq!(
                expand("FREQ=MONTHLY;COUNT=3", "2023-01-31T00:00:00Z").unwrap(),
                dates(&["2023-01-31", "2023-02-28", "2023-03-28"])
            );
        }

        #[rstest]
        #[case("FREQ=SECONDLY;INTERVAL=30;COUNT=3", &["2023-10-01T00:00:00Z", "2023-10-01T00:00:30Z", "2023-10-01T00:01:00Z"])]
        #[case("FREQ=MINUTELY;INTERVAL=15;COUNT=3", &["2023-10-01T00:00:00Z", "2023-10-01T00:15:00Z", "2023-10-01T00:30:00Z"])]
        #[case("FREQ=HOURLY;INTERVAL=12;COUNT=3", &["2023-10-01T00:00:00Z", "2023-10-01T12:00:00Z", "2023-10-02T00:00:00Z"])]
        fn test_sub_daily(#[case] rule: &str, #[case] expected: &[&str]) {
            assert_eq!(expand(rule, START).unwrap(), expected);
        }

        #[test]
        fn test_sub_daily_ignores_filters() {
            assert_eq!(
                expand("FREQ=HOURLY;COUNT=2;BYDAY=MO", START).unwrap(),
                vec!["2023-10-01T00:00:00Z", "2023-10-01T01:00:00Z"]
            );
        }

        #[test]
        fn test_offset_is_preserved() {
            assert_eq!(
                expand("FREQ=DAILY;COUNT=2", "2023-10-01T09:30:00+02:00").unwrap(),
                vec!["2023-10-01T09:30:00+02:00", "2023-10-02T09:30:00+02:00"]
            );
        }
    }

    mod bound_tests {
        use super::*;

        #[test]
        fn test_until_is_inclusive() {
            assert_eq!(
                expand("FREQ=DAILY;INTERVAL=1;UNTIL=2023-10-03T00:00:00", START).unwrap(),
                dates(&["2023-10-01", "2023-10-02", "2023-10-03"])
            );
        }

        #[test]
        fn test_until_before_start() {
            assert!(expand("FREQ=DAILY;UNTIL=2023-09-01", START).unwrap().is_empty());
        }

        #[test]
        fn test_unbounded_rule_hits_cap() {
            let rule = parse_string("FREQ=DAILY").unwrap();
            let expected = CoreError::TooManyOccurrences(rule.to_string());
            assert_eq!(expand("FREQ=DAILY", START), Err(expected));
        }

        #[test]
        fn test_unsatisfiable_filter_hits_cap() {
            assert!(matches!(
                expand("FREQ=DAILY;COUNT=1;BYMONTH=13", START),
                Err(CoreError::TooManyOccurrences(rule)) if rule.contains("BYMONTH=13")
            ));
        }

        #[test]
        fn test_cap_allows_exactly_max_iterations() {
            let rule = format!("FREQ=SECONDLY;COUNT={}", MAX_ITERATIONS);
            assert_eq!(expand(&rule, START).unwrap().len(), MAX_ITERATIONS);
        }

        #[test]
        fn test_missing_start() {
            let rule = parse_string("FREQ=DAILY;COUNT=1").unwrap();
            let engine = Recurrence::new(rule, None, "en");
            assert_eq!(engine.get_all_dates(), Err(CoreError::DtStartRequired));
        }

        #[test]
        fn test_date_overflow_is_reported() {
            let result = expand("FREQ=YEARLY;INTERVAL=100000;COUNT=5", START);
            assert!(matches!(result, Err(CoreError::DateOutOfRange(_))));
        }

        #[test]
        fn test_expanded_period_overflow_is_reported() {
            let result = expand("FREQ=YEARLY;INTERVAL=1000000;BYDAY=MO;COUNT=1", START);
            assert!(matches!(result, Err(CoreError::DateOutOfRange(_))));
        }
    }

    mod filter_tests {
        use super::*;

        #[test]
        fn test_week_number_ignores_week_start() {
            let with_wkst = expand("FREQ=DAILY;COUNT=7;BYWEEKNO=2;WKST=SU", "2023-01-01").unwrap();
            let without = expand("FREQ=DAILY;COUNT=7;BYWEEKNO=2", "2023-01-01").unwrap();
            assert_eq!(with_wkst, without);
            assert_eq!(
                with_wkst,
                dates(&[
                    "2023-01-08", "2023-01-09", "2023-01-10", "2023-01-11", "2023-01-12",
                    "2023-01-13", "2023-01-14",
                ])
            );
        }

        #[test]
        fn test_rule_without_filters_keeps_every_step() {
            let rule = parse_string("FREQ=DAILY;COUNT=3").unwrap();
            assert!(!FilterChain::new(rule.by_rules()).is_active());
            assert_eq!(
                expand("FREQ=DAILY;COUNT=3", START).unwrap(),
                dates(&["2023-10-01", "2023-10-02", "2023-10-03"])
            );
        }

        #[test]
        fn test_daily_by_day() {
            assert_eq!(
                expand("FREQ=DAILY;INTERVAL=1;COUNT=7;BYDAY=MO,WE", START).unwrap(),
                dates(&[
                    "2023-10-02", "2023-10-04", "2023-10-09", "2023-10-11", "2023-10-16",
                    "2023-10-18", "2023-10-23",
                ])
            );
        }

        #[test]
        fn test_weekly_expansion_by_day() {
            assert_eq!(
                expand("FREQ=WEEKLY;COUNT=5;BYDAY=TU,FR", START).unwrap(),
                dates(&["2023-10-03", "2023-10-06", "2023-10-10", "2023-10-13", "2023-10-17"])
            );
        }

        #[test]
        fn test_weekly_expansion_has_no_duplicates() {
            let result = expand("FREQ=WEEKLY;COUNT=6;BYDAY=FR,SA", START).unwrap();
            let mut deduped = result.clone();
            deduped.dedup();
            assert_eq!(result, deduped);
            assert_eq!(result.len(), 6);
        }

        #[test]
        fn test_biweekly_expansion_covers_both_weeks() {
            assert_eq!(
                expand("FREQ=WEEKLY;INTERVAL=2;COUNT=3;BYDAY=SU", START).unwrap(),
                dates(&["2023-10-01", "2023-10-08", "2023-10-15"])
            );
        }

        #[test]
        fn test_monthly_by_month_day() {
            assert_eq!(
                expand("FREQ=MONTHLY;COUNT=3;BYMONTHDAY=15", START).unwrap(),
                dates(&["2023-10-15", "2023-11-15", "2023-12-15"])
            );
        }

        #[test]
        fn test_yearly_by_month_and_day() {
            assert_eq!(
                expand("FREQ=YEARLY;COUNT=2;BYMONTH=1;BYMONTHDAY=1", START).unwrap(),
                dates(&["2024-01-01", "2025-01-01"])
            );
        }

        #[test]
        fn test_weekly_until_keeps_period_tail() {
            // UNTIL is only checked against the next period start
            assert_eq!(
                expand("FREQ=WEEKLY;UNTIL=2023-10-03;BYDAY=MO,TH", START).unwrap(),
                dates(&["2023-10-02", "2023-10-05"])
            );
        }
    }

    mod set_position_tests {
        use super::*;

        #[test]
        fn test_first_and_last() {
            assert_eq!(
                expand("FREQ=DAILY;INTERVAL=1;COUNT=10;BYSETPOS=1,-1", START).unwrap(),
                dates(&["2023-10-01", "2023-10-10"])
            );
        }

        #[test]
        fn test_set_pos_follows_list_order() {
            assert_eq!(
                expand("FREQ=DAILY;COUNT=5;BYSETPOS=-1,2", START).unwrap(),
                dates(&["2023-10-05", "2023-10-02"])
            );
        }

        #[test]
        fn test_set_pos_out_of_range_dropped() {
            assert_eq!(
                expand("FREQ=DAILY;COUNT=3;BYSETPOS=0,4,-4,3", START).unwrap(),
                dates(&["2023-10-03"])
            );
        }

        #[test]
        fn test_select_positions_ignores_codes() {
            let positions = vec![ByValue::Code("LAST".to_string()), ByValue::Int(1)];
            assert_eq!(select_positions(&[10, 20, 30], &positions), vec![10]);
        }

        #[test]
        fn test_select_positions_empty_candidates() {
            let positions = vec![ByValue::Int(1), ByValue::Int(-1)];
            assert!(select_positions::<u8>(&[], &positions).is_empty());
        }

        proptest! {
            #[test]
            fn prop_selection_is_drawn_from_candidates(
                candidates in prop::collection::vec(any::<u16>(), 0..40),
                positions in prop::collection::vec(-50i64..50, 0..10),
            ) {
                let positions: Vec<ByValue> = positions.into_iter().map(ByValue::Int).collect();
                let selected = select_positions(&candidates, &positions);
                prop_assert!(selected.len() <= positions.len());
                for value in &selected {
                    prop_assert!(candidates.contains(value));
                }
            }

            #[test]
            fn prop_first_and_last(candidates in prop::collection::vec(any::<u16>(), 1..40)) {
                let selected = select_positions(&candidates, &[ByValue::Int(1), ByValue::Int(-1)]);
                prop_assert_eq!(selected, vec![candidates[0], candidates[candidates.len() - 1]]);
            }
        }
    }

    mod engine_tests {
        use super::*;

        #[test]
        fn test_runs_are_deterministic() {
            let rule = parse_string("FREQ=WEEKLY;COUNT=8;BYDAY=MO,WE,FR;BYSETPOS=1,3,-1").unwrap();
            let engine = Recurrence::with_start(rule, parse_instant_utc(START).unwrap());
            assert_eq!(engine.get_all_dates().unwrap(), engine.get_all_dates().unwrap());
        }

        #[test]
        fn test_engine_is_shareable_across_threads() {
            let rule = parse_string("FREQ=DAILY;COUNT=4").unwrap();
            let engine = std::sync::Arc::new(Recurrence::with_start(
                rule,
                parse_instant_utc(START).unwrap(),
            ));
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let engine = engine.clone();
                    std::thread::spawn(move || engine.get_all_dates())
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap().unwrap().len(), 4);
            }
        }

        #[test]
        fn test_rule_from_parts() {
            let parts = RuleParts {
                freq: Some("DAILY".to_string()),
                count: Some(2),
                by_rules: ByRules {
                    by_day: Some(vec!["MO".into()]),
                    ..Default::default()
                },
                ..Default::default()
            };
            let rule = RecurrenceRule::try_from(parts).unwrap();
            let engine = Recurrence::with_start(rule, parse_instant_utc(START).unwrap());
            assert_eq!(engine.get_all_dates().unwrap(), dates(&["2023-10-02", "2023-10-09"]));
        }

        #[test]
        fn test_natural_language_keeps_existing_start() {
            let rule = parse_string("FREQ=DAILY").unwrap();
            let mut engine = Recurrence::new(rule, Some(parse_instant_utc(START).unwrap()), "en");
            let translated = engine
                .from_natural_language("daily at 10:00 AM for 5 occurrences")
                .unwrap()
                .clone();
            assert_eq!(translated.to_string(), "FREQ=DAILY;INTERVAL=1;COUNT=5");
            assert_eq!(engine.dtstart(), Some(parse_instant_utc(START).unwrap()));
            assert_eq!(engine.get_all_dates().unwrap().len(), 5);
        }

        #[test]
        fn test_natural_language_fills_missing_start() {
            let rule = parse_string("FREQ=DAILY").unwrap();
            let mut engine = Recurrence::new(rule, None, "de");
            let translated = natural::parse("täglich um 07:45 für 2", "de").unwrap();
            let today = NaiveDate::from_ymd_opt(2023, 10, 1).unwrap();
            engine.apply_natural(translated, today).unwrap();
            assert_eq!(
                engine.get_all_dates().unwrap(),
                vec!["2023-10-01T07:45:00Z", "2023-10-02T07:45:00Z"]
            );
        }

        #[test]
        fn test_natural_language_unsupported_locale() {
            let rule = parse_string("FREQ=DAILY").unwrap();
            let mut engine = Recurrence::new(rule, Some(parse_instant_utc(START).unwrap()), "jp");
            assert_eq!(
                engine.from_natural_language("毎日午前10時に5回の発生").unwrap_err(),
                CoreError::UnsupportedLocale("jp".to_string())
            );
        }
    }
}
