//! Natural-language front-end: free text such as "weekly monday for 4" to a rule.
//!
//! Each locale owns a fixed vocabulary of frequency words, day names and the
//! three structural keywords (every / at / for). Parsing is tokenize, look up,
//! and read the word after each keyword.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};

use crate::error::CoreError;
use crate::locale::Locale;
use crate::models::{ByRules, ByValue, Frequency, RecurrenceRule, RuleParts, Weekday};
use crate::timezone::utc;

/// Vocabulary of one locale. Lookups follow table order.
#[derive(Debug)]
pub struct Vocabulary {
    pub frequencies: &'static [(&'static str, Frequency)],
    pub days: &'static [(&'static str, Weekday)],
    pub every: &'static str,
    pub at: &'static str,
    pub count: &'static str,
}

const EN: Vocabulary = Vocabulary {
    frequencies: &[
        ("daily", Frequency::Daily),
        ("weekly", Frequency::Weekly),
        ("monthly", Frequency::Monthly),
        ("yearly", Frequency::Yearly),
    ],
    days: &[
        ("monday", Weekday::Mo),
        ("tuesday", Weekday::Tu),
        ("wednesday", Weekday::We),
        ("thursday", Weekday::Th),
        ("friday", Weekday::Fr),
        ("saturday", Weekday::Sa),
        ("sunday", Weekday::Su),
    ],
    every: "every",
    at: "at",
    count: "for",
};

const DE: Vocabulary = Vocabulary {
    frequencies: &[
        ("täglich", Frequency::Daily),
        ("wöchentlich", Frequency::Weekly),
        ("monatlich", Frequency::Monthly),
        ("jährlich", Frequency::Yearly),
    ],
    days: &[
        ("montag", Weekday::Mo),
        ("dienstag", Weekday::Tu),
        ("mittwoch", Weekday::We),
        ("donnerstag", Weekday::Th),
        ("freitag", Weekday::Fr),
        ("samstag", Weekday::Sa),
        ("sonntag", Weekday::Su),
    ],
    every: "alle",
    at: "um",
    count: "für",
};

const ES: Vocabulary = Vocabulary {
    frequencies: &[
        ("diario", Frequency::Daily),
        ("semanal", Frequency::Weekly),
        ("mensual", Frequency::Monthly),
        ("anual", Frequency::Yearly),
    ],
    days: &[
        ("lunes", Weekday::Mo),
        ("martes", Weekday::Tu),
        ("miércoles", Weekday::We),
        ("jueves", Weekday::Th),
        ("viernes", Weekday::Fr),
        ("sábado", Weekday::Sa),
        ("domingo", Weekday::Su),
    ],
    every: "cada",
    at: "a",
    count: "durante",
};

const FR: Vocabulary = Vocabulary {
    frequencies: &[
        ("quotidien", Frequency::Daily),
        ("hebdomadaire", Frequency::Weekly),
        ("mensuel", Frequency::Monthly),
        ("annuel", Frequency::Yearly),
    ],
    days: &[
        ("lundi", Weekday::Mo),
        ("mardi", Weekday::Tu),
        ("mercredi", Weekday::We),
        ("jeudi", Weekday::Th),
        ("vendredi", Weekday::Fr),
        ("samedi", Weekday::Sa),
        ("dimanche", Weekday::Su),
    ],
    every: "chaque",
    at: "à",
    count: "pour",
};

const IT: Vocabulary = Vocabulary {
    frequencies: &[
        ("giornaliero", Frequency::Daily),
        ("settimanale", Frequency::Weekly),
        ("mensile", Frequency::Monthly),
        ("annuale", Frequency::Yearly),
    ],
    days: &[
        ("lunedì", Weekday::Mo),
        ("martedì", Weekday::Tu),
        ("mercoledì", Weekday::We),
        ("giovedì", Weekday::Th),
        ("venerdì", Weekday::Fr),
        ("sabato", Weekday::Sa),
        ("domenica", Weekday::Su),
    ],
    every: "ogni",
    at: "alle",
    count: "per",
};

pub fn vocabulary(locale: Locale) -> &'static Vocabulary {
    match locale {
        Locale::En => &EN,
        Locale::De => &DE,
        Locale::Es => &ES,
        Locale::Fr => &FR,
        Locale::It => &IT,
    }
}

/// Result of translating free text: the rule plus the raw time-of-day token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaturalRule {
    rule: RecurrenceRule,
    time: Option<String>,
    input: String,
}

impl NaturalRule {
    pub fn rule(&self) -> &RecurrenceRule {
        &self.rule
    }

    pub fn into_rule(self) -> RecurrenceRule {
        self.rule
    }

    /// The word following the locale's "at" keyword, if any.
    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    /// Start instant for a rule that had none: `date` at midnight UTC, moved to
    /// the `hour:minute` time token when present.
    pub fn default_start(&self, date: NaiveDate) -> Result<DateTime<FixedOffset>, CoreError> {
        let time = match &self.time {
            Some(token) => parse_clock(token).ok_or_else(|| self.invalid())?,
            None => NaiveTime::from_hms_opt(0, 0, 0).ok_or_else(|| self.invalid())?,
        };
        utc()
            .from_local_datetime(&date.and_time(time))
            .single()
            .ok_or_else(|| self.invalid())
    }

    fn invalid(&self) -> CoreError {
        CoreError::InvalidNaturalLanguageInput(self.input.clone())
    }
}

/// Translates free text into a rule using the vocabulary of `locale`.
///
/// # Arguments
/// * `input` - Free text, e.g. "weekly every 2 monday friday for 6"
/// * `locale` - Locale tag selecting the vocabulary
///
/// # Returns
/// * `Result<NaturalRule, CoreError>` - The rule and the raw time token
///
/// # Behavior
/// - `UnsupportedLocale` when no vocabulary exists for the tag
/// - `InvalidNaturalLanguageInput` when no frequency word is present
/// - INTERVAL comes from the word after "every" (default 1), COUNT from the
///   word after "for", BYDAY from every day name present, in weekday order
#[tracing::instrument(level = "debug")]
pub fn parse(input: &str, locale: &str) -> Result<NaturalRule, CoreError> {
    let resolved = Locale::from_tag(locale)
        .ok_or_else(|| CoreError::UnsupportedLocale(locale.to_string()))?;
    let vocabulary = vocabulary(resolved);

    let lowered = input.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    let freq = vocabulary
        .frequencies
        .iter()
        .find(|(word, _)| words.contains(word))
        .map(|(_, freq)| *freq)
        .ok_or_else(|| CoreError::InvalidNaturalLanguageInput(input.to_string()))?;

    let interval = word_after(&words, vocabulary.every)
        .and_then(leading_int)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0)
        .unwrap_or(1);

    let days: Vec<ByValue> = vocabulary
        .days
        .iter()
        .filter(|(word, _)| words.contains(word))
        .map(|(_, day)| ByValue::from(*day))
        .collect();

    let count = word_after(&words, vocabulary.count)
        .and_then(leading_int)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n > 0);

    let time = word_after(&words, vocabulary.at).map(str::to_string);

    let parts = RuleParts {
        freq: Some(freq.as_str().to_string()),
        interval: Some(interval),
        count,
        by_rules: ByRules {
            by_day: (!days.is_empty()).then_some(days),
            ..Default::default()
        },
        ..Default::default()
    };
    let rule = RecurrenceRule::try_from(parts)?;
    tracing::debug!(rule = %rule, time = ?time, "Translated natural language rule");

    Ok(NaturalRule {
        rule,
        time,
        input: input.to_string(),
    })
}

fn word_after<'a>(words: &[&'a str], keyword: &str) -> Option<&'a str> {
    let index = words.iter().position(|word| *word == keyword)?;
    words.get(index + 1).copied()
}

/// Reads the integer at the start of a token ("3", "2nd", "-1x"), if any.
fn leading_int(token: &str) -> Option<i64> {
    let sign_len = usize::from(token.starts_with(['-', '+']));
    let digits = token[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(token.len(), |end| end + sign_len);
    token[..digits].parse().ok()
}

fn parse_clock(token: &str) -> Option<NaiveTime> {
    let mut pieces = token.split(':');
    let hour = pieces.next()?.parse().ok()?;
    let minute = pieces.next()?.parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}
