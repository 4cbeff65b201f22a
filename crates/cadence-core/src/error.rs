use thiserror::Error;

/// Errors raised by rule parsing, validation and occurrence generation.
///
/// The `Display` text is the English message. Use
/// [`crate::messages::message`] to render the same error for another locale.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("FREQ is required in a recurrence rule.")]
    FreqRequired,

    #[error("UNTIL and COUNT cannot both be specified.")]
    UntilAndCountBothSet,

    #[error("Invalid recurrence rule part: {0}")]
    InvalidRulePart(String),

    #[error("Unknown recurrence rule key: {0}")]
    UnknownRuleKey(String),

    #[error("Invalid value for recurrence rule key {key}: {value}")]
    InvalidRuleValue { key: String, value: String },

    #[error("DTSTART is required to generate dates.")]
    DtStartRequired,

    #[error("Unsupported FREQ: {0}")]
    UnsupportedFreq(String),

    #[error("Too many occurrences for this rule {0}")]
    TooManyOccurrences(String),

    #[error("Cannot parse the date or time: {0}")]
    InvalidInstant(String),

    #[error("Date arithmetic left the supported range after {0}")]
    DateOutOfRange(String),

    #[error("Cannot parse the natural language input: {0}")]
    InvalidNaturalLanguageInput(String),

    #[error("NLP is not fully supported for locale: {0}")]
    UnsupportedLocale(String),
}

impl CoreError {
    pub(crate) fn invalid_value(key: &str, value: &str) -> Self {
        CoreError::InvalidRuleValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}
