use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Locale used when a caller does not name one, and the catalog fallback.
pub const DEFAULT_LOCALE: &str = "en";

/// Locales with both a natural-language vocabulary and a message catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    De,
    Es,
    Fr,
    It,
}

impl Locale {
    pub const ALL: [Locale; 5] = [Locale::En, Locale::De, Locale::Es, Locale::Fr, Locale::It];

    pub fn tag(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::De => "de",
            Locale::Es => "es",
            Locale::Fr => "fr",
            Locale::It => "it",
        }
    }

    /// Resolves a tag such as `de`, `DE` or `de-AT` by its primary subtag.
    pub fn from_tag(tag: &str) -> Option<Locale> {
        let primary = tag.split(['-', '_']).next().unwrap_or_default().to_lowercase();
        Locale::ALL.into_iter().find(|locale| locale.tag() == primary)
    }
}

impl FromStr for Locale {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::from_tag(s).ok_or_else(|| CoreError::UnsupportedLocale(s.to_string()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en", Locale::En)]
    #[case("DE", Locale::De)]
    #[case("es-MX", Locale::Es)]
    #[case("fr_CA", Locale::Fr)]
    #[case("it", Locale::It)]
    fn test_from_tag(#[case] tag: &str, #[case] expected: Locale) {
        assert_eq!(Locale::from_tag(tag), Some(expected));
    }

    #[rstest]
    #[case("jp")]
    #[case("")]
    #[case("english")]
    fn test_unsupported(#[case] tag: &str) {
        assert_eq!(
            tag.parse::<Locale>(),
            Err(CoreError::UnsupportedLocale(tag.to_string()))
        );
    }

    #[test]
    fn test_default_is_fallback_tag() {
        assert_eq!(Locale::default().tag(), DEFAULT_LOCALE);
    }
}
