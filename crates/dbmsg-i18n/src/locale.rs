//! Locale management and the resource-bundle fallback chain

use dbmsg_common::{DbMsgError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unic_langid::subtags::{Language, Region};
use unic_langid::LanguageIdentifier;

/// A language/country/variant triple, each part either empty or set.
///
/// `Locale::new` keeps the parts exactly as given, which is what records
/// read from a store need. Parsing a tag with [`str::parse`] validates and
/// canonicalizes language and country casing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Locale {
    language: String,
    country: String,
    variant: String,
}

impl Locale {
    /// Create a locale from raw parts
    pub fn new(
        language: impl Into<String>,
        country: impl Into<String>,
        variant: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            country: country.into(),
            variant: variant.into(),
        }
    }

    /// The root locale, whose bundle is the plain basename
    pub fn root() -> Self {
        Self::default()
    }

    /// Language part, e.g. `en`
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Country part, e.g. `US`
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Variant part, e.g. `POSIX`
    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Whether every part is empty
    pub fn is_root(&self) -> bool {
        self.language.is_empty() && self.country.is_empty() && self.variant.is_empty()
    }

    /// Underscore-joined tag of the non-empty parts (`en_US_POSIX`, `""` for root)
    pub fn tag(&self) -> String {
        [&self.language, &self.country, &self.variant]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Fallback candidates from most to least specific, root excluded.
    ///
    /// Full locale, then language+country, then language. Levels that
    /// collapse to the same triple appear once.
    pub fn candidates(&self) -> Vec<Self> {
        let levels = [
            self.clone(),
            Self::new(self.language.clone(), self.country.clone(), ""),
            Self::new(self.language.clone(), "", ""),
        ];

        let mut candidates: Vec<Self> = Vec::with_capacity(levels.len());
        for level in levels {
            if !level.is_root() && !candidates.contains(&level) {
                candidates.push(level);
            }
        }
        candidates
    }

    /// Convert to a Unicode `LanguageIdentifier`.
    ///
    /// Fails when the variant is not a valid BCP 47 variant subtag.
    pub fn to_language_identifier(&self) -> Result<LanguageIdentifier> {
        let tag = self.tag().replace('_', "-");
        if tag.is_empty() {
            return Ok(LanguageIdentifier::default());
        }
        tag.parse()
            .map_err(|_| DbMsgError::InvalidLocale(self.tag()))
    }
}

impl From<&LanguageIdentifier> for Locale {
    fn from(id: &LanguageIdentifier) -> Self {
        let language = match id.language.as_str() {
            "und" => String::new(),
            other => other.to_string(),
        };
        let country = id.region.map(|r| r.as_str().to_string()).unwrap_or_default();
        let variant = id
            .variants()
            .map(|v| v.as_str().to_string())
            .collect::<Vec<_>>()
            .join("_");

        Self::new(language, country, variant)
    }
}

impl FromStr for Locale {
    type Err = DbMsgError;

    /// Parses `en`, `en_US`, `en-US`, `en_US_POSIX`; the empty string is root.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let parts: Vec<&str> = trimmed.split(['_', '-']).collect();
        if parts.len() > 3 {
            return Err(DbMsgError::InvalidLocale(s.to_string()));
        }

        let language: Language = parts[0]
            .parse()
            .map_err(|_| DbMsgError::InvalidLocale(s.to_string()))?;

        let country = match parts.get(1) {
            Some(country) if !country.is_empty() => country
                .parse::<Region>()
                .map_err(|_| DbMsgError::InvalidLocale(s.to_string()))?
                .as_str()
                .to_string(),
            _ => String::new(),
        };

        let variant = parts.get(2).map(ToString::to_string).unwrap_or_default();
        if !variant.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DbMsgError::InvalidLocale(s.to_string()));
        }

        Ok(Self::new(language.as_str(), country, variant))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        let locale: Locale = "en_US".parse().unwrap();
        assert_eq!(locale.language(), "en");
        assert_eq!(locale.country(), "US");
        assert_eq!(locale.variant(), "");

        let locale: Locale = "EN-us".parse().unwrap();
        assert_eq!(locale, Locale::new("en", "US", ""));

        let locale: Locale = "en_US_POSIX".parse().unwrap();
        assert_eq!(locale.tag(), "en_US_POSIX");

        let locale: Locale = "".parse().unwrap();
        assert!(locale.is_root());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("e".parse::<Locale>().is_err());
        assert!("en_USA_x_y".parse::<Locale>().is_err());
        assert!("en_U$".parse::<Locale>().is_err());
    }

    #[test]
    fn test_candidates_order() {
        let locale = Locale::new("en", "US", "POSIX");
        let tags: Vec<String> = locale.candidates().iter().map(Locale::tag).collect();
        assert_eq!(tags, vec!["en_US_POSIX", "en_US", "en"]);

        let tags: Vec<String> = Locale::new("en", "", "").candidates().iter().map(Locale::tag).collect();
        assert_eq!(tags, vec!["en"]);

        assert!(Locale::root().candidates().is_empty());
    }

    #[test]
    fn test_new_keeps_raw_parts() {
        let locale = Locale::new("EN", " ", "");
        assert_eq!(locale.language(), "EN");
        assert_eq!(locale.country(), " ");
        assert!(!locale.is_root());
    }

    #[test]
    fn test_language_identifier_conversion() {
        let locale: Locale = "pt_BR".parse().unwrap();
        let id = locale.to_language_identifier().unwrap();
        assert_eq!(id.to_string(), "pt-BR");
        assert_eq!(Locale::from(&id), locale);

        let root = Locale::root().to_language_identifier().unwrap();
        assert_eq!(Locale::from(&root), Locale::root());
    }
}
