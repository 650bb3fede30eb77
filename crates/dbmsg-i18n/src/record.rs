//! Bundle records and composed bundle names

use crate::locale::Locale;
use dbmsg_common::{count_matches, name_part, DbMsgError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Identity of one fallback level: a basename plus a locale.
///
/// Renders as the composed name, e.g. `messages_en_US`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BundleName {
    basename: String,
    locale: Locale,
}

impl BundleName {
    /// Create a bundle name for the given basename and locale
    pub fn new(basename: impl Into<String>, locale: Locale) -> Self {
        Self {
            basename: basename.into(),
            locale,
        }
    }

    /// The root level of a basename
    pub fn root(basename: impl Into<String>) -> Self {
        Self::new(basename, Locale::root())
    }

    /// The basename without locale suffixes
    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// The locale of this level
    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    /// Basename followed by `_`-prefixed non-empty locale parts
    pub fn composed(&self) -> String {
        format!(
            "{}{}{}{}",
            self.basename,
            name_part(self.locale.language()),
            name_part(self.locale.country()),
            name_part(self.locale.variant())
        )
    }
}

impl fmt::Display for BundleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.composed())
    }
}

/// One stored message row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BundleRecord {
    /// Message code
    pub key: String,
    /// Message pattern, may be empty
    pub value: String,
    /// Basename of the owning bundle
    pub base_name: String,
    /// Language part, empty for none
    #[serde(default)]
    pub language: String,
    /// Country part, empty for none
    #[serde(default)]
    pub country: String,
    /// Variant part, empty for none
    #[serde(default)]
    pub variant: String,
    /// Last modification time in epoch milliseconds
    #[serde(default)]
    pub last_modified: i64,
}

impl BundleRecord {
    /// Create a root-locale record
    pub fn new(
        base_name: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            base_name: base_name.into(),
            language: String::new(),
            country: String::new(),
            variant: String::new(),
            last_modified: 0,
        }
    }

    /// Set the locale parts from a locale
    #[must_use]
    pub fn with_locale(mut self, locale: &Locale) -> Self {
        self.language = locale.language().to_string();
        self.country = locale.country().to_string();
        self.variant = locale.variant().to_string();
        self
    }

    /// Set the modification timestamp
    #[must_use]
    pub const fn with_last_modified(mut self, last_modified: i64) -> Self {
        self.last_modified = last_modified;
        self
    }

    /// The record's locale, parts kept exactly as stored
    pub fn locale(&self) -> Locale {
        Locale::new(
            self.language.clone(),
            self.country.clone(),
            self.variant.clone(),
        )
    }

    /// The fallback level this record belongs to
    pub fn bundle_name(&self) -> BundleName {
        BundleName::new(self.base_name.clone(), self.locale())
    }

    /// Composed bundle name, e.g. `messages_en_US`
    pub fn composed_name(&self) -> String {
        self.bundle_name().composed()
    }

    /// Whether this record lives in the given fallback level
    pub fn belongs_to(&self, bundle: &BundleName) -> bool {
        self.base_name == bundle.basename()
            && self.language == bundle.locale().language()
            && self.country == bundle.locale().country()
            && self.variant == bundle.locale().variant()
    }

    /// Check the record contract.
    ///
    /// Key and base name must be non-empty; each locale part must be empty or
    /// non-blank. Violations are reported, never repaired.
    pub fn check_integrity(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(DbMsgError::data_integrity(self.composed_name(), "empty key"));
        }
        if self.base_name.is_empty() {
            return Err(DbMsgError::data_integrity(
                format!("key '{}'", self.key),
                "empty base name",
            ));
        }

        for (field, part) in [
            ("language", &self.language),
            ("country", &self.country),
            ("variant", &self.variant),
        ] {
            if !part.is_empty() && part.trim().is_empty() {
                return Err(DbMsgError::data_integrity(
                    format!("{}/{}", self.composed_name(), self.key),
                    format!("blank {field}"),
                ));
            }
        }

        Ok(())
    }
}

/// Orders keys by ascending number of dots, then lexicographically.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    count_matches(a, '.')
        .cmp(&count_matches(b, '.'))
        .then_with(|| a.cmp(b))
}

impl Ord for BundleRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_keys(&self.key, &other.key)
            .then_with(|| self.base_name.cmp(&other.base_name))
            .then_with(|| self.language.cmp(&other.language))
            .then_with(|| self.country.cmp(&other.country))
            .then_with(|| self.variant.cmp(&other.variant))
            .then_with(|| self.value.cmp(&other.value))
            .then_with(|| self.last_modified.cmp(&other.last_modified))
    }
}

impl PartialOrd for BundleRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
