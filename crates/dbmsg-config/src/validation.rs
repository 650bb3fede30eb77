//! Custom validation functions and whole-config validation.

use crate::schema::Config;
use dbmsg_common::comma_delimited_list;
use validator::{Validate, ValidationError, ValidationErrors};

/// Validate that a comma-separated basename list names at least one bundle
pub fn validate_basename_list(basenames: &str) -> Result<(), ValidationError> {
    let names = comma_delimited_list(basenames);
    if names.is_empty() {
        return Err(ValidationError::new("empty_basename_list"));
    }

    // Whitespace inside a basename would never match a stored bundle
    if names.iter().any(|name| name.contains(char::is_whitespace)) {
        return Err(ValidationError::new("invalid_basename"));
    }

    Ok(())
}

/// Validate a locale tag such as `en`, `en_US`, `en-US` or `en_US_POSIX`
///
/// The empty string is accepted and means "no default locale".
pub fn validate_locale_tag(tag: &str) -> Result<(), ValidationError> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Ok(());
    }

    let parts: Vec<&str> = tag.split(['_', '-']).collect();
    if parts.len() > 3 {
        return Err(ValidationError::new("too_many_locale_parts"));
    }

    let language_ok = parts[0].len() >= 2 && parts[0].chars().all(|c| c.is_ascii_alphabetic());
    let rest_ok = parts[1..]
        .iter()
        .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric()));

    if language_ok && rest_ok {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_locale_tag"))
    }
}

/// Validate a charset name (basic check, the value is only a hint)
pub fn validate_encoding(encoding: &str) -> Result<(), ValidationError> {
    if encoding.is_empty() {
        return Err(ValidationError::new("empty_encoding"));
    }

    if encoding
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_encoding"))
    }
}

impl Config {
    /// Validate every section plus the cross-field rules
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.messages.validate()?;
        self.store.validate()?;

        if self.messages.fallback_to_default_locale && self.messages.default_locale().is_none() {
            let mut errors = ValidationErrors::new();
            let mut error = ValidationError::new("missing_default_locale");
            error.message = Some("fallback_to_default_locale requires a default_locale".into());
            errors.add("default_locale", error);
            return Err(errors);
        }

        Ok(())
    }
}
