//! Configuration schema definitions using serde with validation attributes.

use dbmsg_common::{comma_delimited_list, CacheDuration, LoggingConfig};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Message source configuration.
    pub messages: MessagesConfig,
    /// Backing store configuration.
    pub store: StoreConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Message source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MessagesConfig {
    /// Comma-separated list of base bundle names, searched in order.
    #[validate(custom(
        function = "crate::validation::validate_basename_list",
        message = "At least one basename is required"
    ))]
    pub basename: String,

    /// How long a loaded bundle is served before the store is consulted.
    pub cache_duration: CacheDuration,

    /// Whether to try the default locale when the requested one has no bundle.
    pub fallback_to_default_locale: bool,

    /// Default locale tag (`en`, `en_US`, `en-US`); empty disables it.
    #[validate(custom(
        function = "crate::validation::validate_locale_tag",
        message = "Default locale must look like en, en_US or en-US"
    ))]
    pub default_locale: String,

    /// Whether a missing code resolves to the code itself.
    pub use_code_as_default_message: bool,

    /// Character encoding hint; values are always handled as decoded text.
    #[validate(custom(
        function = "crate::validation::validate_encoding",
        message = "Encoding must be a charset name such as UTF-8"
    ))]
    pub encoding: String,
}

impl MessagesConfig {
    /// The configured basenames, split and trimmed.
    pub fn basenames(&self) -> Vec<String> {
        comma_delimited_list(&self.basename)
    }

    /// The default locale, if one is configured.
    pub fn default_locale(&self) -> Option<&str> {
        let trimmed = self.default_locale.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Embedded store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory of the sled database.
    #[validate(length(min = 1, message = "Store path cannot be empty"))]
    pub path: String,

    /// Name of the tree holding bundle records.
    #[validate(length(min = 1, message = "Store tree name cannot be empty"))]
    pub tree: String,
}
