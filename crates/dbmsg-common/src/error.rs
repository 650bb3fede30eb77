//! Error types and utilities for dbmsg

use thiserror::Error;

/// Result type alias for dbmsg operations
pub type Result<T> = std::result::Result<T, DbMsgError>;

/// Main error type for dbmsg operations
#[derive(Error, Debug)]
pub enum DbMsgError {
    /// Configuration related errors, fatal at startup
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backing store could not be reached or the query failed
    #[error("Storage unavailable: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// More than one content source was registered at bootstrap
    #[error("Ambiguous message source: {count} content loaders registered, exactly one is required")]
    AmbiguousSource { count: usize },

    /// No level of the fallback chain yielded any entries
    #[error("Bundle not found: {basename} for locale '{locale}'")]
    NotFound { basename: String, locale: String },

    /// A code could not be resolved and no default applies
    #[error("No message found under code '{code}' for locale '{locale}'")]
    NoSuchMessage { code: String, locale: String },

    /// A locale tag could not be parsed
    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    /// A stored record violates the record contract
    #[error("Malformed bundle record {record}: {message}")]
    DataIntegrity { record: String, message: String },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DbMsgError {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new storage error with source
    pub fn storage_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Storage {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new not-found error for a bundle lookup
    pub fn not_found(basename: impl Into<String>, locale: impl Into<String>) -> Self {
        Self::NotFound {
            basename: basename.into(),
            locale: locale.into(),
        }
    }

    /// Create a new missing-message error
    pub fn no_such_message(code: impl Into<String>, locale: impl Into<String>) -> Self {
        Self::NoSuchMessage {
            code: code.into(),
            locale: locale.into(),
        }
    }

    /// Create a new data integrity error
    pub fn data_integrity(record: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::DataIntegrity {
            record: record.into(),
            message: msg.into(),
        }
    }

    /// Whether this error is a storage failure
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    /// Whether this error reports a missing bundle
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
