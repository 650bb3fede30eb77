//! Configuration loading utilities

use crate::Config;
use dbmsg_common::{CacheDuration, DbMsgError, Result as DbMsgResult};
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "DBMSG_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for DbMsgError {
    fn from(err: ConfigError) -> Self {
        DbMsgError::config_with_source("Configuration loading error", err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        debug!("Loading configuration from {:?}", path.as_ref());

        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = serde_yaml::from_str(&content)?;

        Self::apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables and files
    pub fn load() -> DbMsgResult<Config> {
        let config = if let Ok(config_path) = env::var(CONFIG_PATH_VAR) {
            Self::load_config(&config_path)?
        } else if Path::new("dbmsg.yaml").exists() {
            Self::load_config("dbmsg.yaml")?
        } else if Path::new("dbmsg.yml").exists() {
            Self::load_config("dbmsg.yml")?
        } else {
            info!("No configuration file found, using defaults");
            let mut config = Config::default();
            Self::apply_env_overrides(&mut config)?;
            config.validate_all().map_err(ConfigError::ValidationError)?;
            config
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> DbMsgResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
        Self::apply_overrides_with(config, |var| env::var(var).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_with<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(basename) = lookup("DBMSG_BASENAME") {
            config.messages.basename = basename;
        }

        if let Some(duration) = lookup("DBMSG_CACHE_DURATION") {
            config.messages.cache_duration =
                duration
                    .parse::<CacheDuration>()
                    .map_err(|e| ConfigError::EnvParseError {
                        var: "DBMSG_CACHE_DURATION".to_string(),
                        source: Box::new(e),
                    })?;
        }

        if let Some(fallback) = lookup("DBMSG_FALLBACK_TO_DEFAULT_LOCALE") {
            config.messages.fallback_to_default_locale =
                fallback.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "DBMSG_FALLBACK_TO_DEFAULT_LOCALE".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Some(locale) = lookup("DBMSG_DEFAULT_LOCALE") {
            config.messages.default_locale = locale;
        }

        if let Some(use_code) = lookup("DBMSG_USE_CODE_AS_DEFAULT_MESSAGE") {
            config.messages.use_code_as_default_message =
                use_code.parse().map_err(|e| ConfigError::EnvParseError {
                    var: "DBMSG_USE_CODE_AS_DEFAULT_MESSAGE".to_string(),
                    source: Box::new(e),
                })?;
        }

        if let Some(encoding) = lookup("DBMSG_ENCODING") {
            config.messages.encoding = encoding;
        }

        if let Some(path) = lookup("DBMSG_STORE_PATH") {
            config.store.path = path;
        }

        if let Some(level) = lookup("DBMSG_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_overrides_apply() {
        let mut config = Config::default();
        let lookup = lookup_from(&[
            ("DBMSG_BASENAME", "app, errors"),
            ("DBMSG_CACHE_DURATION", "500ms"),
            ("DBMSG_USE_CODE_AS_DEFAULT_MESSAGE", "true"),
            ("DBMSG_STORE_PATH", "/tmp/msgs"),
        ]);

        ConfigLoader::apply_overrides_with(&mut config, lookup).unwrap();

        assert_eq!(config.messages.basenames(), vec!["app", "errors"]);
        assert_eq!(config.messages.cache_duration.as_millis(), 500);
        assert!(config.messages.use_code_as_default_message);
        assert_eq!(config.store.path, "/tmp/msgs");
    }

    #[test]
    fn test_bad_override_reports_variable() {
        let mut config = Config::default();
        let lookup = lookup_from(&[("DBMSG_FALLBACK_TO_DEFAULT_LOCALE", "maybe")]);

        let err = ConfigLoader::apply_overrides_with(&mut config, lookup).unwrap_err();
        assert!(err.to_string().contains("DBMSG_FALLBACK_TO_DEFAULT_LOCALE"));
    }

    #[test]
    fn test_load_config_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "messages:\n  basename: app\n  cache_duration: 10s\n  use_code_as_default_message: true\nstore:\n  path: /var/lib/dbmsg\n"
        )
        .unwrap();

        let config = ConfigLoader::load_config(file.path()).unwrap();
        assert_eq!(config.messages.basenames(), vec!["app"]);
        assert_eq!(config.messages.cache_duration.as_millis(), 10_000);
        assert!(config.messages.fallback_to_default_locale);
        assert_eq!(config.store.tree, "bundle_records");
    }

    #[test]
    fn test_invalid_yaml_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "messages:\n  basename: ' , '\n").unwrap();

        let err = ConfigLoader::load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let converted: DbMsgError = err.into();
        assert!(matches!(converted, DbMsgError::Config { .. }));
    }
}
