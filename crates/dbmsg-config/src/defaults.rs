//! Default values for every configuration section.

use crate::schema::{Config, MessagesConfig, StoreConfig};
use dbmsg_common::{CacheDuration, LoggingConfig};

/// Basename used when none is configured.
pub const DEFAULT_BASENAME: &str = "messages";

/// Tree name used by the embedded store.
pub const DEFAULT_TREE_NAME: &str = "bundle_records";

impl Default for Config {
    fn default() -> Self {
        Self {
            messages: MessagesConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            basename: DEFAULT_BASENAME.to_string(),
            cache_duration: CacheDuration::Forever,
            fallback_to_default_locale: true,
            default_locale: "en".to_string(),
            use_code_as_default_message: false,
            encoding: "UTF-8".to_string(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "data/messages.sled".to_string(),
            tree: DEFAULT_TREE_NAME.to_string(),
        }
    }
}
