//! Bootstrap of a [`MessageResolver`] from explicit settings or configuration

use crate::cache::{BundleCache, CachePolicy};
use crate::clock::{Clock, SystemClock};
use crate::locale::Locale;
use crate::resolver::MessageResolver;
use crate::strategy::ContentLoaderStrategy;
use dbmsg_common::{comma_delimited_list, CacheDuration, DbMsgError, Result};
use dbmsg_config::MessagesConfig;
use std::fmt;
use std::sync::Arc;
use tracing::info;

const DEFAULT_ENCODING: &str = "UTF-8";

/// Builder for a [`MessageResolver`].
///
/// Exactly one content loader must be registered; registering none or
/// several is a bootstrap error.
pub struct MessageSourceBuilder {
    basenames: Vec<String>,
    cache_duration: CacheDuration,
    fallback_to_default_locale: bool,
    default_locale: Option<Locale>,
    use_code_as_default_message: bool,
    encoding: String,
    clock: Arc<dyn Clock>,
    loaders: Vec<Arc<dyn ContentLoaderStrategy>>,
}

impl fmt::Debug for MessageSourceBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageSourceBuilder")
            .field("basenames", &self.basenames)
            .field("cache_duration", &self.cache_duration)
            .field("fallback_to_default_locale", &self.fallback_to_default_locale)
            .field("default_locale", &self.default_locale)
            .field("use_code_as_default_message", &self.use_code_as_default_message)
            .field("encoding", &self.encoding)
            .field("loaders", &self.loaders.len())
            .finish_non_exhaustive()
    }
}

impl Default for MessageSourceBuilder {
    fn default() -> Self {
        Self {
            basenames: Vec::new(),
            cache_duration: CacheDuration::Forever,
            fallback_to_default_locale: false,
            default_locale: None,
            use_code_as_default_message: false,
            encoding: DEFAULT_ENCODING.to_string(),
            clock: Arc::new(SystemClock),
            loaders: Vec::new(),
        }
    }
}

impl MessageSourceBuilder {
    /// Create a builder with no basenames and no loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder from the `messages` configuration section
    pub fn from_config(config: &MessagesConfig) -> Result<Self> {
        let default_locale = config
            .default_locale()
            .map(str::parse::<Locale>)
            .transpose()?;

        Ok(Self {
            basenames: config.basenames(),
            cache_duration: config.cache_duration,
            fallback_to_default_locale: config.fallback_to_default_locale,
            default_locale,
            use_code_as_default_message: config.use_code_as_default_message,
            encoding: config.encoding.clone(),
            ..Self::default()
        })
    }

    /// Set the basenames, searched in the given order
    #[must_use]
    pub fn basenames<I, S>(mut self, basenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.basenames = basenames.into_iter().map(Into::into).collect();
        self
    }

    /// Set the basenames from a comma-separated list
    #[must_use]
    pub fn basename_list(mut self, list: &str) -> Self {
        self.basenames = comma_delimited_list(list);
        self
    }

    /// Set how long a loaded bundle is served before revalidation
    #[must_use]
    pub const fn cache_duration(mut self, cache_duration: CacheDuration) -> Self {
        self.cache_duration = cache_duration;
        self
    }

    /// Enable or disable falling back to the default locale
    #[must_use]
    pub const fn fallback_to_default_locale(mut self, enabled: bool) -> Self {
        self.fallback_to_default_locale = enabled;
        self
    }

    /// Set the locale searched when falling back
    #[must_use]
    pub fn default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = Some(locale);
        self
    }

    /// Echo the code back when a message cannot be resolved
    #[must_use]
    pub const fn use_code_as_default_message(mut self, enabled: bool) -> Self {
        self.use_code_as_default_message = enabled;
        self
    }

    /// Set the encoding hint
    #[must_use]
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Replace the time source
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Register a content loader
    #[must_use]
    pub fn loader<L>(mut self, loader: L) -> Self
    where
        L: ContentLoaderStrategy + 'static,
    {
        self.loaders.push(Arc::new(loader));
        self
    }

    /// Validate the settings and build the resolver
    pub fn build(mut self) -> Result<MessageResolver> {
        let loader = match self.loaders.len() {
            0 => return Err(DbMsgError::config("No content loader registered")),
            1 => self.loaders.remove(0),
            count => return Err(DbMsgError::AmbiguousSource { count }),
        };

        if self.basenames.is_empty() {
            return Err(DbMsgError::config("At least one basename is required"));
        }

        if self.fallback_to_default_locale && self.default_locale.is_none() {
            return Err(DbMsgError::config(
                "Fallback to the default locale is enabled but no default locale is set",
            ));
        }

        info!(
            basenames = ?self.basenames,
            cache_duration = %self.cache_duration,
            fallback = self.fallback_to_default_locale,
            default_locale = ?self.default_locale.as_ref().map(Locale::tag),
            "Message source ready"
        );

        let policy = CachePolicy {
            cache_duration: self.cache_duration,
            fallback_to_default_locale: self.fallback_to_default_locale,
            default_locale: self.default_locale,
        };
        let cache = BundleCache::new(loader, policy, self.clock);

        Ok(MessageResolver::new(
            Arc::new(cache),
            self.basenames,
            self.use_code_as_default_message,
            self.encoding,
        ))
    }
}
