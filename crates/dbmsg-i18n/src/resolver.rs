//! Message lookup over one or more cached basenames

use crate::cache::BundleCache;
use crate::format::fill_positional;
use crate::locale::Locale;
use dbmsg_common::{DbMsgError, Result};
use std::sync::Arc;
use tracing::{debug, trace};

/// Resolves message codes against the configured basenames
#[derive(Debug, Clone)]
pub struct MessageResolver {
    cache: Arc<BundleCache>,
    basenames: Vec<String>,
    use_code_as_default_message: bool,
    encoding: String,
}

impl MessageResolver {
    /// Create a resolver over an existing cache
    pub fn new(
        cache: Arc<BundleCache>,
        basenames: Vec<String>,
        use_code_as_default_message: bool,
        encoding: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            basenames,
            use_code_as_default_message,
            encoding: encoding.into(),
        }
    }

    /// Resolve `code` for `locale` and fill `{N}` placeholders from `args`.
    ///
    /// Basenames are searched in order and the first one holding the code
    /// wins. When none does, `default_message` is used, then the code itself
    /// if so configured, else `NoSuchMessage`.
    pub fn get_message(
        &self,
        code: &str,
        locale: &Locale,
        args: &[&str],
        default_message: Option<&str>,
    ) -> Result<String> {
        if let Some(pattern) = self.resolve_code(code, locale)? {
            return Ok(fill_positional(&pattern, args).into_owned());
        }

        if let Some(default) = default_message {
            trace!(code, "Using supplied default message");
            return Ok(fill_positional(default, args).into_owned());
        }

        if self.use_code_as_default_message {
            debug!(code, locale = %locale, "Message not found, echoing code");
            return Ok(code.to_string());
        }

        Err(DbMsgError::no_such_message(code, locale.tag()))
    }

    /// Raw pattern stored under `code`, without placeholder substitution.
    ///
    /// A basename with no bundle at all for this locale is skipped.
    pub fn resolve_code(&self, code: &str, locale: &Locale) -> Result<Option<String>> {
        for basename in &self.basenames {
            match self.cache.find(basename, locale, code) {
                Ok(Some(pattern)) => return Ok(Some(pattern)),
                Ok(None) => {}
                Err(e) if e.is_not_found() => {
                    trace!(basename, locale = %locale, "No bundle for basename");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(None)
    }

    /// Whether any basename holds `code` for `locale`
    pub fn has_message(&self, code: &str, locale: &Locale) -> bool {
        matches!(self.resolve_code(code, locale), Ok(Some(_)))
    }

    /// The underlying bundle cache
    pub fn cache(&self) -> &Arc<BundleCache> {
        &self.cache
    }

    /// Basenames in search order
    pub fn basenames(&self) -> &[String] {
        &self.basenames
    }

    /// Whether unresolved codes are echoed back
    pub const fn use_code_as_default_message(&self) -> bool {
        self.use_code_as_default_message
    }

    /// Configured text encoding, informational only
    pub fn encoding(&self) -> &str {
        &self.encoding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachePolicy;
    use crate::clock::SystemClock;
    use crate::memory::MemoryBundleStore;
    use crate::record::BundleRecord;

    fn resolver(use_code: bool) -> MessageResolver {
        let en = Locale::new("en", "", "");
        let store = MemoryBundleStore::with_records([
            BundleRecord::new("app", "greeting", "Hello {0}").with_locale(&en),
            BundleRecord::new("errors", "greeting", "shadowed").with_locale(&en),
            BundleRecord::new("errors", "error.io", "I/O failed: {0}"),
        ]);
        let cache = BundleCache::new(
            Arc::new(store),
            CachePolicy::default(),
            Arc::new(SystemClock),
        );
        MessageResolver::new(
            Arc::new(cache),
            vec!["app".to_string(), "errors".to_string()],
            use_code,
            "UTF-8",
        )
    }

    #[test]
    fn test_first_basename_wins() {
        let messages = resolver(false);
        let en = Locale::new("en", "", "");
        assert_eq!(
            messages.get_message("greeting", &en, &["Ada"], None).unwrap(),
            "Hello Ada"
        );
        assert_eq!(
            messages.get_message("error.io", &en, &["disk"], None).unwrap(),
            "I/O failed: disk"
        );
    }

    #[test]
    fn test_missing_basename_is_skipped() {
        let messages = resolver(false);
        let fr = Locale::new("fr", "", "");
        assert_eq!(
            messages.get_message("error.io", &fr, &[], None).unwrap(),
            "I/O failed: {0}"
        );
    }

    #[test]
    fn test_defaults() {
        let en = Locale::new("en", "", "");

        let strict = resolver(false);
        assert_eq!(
            strict
                .get_message("missing", &en, &["x"], Some("Default {0}"))
                .unwrap(),
            "Default x"
        );
        assert!(matches!(
            strict.get_message("missing", &en, &[], None),
            Err(DbMsgError::NoSuchMessage { .. })
        ));

        let lenient = resolver(true);
        assert_eq!(lenient.get_message("missing", &en, &[], None).unwrap(), "missing");
    }

    #[test]
    fn test_has_message() {
        let messages = resolver(false);
        let en = Locale::new("en", "", "");
        assert!(messages.has_message("greeting", &en));
        assert!(!messages.has_message("nope", &en));
        assert_eq!(messages.encoding(), "UTF-8");
    }
}
