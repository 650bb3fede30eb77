//! The contract between the bundle cache and a backing store

use crate::record::BundleName;
use dbmsg_common::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Supplies bundle contents and change notifications from a backing store.
///
/// Both operations block. Errors are returned rather than hidden so the
/// cache can keep serving the last known good bundle; the cache never lets
/// them reach its callers.
#[cfg_attr(test, mockall::automock)]
pub trait ContentLoaderStrategy: Send + Sync {
    /// Every key/value pair stored for exactly this fallback level.
    fn load_all(&self, bundle: &BundleName) -> Result<HashMap<String, String>>;

    /// Whether any row of this basename, language and country was modified
    /// after `since` (epoch milliseconds).
    fn has_changed_since(&self, bundle: &BundleName, since: i64) -> Result<bool>;
}

impl<T: ContentLoaderStrategy + ?Sized> ContentLoaderStrategy for Arc<T> {
    fn load_all(&self, bundle: &BundleName) -> Result<HashMap<String, String>> {
        (**self).load_all(bundle)
    }

    fn has_changed_since(&self, bundle: &BundleName, since: i64) -> Result<bool> {
        (**self).has_changed_since(bundle, since)
    }
}
