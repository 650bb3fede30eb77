//! In-memory bundle store
//!
//! Useful for tests and for hosts that seed messages from code. Records are
//! keyed by their full identity, so upserting the same key twice for one
//! fallback level replaces the earlier row.

use crate::record::{BundleName, BundleRecord};
use crate::strategy::ContentLoaderStrategy;
use dbmsg_common::{DbMsgError, Result};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// `(base_name, language, country, variant, key)`
type RecordId = (String, String, String, String, String);

fn record_id(record: &BundleRecord) -> RecordId {
    (
        record.base_name.clone(),
        record.language.clone(),
        record.country.clone(),
        record.variant.clone(),
        record.key.clone(),
    )
}

/// A [`ContentLoaderStrategy`] over records held in memory
#[derive(Debug)]
pub struct MemoryBundleStore {
    records: RwLock<BTreeMap<RecordId, BundleRecord>>,
    available: AtomicBool,
}

impl Default for MemoryBundleStore {
    fn default() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            available: AtomicBool::new(true),
        }
    }
}

impl MemoryBundleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with records
    pub fn with_records(records: impl IntoIterator<Item = BundleRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.upsert(record);
        }
        store
    }

    /// Insert or replace a record.
    ///
    /// A record without a modification time is stamped with the current
    /// time so caches notice the write.
    pub fn upsert(&self, mut record: BundleRecord) {
        if record.last_modified == 0 {
            record.last_modified = chrono::Utc::now().timestamp_millis();
        }
        self.records.write().insert(record_id(&record), record);
    }

    /// Remove a record by identity, returning it if present
    pub fn remove(&self, bundle: &BundleName, key: &str) -> Option<BundleRecord> {
        let id = (
            bundle.basename().to_string(),
            bundle.locale().language().to_string(),
            bundle.locale().country().to_string(),
            bundle.locale().variant().to_string(),
            key.to_string(),
        );
        self.records.write().remove(&id)
    }

    /// Every record, in key order
    pub fn records(&self) -> Vec<BundleRecord> {
        let mut records: Vec<BundleRecord> = self.records.read().values().cloned().collect();
        records.sort();
        records
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Simulate the store going down or coming back
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
        debug!(available, "Memory store availability changed");
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(DbMsgError::storage("memory store is unavailable"))
        }
    }
}

impl ContentLoaderStrategy for MemoryBundleStore {
    fn load_all(&self, bundle: &BundleName) -> Result<HashMap<String, String>> {
        self.ensure_available()?;

        let records = self.records.read();
        let mut entries = HashMap::new();
        for record in records.values().filter(|r| r.belongs_to(bundle)) {
            if let Err(e) = record.check_integrity() {
                warn!(bundle = %bundle, error = %e, "Malformed record served as stored");
            }
            entries.insert(record.key.clone(), record.value.clone());
        }
        Ok(entries)
    }

    fn has_changed_since(&self, bundle: &BundleName, since: i64) -> Result<bool> {
        self.ensure_available()?;

        let locale = bundle.locale();
        Ok(self.records.read().values().any(|r| {
            r.base_name == bundle.basename()
                && r.language == locale.language()
                && r.country == locale.country()
                && r.last_modified > since
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;

    fn en() -> Locale {
        Locale::new("en", "", "")
    }

    #[test]
    fn test_load_all_filters_by_level() {
        let store = MemoryBundleStore::with_records([
            BundleRecord::new("app", "greeting", "Hello").with_locale(&en()),
            BundleRecord::new("app", "greeting", "Hi"),
            BundleRecord::new("other", "greeting", "Yo").with_locale(&en()),
        ]);

        let entries = store.load_all(&BundleName::new("app", en())).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries["greeting"], "Hello");

        let root = store.load_all(&BundleName::root("app")).unwrap();
        assert_eq!(root["greeting"], "Hi");
    }

    #[test]
    fn test_upsert_replaces_same_identity() {
        let store = MemoryBundleStore::new();
        store.upsert(BundleRecord::new("app", "k", "1"));
        store.upsert(BundleRecord::new("app", "k", "2"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].value, "2");

        assert!(store.remove(&BundleName::root("app"), "k").is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn test_upsert_stamps_modification_time() {
        let store = MemoryBundleStore::new();
        store.upsert(BundleRecord::new("app", "k", "v"));
        store.upsert(BundleRecord::new("app", "fixed", "v").with_last_modified(42));

        let records = store.records();
        assert!(records.iter().find(|r| r.key == "k").unwrap().last_modified > 0);
        assert_eq!(records.iter().find(|r| r.key == "fixed").unwrap().last_modified, 42);
        assert!(store.has_changed_since(&BundleName::root("app"), 1_000_000).unwrap());
    }

    #[test]
    fn test_change_detection_ignores_variant() {
        let store = MemoryBundleStore::with_records([BundleRecord::new("app", "k", "v")
            .with_locale(&Locale::new("en", "US", "POSIX"))
            .with_last_modified(200)]);

        let level = BundleName::new("app", Locale::new("en", "US", ""));
        assert!(store.has_changed_since(&level, 100).unwrap());
        assert!(!store.has_changed_since(&level, 200).unwrap());
        assert!(!store
            .has_changed_since(&BundleName::new("app", en()), 100)
            .unwrap());
    }

    #[test]
    fn test_unavailable_store_errors() {
        let store = MemoryBundleStore::new();
        store.set_available(false);
        assert!(store.load_all(&BundleName::root("app")).unwrap_err().is_storage());
        assert!(store.has_changed_since(&BundleName::root("app"), 0).is_err());

        store.set_available(true);
        assert!(store.load_all(&BundleName::root("app")).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_records_are_served_as_stored() {
        let store = MemoryBundleStore::with_records([
            BundleRecord::new("app", "", "no key"),
            BundleRecord::new("app", "ok", "fine"),
        ]);
        let entries = store.load_all(&BundleName::root("app")).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[""], "no key");
    }
}
