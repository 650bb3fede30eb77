//! sled-backed [`ContentLoaderStrategy`]

use dbmsg_common::{DbMsgError, Result};
use dbmsg_config::StoreConfig;
use dbmsg_i18n::{BundleName, BundleRecord, ContentLoaderStrategy};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

const SEPARATOR: u8 = 0;

fn push_part(buf: &mut Vec<u8>, part: &str) {
    buf.extend_from_slice(part.as_bytes());
    buf.push(SEPARATOR);
}

/// Prefix shared by every row of a basename, language and country
fn country_prefix(basename: &str, language: &str, country: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(basename.len() + language.len() + country.len() + 3);
    push_part(&mut prefix, basename);
    push_part(&mut prefix, language);
    push_part(&mut prefix, country);
    prefix
}

/// Prefix shared by every row of one fallback level
fn level_prefix(bundle: &BundleName) -> Vec<u8> {
    let locale = bundle.locale();
    let mut prefix = country_prefix(bundle.basename(), locale.language(), locale.country());
    push_part(&mut prefix, locale.variant());
    prefix
}

fn record_key(record: &BundleRecord) -> Vec<u8> {
    let mut key = country_prefix(&record.base_name, &record.language, &record.country);
    push_part(&mut key, &record.variant);
    key.extend_from_slice(record.key.as_bytes());
    key
}

fn storage_error(message: &str, e: sled::Error) -> DbMsgError {
    DbMsgError::storage_with_source(message, e)
}

/// Bundle records in a sled tree
#[derive(Debug, Clone)]
pub struct SledBundleStore {
    db: Arc<sled::Db>,
    records: sled::Tree,
}

impl SledBundleStore {
    /// Open (or create) the database at `path` and the named tree
    pub fn open<P: AsRef<Path>>(path: P, tree: &str) -> Result<Self> {
        info!("Opening bundle store at: {:?}", path.as_ref());

        let db = sled::Config::default()
            .path(path.as_ref())
            .cache_capacity(16 * 1024 * 1024)
            .flush_every_ms(Some(1000))
            .open()
            .map_err(|e| storage_error("Failed to open bundle store", e))?;

        let records = db
            .open_tree(tree)
            .map_err(|e| storage_error("Failed to open bundle record tree", e))?;

        debug!(tree, records = records.len(), "Bundle store ready");
        Ok(Self {
            db: Arc::new(db),
            records,
        })
    }

    /// Open the store described by the `store` configuration section
    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        Self::open(&config.path, &config.tree)
    }

    /// Insert or replace a record.
    ///
    /// A record without a modification time is stamped with the current
    /// time so caches notice the write.
    pub fn upsert(&self, mut record: BundleRecord) -> Result<()> {
        Self::check_storable(&record)?;
        if record.last_modified == 0 {
            record.last_modified = chrono::Utc::now().timestamp_millis();
        }

        let value = serde_json::to_vec(&record)?;
        self.records
            .insert(record_key(&record), value)
            .map_err(|e| storage_error("Failed to write bundle record", e))?;

        debug!(bundle = %record.bundle_name(), key = %record.key, "Stored bundle record");
        Ok(())
    }

    /// Remove a record, returning it if it existed
    pub fn remove(&self, bundle: &BundleName, key: &str) -> Result<Option<BundleRecord>> {
        let mut id = level_prefix(bundle);
        id.extend_from_slice(key.as_bytes());

        let removed = self
            .records
            .remove(id)
            .map_err(|e| storage_error("Failed to remove bundle record", e))?;

        removed
            .map(|bytes| Self::decode(&bytes))
            .transpose()
    }

    /// Every stored record, in key order
    pub fn records(&self) -> Result<Vec<BundleRecord>> {
        let mut records = self
            .records
            .iter()
            .values()
            .map(|value| -> Result<BundleRecord> {
                let bytes = value.map_err(|e| storage_error("Failed to scan bundle records", e))?;
                Self::decode(&bytes)
            })
            .collect::<Result<Vec<_>>>()?;
        records.sort();
        Ok(records)
    }

    /// Import a JSON array of records; nothing is written if any is malformed
    pub fn import_json<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut records: Vec<BundleRecord> = serde_json::from_str(&content)?;

        let now = chrono::Utc::now().timestamp_millis();
        let mut batch = sled::Batch::default();
        for record in &mut records {
            Self::check_storable(record)?;
            if record.last_modified == 0 {
                record.last_modified = now;
            }
            batch.insert(record_key(record), serde_json::to_vec(&*record)?);
        }

        self.records
            .apply_batch(batch)
            .map_err(|e| storage_error("Failed to import bundle records", e))?;

        info!(count = records.len(), path = ?path.as_ref(), "Imported bundle records");
        Ok(records.len())
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| storage_error("Failed to flush bundle store", e))?;
        Ok(())
    }

    fn check_storable(record: &BundleRecord) -> Result<()> {
        record.check_integrity()?;
        let parts = [
            &record.base_name,
            &record.language,
            &record.country,
            &record.variant,
        ];
        if parts.iter().any(|part| part.as_bytes().contains(&SEPARATOR)) {
            return Err(DbMsgError::data_integrity(
                record.composed_name(),
                "NUL byte in bundle identity",
            ));
        }
        Ok(())
    }

    fn decode(bytes: &[u8]) -> Result<BundleRecord> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl ContentLoaderStrategy for SledBundleStore {
    fn load_all(&self, bundle: &BundleName) -> Result<HashMap<String, String>> {
        let mut entries = HashMap::new();

        for item in self.records.scan_prefix(level_prefix(bundle)) {
            let (_, value) =
                item.map_err(|e| storage_error("Failed to load bundle", e))?;
            let record = Self::decode(&value)?;
            if let Err(e) = record.check_integrity() {
                warn!(bundle = %bundle, error = %e, "Malformed record served as stored");
            }
            entries.insert(record.key, record.value);
        }

        Ok(entries)
    }

    fn has_changed_since(&self, bundle: &BundleName, since: i64) -> Result<bool> {
        let locale = bundle.locale();
        let prefix = country_prefix(bundle.basename(), locale.language(), locale.country());

        for item in self.records.scan_prefix(prefix) {
            let (_, value) =
                item.map_err(|e| storage_error("Failed to check bundle for changes", e))?;
            if Self::decode(&value)?.last_modified > since {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
