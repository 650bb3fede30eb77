//! Bundle cache with per-level TTL revalidation
//!
//! Every fallback level (`messages_en_US`, `messages_en`, `messages`) owns an
//! independent slot. A slot is served as-is while its TTL holds; once it
//! expires the store is asked whether anything changed since the slot was
//! loaded, and the slot is either re-stamped or replaced by a fresh load.
//! Slots are swapped whole, so readers never see a half-updated bundle.

use crate::clock::Clock;
use crate::locale::Locale;
use crate::record::BundleName;
use crate::strategy::ContentLoaderStrategy;
use arc_swap::ArcSwap;
use dashmap::DashMap;
use dbmsg_common::{CacheDuration, DbMsgError, Result};
use std::collections::HashMap;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// Revalidation and fallback settings of a cache
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CachePolicy {
    /// How long a slot is served before the store is consulted
    pub cache_duration: CacheDuration,
    /// Whether to search the default locale when the requested one has nothing
    pub fallback_to_default_locale: bool,
    /// Locale searched when falling back
    pub default_locale: Option<Locale>,
}

/// One loaded fallback level
#[derive(Debug, Clone)]
pub struct CachedBundle {
    name: BundleName,
    entries: Arc<HashMap<String, String>>,
    loaded_at: i64,
}

impl CachedBundle {
    fn new(name: BundleName, entries: HashMap<String, String>, loaded_at: i64) -> Self {
        Self {
            name,
            entries: Arc::new(entries),
            loaded_at,
        }
    }

    /// Same entries, new load timestamp
    fn restamped(&self, loaded_at: i64) -> Self {
        Self {
            name: self.name.clone(),
            entries: Arc::clone(&self.entries),
            loaded_at,
        }
    }

    /// The level this bundle was loaded for
    pub const fn name(&self) -> &BundleName {
        &self.name
    }

    /// Loaded key/value pairs
    pub fn entries(&self) -> &HashMap<String, String> {
        &self.entries
    }

    /// When the entries were last confirmed current, epoch milliseconds
    pub const fn loaded_at(&self) -> i64 {
        self.loaded_at
    }
}

/// Cache counters
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    loads: AtomicU64,
    revalidations: AtomicU64,
    reloads: AtomicU64,
    storage_errors: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStatsSnapshot {
    /// Slots served without touching the store
    pub hits: u64,
    /// `load_all` calls
    pub loads: u64,
    /// `has_changed_since` calls
    pub revalidations: u64,
    /// Loads caused by a detected (or assumed) change
    pub reloads: u64,
    /// Store failures swallowed by the cache
    pub storage_errors: u64,
}

impl CacheStats {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current counter values
    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            revalidations: self.revalidations.load(Ordering::Relaxed),
            reloads: self.reloads.load(Ordering::Relaxed),
            storage_errors: self.storage_errors.load(Ordering::Relaxed),
        }
    }
}

/// Locale-aware bundle cache over a [`ContentLoaderStrategy`]
pub struct BundleCache {
    loader: Arc<dyn ContentLoaderStrategy>,
    policy: ArcSwap<CachePolicy>,
    clock: Arc<dyn Clock>,
    slots: DashMap<BundleName, Arc<CachedBundle>>,
    stats: CacheStats,
}

impl fmt::Debug for BundleCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BundleCache")
            .field("policy", &self.policy.load_full())
            .field("slots", &self.slots.len())
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}

impl BundleCache {
    /// Create an empty cache
    pub fn new(
        loader: Arc<dyn ContentLoaderStrategy>,
        policy: CachePolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            loader,
            policy: ArcSwap::from_pointee(policy),
            clock,
            slots: DashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Merged key/value pairs for `basename` in `locale`.
    ///
    /// More specific levels win on key collisions. Fails with `NotFound`
    /// when no level of the chain has any entry. Store failures never
    /// surface here.
    #[instrument(level = "debug", skip(self, locale), fields(locale = %locale))]
    pub fn resolve(&self, basename: &str, locale: &Locale) -> Result<HashMap<String, String>> {
        let mut merged = HashMap::new();
        self.walk(basename, locale, |bundle| {
            for (key, value) in bundle.entries() {
                merged
                    .entry(key.clone())
                    .or_insert_with(|| value.clone());
            }
            ControlFlow::Continue(())
        })?;
        Ok(merged)
    }

    /// Value of `key` from the most specific level that has it.
    ///
    /// Levels after the first hit are not consulted. `Ok(None)` means the
    /// bundle exists but lacks the key.
    pub fn find(&self, basename: &str, locale: &Locale, key: &str) -> Result<Option<String>> {
        let mut found = None;
        self.walk(basename, locale, |bundle| match bundle.entries().get(key) {
            Some(value) => {
                found = Some(value.clone());
                ControlFlow::Break(())
            }
            None => ControlFlow::Continue(()),
        })?;
        Ok(found)
    }

    /// Visit non-empty levels from most to least specific.
    ///
    /// Requested locale levels first, then the default locale levels if the
    /// requested ones were all empty and fallback is on, then the root.
    /// Each level is visited at most once per walk, and an empty level never
    /// stops the search.
    fn walk<F>(&self, basename: &str, locale: &Locale, mut visit: F) -> Result<()>
    where
        F: FnMut(&CachedBundle) -> ControlFlow<()>,
    {
        let policy = self.policy.load_full();
        let mut found = false;

        let requested = locale.candidates();
        for candidate in &requested {
            let name = BundleName::new(basename, candidate.clone());
            if self.visit_level(&name, &mut found, &mut visit).is_break() {
                return Ok(());
            }
        }

        if !found && policy.fallback_to_default_locale {
            if let Some(default) = policy.default_locale.as_ref().filter(|d| *d != locale) {
                debug!(basename, requested = %locale, fallback = %default, "Falling back to default locale");
                // Levels shared with the requested chain were already visited
                let fresh = default
                    .candidates()
                    .into_iter()
                    .filter(|candidate| !requested.contains(candidate));
                for candidate in fresh {
                    let name = BundleName::new(basename, candidate);
                    if self.visit_level(&name, &mut found, &mut visit).is_break() {
                        return Ok(());
                    }
                }
            }
        }

        let root = BundleName::root(basename);
        if self.visit_level(&root, &mut found, &mut visit).is_break() {
            return Ok(());
        }

        if found {
            Ok(())
        } else {
            Err(DbMsgError::not_found(basename, locale.tag()))
        }
    }

    fn visit_level<F>(&self, name: &BundleName, found: &mut bool, visit: &mut F) -> ControlFlow<()>
    where
        F: FnMut(&CachedBundle) -> ControlFlow<()>,
    {
        match self.level(name) {
            Some(bundle) if !bundle.entries().is_empty() => {
                *found = true;
                visit(&bundle)
            }
            _ => ControlFlow::Continue(()),
        }
    }

    /// Current bundle of one level, loading or revalidating as needed
    fn level(&self, name: &BundleName) -> Option<Arc<CachedBundle>> {
        let now = self.clock.now_millis();
        // The shard guard must be gone before the loader runs
        let cached = self.slots.get(name).map(|slot| Arc::clone(slot.value()));

        match cached {
            None => self.load(name, now, None),
            Some(bundle) => {
                let ttl = self.policy.load().cache_duration;
                if ttl.is_expired(bundle.loaded_at(), now) {
                    self.revalidate(name, bundle, now)
                } else {
                    CacheStats::bump(&self.stats.hits);
                    Some(bundle)
                }
            }
        }
    }

    fn revalidate(
        &self,
        name: &BundleName,
        bundle: Arc<CachedBundle>,
        now: i64,
    ) -> Option<Arc<CachedBundle>> {
        CacheStats::bump(&self.stats.revalidations);

        let changed = match self.loader.has_changed_since(name, bundle.loaded_at()) {
            Ok(changed) => changed,
            Err(e) => {
                CacheStats::bump(&self.stats.storage_errors);
                error!(bundle = %name, error = %e, "Change check failed, reloading");
                true
            }
        };

        if changed {
            CacheStats::bump(&self.stats.reloads);
            return self.load(name, now, Some(bundle));
        }

        let restamped = Arc::new(bundle.restamped(now));
        self.slots.insert(name.clone(), Arc::clone(&restamped));
        Some(restamped)
    }

    /// Load a level and swap it in; on failure keep `previous`
    fn load(
        &self,
        name: &BundleName,
        now: i64,
        previous: Option<Arc<CachedBundle>>,
    ) -> Option<Arc<CachedBundle>> {
        CacheStats::bump(&self.stats.loads);

        match self.loader.load_all(name) {
            Ok(entries) => {
                debug!(bundle = %name, entries = entries.len(), "Loaded bundle");
                let bundle = Arc::new(CachedBundle::new(name.clone(), entries, now));
                self.slots.insert(name.clone(), Arc::clone(&bundle));
                Some(bundle)
            }
            Err(e) => {
                CacheStats::bump(&self.stats.storage_errors);
                error!(bundle = %name, error = %e, "Failed to load bundle");
                if previous.is_some() {
                    warn!(bundle = %name, "Serving last known good bundle");
                }
                previous
            }
        }
    }

    /// The cached bundle of one level, without touching the store
    pub fn cached(&self, name: &BundleName) -> Option<Arc<CachedBundle>> {
        self.slots.get(name).map(|slot| Arc::clone(slot.value()))
    }

    /// Drop every slot
    pub fn clear(&self) {
        self.slots.clear();
        debug!("Cleared bundle cache");
    }

    /// Drop every slot of one basename
    pub fn invalidate(&self, basename: &str) {
        self.slots.retain(|name, _| name.basename() != basename);
        debug!(basename, "Invalidated bundle slots");
    }

    /// Number of cached levels
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Current revalidation settings
    pub fn policy(&self) -> Arc<CachePolicy> {
        self.policy.load_full()
    }

    /// Change the cache duration; applies to the next access of every slot
    pub fn set_cache_duration(&self, cache_duration: CacheDuration) {
        self.policy.rcu(|current| CachePolicy {
            cache_duration,
            ..CachePolicy::clone(current)
        });
        debug!(%cache_duration, "Cache duration changed");
    }

    /// Counter snapshot
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }
}
