use super::metrics::{CacheMetrics, CacheStats};
use lru::LruCache;
use reflector_dns_application::ports::{AnswerCache, CachedAnswers};
use reflector_dns_domain::{DomainError, QueryKey};
use rustc_hash::FxBuildHasher;
use std::num::NonZeroUsize;
use std::sync::atomic::Ordering;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Invoked with the key and answers of every entry leaving the cache other
/// than by overwrite. Runs under the cache lock: it must be fast and must not
/// call back into the cache.
pub type EvictionCallback = Box<dyn Fn(&QueryKey, &CachedAnswers) + Send + Sync>;

struct CacheEntry {
    answers: CachedAnswers,
    inserted_at: Instant,
}

impl CacheEntry {
    fn is_stale(&self, max_age: Option<Duration>, now: Instant) -> bool {
        max_age.is_some_and(|age| now.duration_since(self.inserted_at) >= age)
    }
}

type Entries = LruCache<QueryKey, CacheEntry, FxBuildHasher>;

/// Fixed-capacity LRU map from Query Identity to answer records.
///
/// A single mutex guards the whole map. `get` updates recency; `peek` and
/// `contains` do not. When a maximum age is configured, `get` treats stale
/// entries as misses and drops them, and `remove_stale` sweeps the rest.
/// Capacity is a hard bound either way.
pub struct LruAnswerCache {
    entries: Mutex<Entries>,
    max_age: Option<Duration>,
    on_evict: Option<EvictionCallback>,
    metrics: CacheMetrics,
}

impl LruAnswerCache {
    pub fn new(capacity: usize) -> Result<Self, DomainError> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            DomainError::ConfigurationInvalid("cache capacity must be greater than 0".to_string())
        })?;

        info!(capacity = capacity.get(), "Initializing answer cache");

        Ok(Self {
            entries: Mutex::new(LruCache::with_hasher(capacity, FxBuildHasher)),
            max_age: None,
            on_evict: None,
            metrics: CacheMetrics::default(),
        })
    }

    /// Entries older than `max_age` are treated as absent. `None` disables
    /// staleness expiry.
    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age.filter(|age| !age.is_zero());
        self
    }

    pub fn with_eviction_callback<F>(mut self, callback: F) -> Self
    where
        F: Fn(&QueryKey, &CachedAnswers) + Send + Sync + 'static,
    {
        self.on_evict = Some(Box::new(callback));
        self
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn evicted(&self, key: &QueryKey, entry: &CacheEntry) {
        if let Some(callback) = &self.on_evict {
            callback(key, &entry.answers);
        }
    }

    /// Returns the answers for `key` and marks it most recently used.
    pub fn get(&self, key: &QueryKey) -> Option<CachedAnswers> {
        let mut entries = self.lock();

        match entries.get(key) {
            Some(entry) if !entry.is_stale(self.max_age, Instant::now()) => {
                self.metrics.record_hit();
                return Some(entry.answers.clone());
            }
            Some(_) => {}
            None => {
                self.metrics.record_miss();
                return None;
            }
        }

        if let Some((key, entry)) = entries.pop_entry(key) {
            debug!(key = %key, "Dropping stale cache entry");
            self.evicted(&key, &entry);
            self.metrics.record_evictions(1);
        }
        self.metrics.record_miss();
        None
    }

    /// Inserts or overwrites `key`, marking it most recently used. Returns
    /// `true` when the insert pushed out the least recently used entry.
    pub fn add(&self, key: QueryKey, answers: CachedAnswers) -> bool {
        self.add_with_evicted(key, answers).is_some()
    }

    /// Like [`add`](Self::add), but reports which key was evicted.
    pub fn add_with_evicted(&self, key: QueryKey, answers: CachedAnswers) -> Option<QueryKey> {
        let entry = CacheEntry {
            answers,
            inserted_at: Instant::now(),
        };

        let mut entries = self.lock();
        self.metrics.record_insertion();

        if entries.contains(&key) {
            entries.put(key, entry);
            return None;
        }

        let (evicted_key, evicted_entry) = entries.push(key, entry)?;
        self.evicted(&evicted_key, &evicted_entry);
        self.metrics.record_evictions(1);
        Some(evicted_key)
    }

    /// Reads without touching recency or staleness.
    pub fn peek(&self, key: &QueryKey) -> Option<CachedAnswers> {
        self.lock().peek(key).map(|entry| entry.answers.clone())
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().contains(key)
    }

    pub fn remove(&self, key: &QueryKey) -> Option<CachedAnswers> {
        let mut entries = self.lock();
        let (key, entry) = entries.pop_entry(key)?;
        self.evicted(&key, &entry);
        self.metrics.record_evictions(1);
        Some(entry.answers)
    }

    pub fn remove_oldest(&self) -> Option<(QueryKey, CachedAnswers)> {
        let mut entries = self.lock();
        let (key, entry) = entries.pop_lru()?;
        self.evicted(&key, &entry);
        self.metrics.record_evictions(1);
        Some((key, entry.answers))
    }

    pub fn get_oldest(&self) -> Option<(QueryKey, CachedAnswers)> {
        self.lock()
            .peek_lru()
            .map(|(key, entry)| (key.clone(), entry.answers.clone()))
    }

    /// Resident keys, oldest first.
    pub fn keys(&self) -> Vec<QueryKey> {
        self.lock().iter().rev().map(|(key, _)| key.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    pub fn purge(&self) {
        let mut entries = self.lock();
        let mut removed = 0;
        while let Some((key, entry)) = entries.pop_lru() {
            self.evicted(&key, &entry);
            removed += 1;
        }
        self.metrics.record_evictions(removed);
    }

    /// Changes the capacity, evicting least recently used entries until the
    /// new bound holds. Returns how many were evicted.
    pub fn resize(&self, capacity: NonZeroUsize) -> usize {
        let mut entries = self.lock();
        let mut removed = 0;
        while entries.len() > capacity.get() {
            match entries.pop_lru() {
                Some((key, entry)) => {
                    self.evicted(&key, &entry);
                    removed += 1;
                }
                None => break,
            }
        }
        entries.resize(capacity);
        self.metrics.record_evictions(removed);

        if removed > 0 {
            info!(capacity = capacity.get(), evicted = removed, "Answer cache resized");
        }
        removed
    }

    /// Drops every entry older than the configured maximum age.
    pub fn remove_stale(&self) -> usize {
        let Some(max_age) = self.max_age else {
            return 0;
        };

        let now = Instant::now();
        let mut entries = self.lock();
        let stale: Vec<QueryKey> = entries
            .iter()
            .filter(|(_, entry)| entry.is_stale(Some(max_age), now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &stale {
            if let Some((key, entry)) = entries.pop_entry(key) {
                self.evicted(&key, &entry);
            }
        }
        self.metrics.record_evictions(stale.len());
        stale.len()
    }

    pub fn stats(&self) -> CacheStats {
        let (len, capacity) = {
            let entries = self.lock();
            (entries.len(), entries.cap().get())
        };

        CacheStats {
            len,
            capacity,
            hits: self.metrics.hits.load(Ordering::Relaxed),
            misses: self.metrics.misses.load(Ordering::Relaxed),
            insertions: self.metrics.insertions.load(Ordering::Relaxed),
            evictions: self.metrics.evictions.load(Ordering::Relaxed),
        }
    }
}

impl AnswerCache for LruAnswerCache {
    fn get(&self, key: &QueryKey) -> Option<CachedAnswers> {
        LruAnswerCache::get(self, key)
    }

    fn add(&self, key: QueryKey, answers: CachedAnswers) -> bool {
        LruAnswerCache::add(self, key, answers)
    }

    fn len(&self) -> usize {
        LruAnswerCache::len(self)
    }
}
