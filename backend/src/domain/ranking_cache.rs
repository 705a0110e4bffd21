//! Bounded, time-limited cache for leaderboard data.
//!
//! Entries are keyed by ranking view and normalized search term. An entry is
//! fresh for `ttl` after it was first stored; reading a stale entry drops
//! it. When the cache is full, stale entries are purged first and then the
//! oldest entry is evicted, so `len() <= capacity` always holds.

use parking_lot::Mutex;
use shared::RankingView;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RankingCacheKey {
    pub view: RankingView,
    pub search: String,
}

impl RankingCacheKey {
    pub fn new(view: RankingView, search: &str) -> Self {
        Self {
            view,
            search: normalize_search(search),
        }
    }
}

/// Trim and lowercase a search term so equivalent searches share an entry
pub fn normalize_search(search: &str) -> String {
    search.trim().to_lowercase()
}

struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

pub struct RankingCache<V> {
    entries: Mutex<HashMap<RankingCacheKey, CacheEntry<V>>>,
    capacity: usize,
    ttl: Duration,
}

impl<V: Clone> RankingCache<V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            ttl,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh value for `key`, if any
    pub fn get(&self, key: &RankingCacheKey) -> Option<V> {
        let mut entries = self.entries.lock();
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if self.is_fresh(entry, now) => Some(entry.value.clone()),
            Some(_) => {
                debug!("Ranking cache entry expired: {:?}", key);
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `value`, replacing any previous entry and restarting its TTL
    pub fn insert(&self, key: RankingCacheKey, value: V) {
        let mut entries = self.entries.lock();
        let now = Instant::now();
        if !entries.contains_key(&key) {
            self.make_room(&mut entries, now);
        }
        entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: now,
            },
        );
    }

    /// Modify the fresh entry for `key` in place, keeping its original
    /// insertion time, or start a new entry from `init` when there is none.
    pub fn upsert_with<I, F>(&self, key: RankingCacheKey, init: I, update: F) -> V
    where
        I: FnOnce() -> V,
        F: FnOnce(&mut V),
    {
        let mut entries = self.entries.lock();
        let now = Instant::now();

        let stale = entries
            .get(&key)
            .map(|entry| !self.is_fresh(entry, now))
            .unwrap_or(false);
        if stale {
            entries.remove(&key);
        }
        if !entries.contains_key(&key) {
            self.make_room(&mut entries, now);
        }

        let entry = entries.entry(key).or_insert_with(|| CacheEntry {
            value: init(),
            inserted_at: now,
        });
        update(&mut entry.value);
        entry.value.clone()
    }

    pub fn invalidate(&self, key: &RankingCacheKey) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    /// Drop every entry of one view; returns how many were dropped
    pub fn invalidate_view(&self, view: RankingView) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|key, _| key.view != view);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every stale entry; returns how many were dropped
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock();
        self.purge_locked(&mut entries, Instant::now())
    }

    fn is_fresh(&self, entry: &CacheEntry<V>, now: Instant) -> bool {
        now.duration_since(entry.inserted_at) < self.ttl
    }

    fn purge_locked(&self, entries: &mut HashMap<RankingCacheKey, CacheEntry<V>>, now: Instant) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.inserted_at) < self.ttl);
        before - entries.len()
    }

    fn make_room(&self, entries: &mut HashMap<RankingCacheKey, CacheEntry<V>>, now: Instant) {
        if entries.len() < self.capacity {
            return;
        }
        let purged = self.purge_locked(entries, now);
        if purged > 0 {
            debug!("Purged {} stale ranking cache entries", purged);
        }

        while entries.len() >= self.capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    debug!("Evicting ranking cache entry: {:?}", key);
                    entries.remove(&key);
                }
                None => break,
            }
        }
    }
}
