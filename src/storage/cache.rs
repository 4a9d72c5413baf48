// Memoization cache for query results
// Author: Gabriel Demetrios Lafis

use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;
use std::time::{Duration, Instant};

use super::StorageError;

/// Default number of entries a handler keeps
pub const DEFAULT_CAPACITY: usize = 64;

/// Cache entry with expiration
struct CacheEntry<V> {
    value: V,
    expires_at: Option<Instant>,
}

struct CacheState<V> {
    entries: HashMap<String, CacheEntry<V>>,
    order: VecDeque<String>,
}

/// Bounded cache of computed results keyed by method and arguments.
///
/// When full, the oldest inserted key is evicted first.
pub struct QueryCache<V> {
    state: RwLock<CacheState<V>>,
    capacity: usize,
    default_ttl: Option<Duration>,
}

impl<V: Clone> QueryCache<V> {
    /// Create a cache with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a cache holding at most `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        QueryCache {
            state: RwLock::new(CacheState {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity,
            default_ttl: None,
        }
    }

    /// Set the default time-to-live for cache entries
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = Some(ttl);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cached value for `key`, if present and not expired
    pub fn get(&self, key: &str) -> Result<Option<V>, StorageError> {
        let state = self.state.read().map_err(|_| StorageError::Poisoned)?;
        let now = Instant::now();

        Ok(state
            .entries
            .get(key)
            .filter(|entry| entry.expires_at.map_or(true, |expires| expires > now))
            .map(|entry| entry.value.clone()))
    }

    /// Store a value, evicting the oldest entry when full
    pub fn insert(&self, key: &str, value: V) -> Result<(), StorageError> {
        if self.capacity == 0 {
            return Ok(());
        }

        let mut state = self.state.write().map_err(|_| StorageError::Poisoned)?;
        let expires_at = self.default_ttl.and_then(|ttl| Instant::now().checked_add(ttl));

        if state.entries.contains_key(key) {
            state.order.retain(|k| k != key);
        }
        while state.order.len() >= self.capacity {
            match state.order.pop_front() {
                Some(oldest) => {
                    state.entries.remove(&oldest);
                }
                None => break,
            }
        }

        state.order.push_back(key.to_string());
        state.entries.insert(key.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }

    /// Cached value for `key`, computing and storing it on a miss.
    ///
    /// A poisoned lock degrades to computing without caching.
    pub fn get_or_insert_with<F>(&self, key: &str, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Ok(Some(value)) = self.get(key) {
            return value;
        }

        let value = compute();
        let _ = self.insert(key, value.clone());
        value
    }

    /// Fallible variant of [`QueryCache::get_or_insert_with`]; errors are not cached
    pub fn try_get_or_insert_with<F, E>(&self, key: &str, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Ok(Some(value)) = self.get(key) {
            return Ok(value);
        }

        let value = compute()?;
        let _ = self.insert(key, value.clone());
        Ok(value)
    }

    /// Clear expired entries from the cache
    pub fn clear_expired(&self) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| StorageError::Poisoned)?;

        let now = Instant::now();
        state
            .entries
            .retain(|_, entry| entry.expires_at.map_or(true, |expires| expires > now));
        let CacheState { entries, order } = &mut *state;
        order.retain(|k| entries.contains_key(k));

        Ok(())
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.state.read().map_or(0, |state| state.entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_memoizes() {
        let cache = QueryCache::new();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            42
        };

        assert_eq!(cache.get_or_insert_with("corona_results()", compute), 42);
        assert_eq!(cache.get_or_insert_with("corona_results()", compute), 42);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_evicts_oldest() {
        let cache = QueryCache::with_capacity(2);
        cache.insert("a", 1).unwrap();
        cache.insert("b", 2).unwrap();
        cache.insert("c", 3).unwrap();

        assert_eq!(cache.get("a").unwrap(), None);
        assert_eq!(cache.get("b").unwrap(), Some(2));
        assert_eq!(cache.get("c").unwrap(), Some(3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_reinsert_does_not_grow() {
        let cache = QueryCache::with_capacity(2);
        cache.insert("a", 1).unwrap();
        cache.insert("a", 2).unwrap();
        cache.insert("b", 3).unwrap();

        assert_eq!(cache.get("a").unwrap(), Some(2));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = QueryCache::new().with_ttl(Duration::from_millis(0));
        cache.insert("a", 1).unwrap();
        assert_eq!(cache.get("a").unwrap(), None);

        cache.clear_expired().unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_capacity_never_stores() {
        let cache = QueryCache::with_capacity(0);
        cache.insert("a", 1).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache: QueryCache<i32> = QueryCache::new();
        let failed: Result<i32, &str> = cache.try_get_or_insert_with("k", || Err("bad"));
        assert!(failed.is_err());
        assert_eq!(cache.try_get_or_insert_with::<_, &str>("k", || Ok(5)), Ok(5));
    }
}
