use std::collections::HashMap;
use std::sync::Mutex;

use crate::pokemon::{Pokemon, Species, TypeRecord};

// Custom error types for cache operations
#[derive(Debug)]
pub enum CacheError {
    LockError(String),
    InvalidKey(String),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::LockError(msg) => write!(f, "Cache lock error: {}", msg),
            CacheError::InvalidKey(key) => write!(f, "Invalid cache key: {}", key),
        }
    }
}

impl std::error::Error for CacheError {}

// Statistics for cache monitoring
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

// Session-lifetime memo store. Entries are only ever added: the universe of
// upstream records is small, so unbounded growth over a session is fine.
// A name key and a URL key for the same logical entity stay distinct entries;
// the duplicate costs one redundant fetch, never a wrong answer.
pub struct Store<T>
where
    T: Clone + Send + Sync,
{
    label: &'static str,
    entries: Mutex<HashMap<String, T>>,
    stats: Mutex<CacheStats>,
}

impl<T> Store<T>
where
    T: Clone + Send + Sync,
{
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: Mutex::new(HashMap::new()),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        if key.is_empty() {
            tracing::warn!("Attempted to get {} cache entry with empty key", self.label);
            return None;
        }

        match self.entries.lock() {
            Ok(entries) => {
                let result = entries.get(key).cloned();
                if let Ok(mut stats) = self.stats.lock() {
                    if result.is_some() {
                        stats.hits += 1;
                    } else {
                        stats.misses += 1;
                    }
                }
                if result.is_some() {
                    tracing::debug!("{} cache hit for key: {}", self.label, key);
                } else {
                    tracing::debug!("{} cache miss for key: {}", self.label, key);
                }
                result
            }
            Err(e) => {
                tracing::error!(
                    "Failed to acquire {} cache read lock for key {}: {}",
                    self.label,
                    key,
                    e
                );
                None
            }
        }
    }

    pub fn insert(&self, key: String, value: T) -> Result<(), CacheError> {
        if key.is_empty() {
            return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
        }

        match self.entries.lock() {
            Ok(mut entries) => {
                let was_present = entries.insert(key.clone(), value).is_some();
                if was_present {
                    tracing::debug!("Updated existing {} cache entry: {}", self.label, key);
                } else {
                    tracing::debug!("Inserted new {} cache entry: {}", self.label, key);
                }
                if let Ok(mut stats) = self.stats.lock() {
                    stats.inserts += 1;
                }
                Ok(())
            }
            Err(e) => {
                let error_msg = format!("Failed to acquire {} cache write lock: {}", self.label, e);
                tracing::error!("{}", error_msg);
                Err(CacheError::LockError(error_msg))
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        match self.entries.lock() {
            Ok(entries) => entries.contains_key(key),
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(entries) => entries.len(),
            Err(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> Option<CacheStats> {
        self.stats.lock().ok().map(|stats| stats.clone())
    }
}

// The three independent lookup namespaces. One instance is constructed per
// session and handed to the client as a dependency, so resolvers can be
// tested against a fresh cache.
pub struct LookupCache {
    pub species: Store<Species>,
    pub variants: Store<Pokemon>,
    pub types: Store<TypeRecord>,
}

impl LookupCache {
    pub fn new() -> Self {
        tracing::info!("Initializing session lookup cache (species, variants, types)");
        Self {
            species: Store::new("species"),
            variants: Store::new("variant"),
            types: Store::new("type"),
        }
    }
}

impl Default for LookupCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_basic_operations() {
        let store: Store<String> = Store::new("test");
        let payload = r#"{"id": 25, "name": "pikachu"}"#.to_string();

        assert!(store.insert("pikachu".to_string(), payload.clone()).is_ok());

        let retrieved = store.get("pikachu");
        assert!(retrieved.is_some());
        assert!(retrieved.unwrap().contains("pikachu"));

        assert!(store.get("bulbasaur").is_none());
    }

    #[test]
    fn test_invalid_key_rejected() {
        let store: Store<String> = Store::new("test");

        assert!(store.insert("".to_string(), "value".to_string()).is_err());
        assert!(store.get("").is_none());
    }

    #[test]
    fn test_distinct_key_spellings_are_distinct_entries() {
        let store: Store<i32> = Store::new("test");

        store.insert("ditto".to_string(), 132).unwrap();
        store
            .insert("https://pokeapi.co/api/v2/pokemon/132/".to_string(), 132)
            .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("ditto"), Some(132));
        assert_eq!(store.get("https://pokeapi.co/api/v2/pokemon/132/"), Some(132));
    }

    #[test]
    fn test_stats_track_hits_and_misses() {
        let store: Store<i32> = Store::new("test");
        store.insert("one".to_string(), 1).unwrap();

        assert!(store.get("one").is_some());
        assert!(store.get("two").is_none());
        assert!(store.get("one").is_some());

        let stats = store.stats().unwrap();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.inserts, 1);
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_namespaces_are_independent() {
        let cache = LookupCache::new();
        assert!(cache.species.is_empty());
        assert!(cache.variants.is_empty());
        assert!(cache.types.is_empty());
        assert!(!cache.species.contains_key("charizard"));
    }
}
