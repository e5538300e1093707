//! In-process signal cache adapter.
//!
//! The cache is the seam between the upstream collectors (writers, out of
//! scope) and the brief pipeline (reader, plus writer of its own `brief:*`
//! keys). Entries carry two lifetimes: a short in-process TTL that drives the
//! freshness flag, and an optional longer retention in a backing store so an
//! expensive brief survives a process restart.

use crate::error::{Result, SitrepError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Memory TTL applied when an entry is re-seeded from the backing store.
/// Long enough to bridge until the collectors repopulate the key.
const RESTORE_BRIDGE_TTL: Duration = Duration::from_secs(15 * 60);

/// Remote retention behind the dual-lifetime write. The store itself
/// (Redis or similar) is an external collaborator; only this contract is ours.
#[async_trait]
pub trait BackingStore: Send + Sync {
    async fn put(&self, key: &str, value: &Value, retention: Duration) -> Result<()>;
    async fn fetch(&self, key: &str) -> Result<Option<Value>>;
}

struct Entry {
    value: Value,
    set_at: Instant,
    ttl: Duration,
}

/// Keyed store of typed collections with per-entry freshness.
///
/// Reads return stale data rather than nothing: a brief built from aged
/// signal beats no brief, and the confidence scorer reports the staleness.
pub struct SignalCache {
    entries: Mutex<HashMap<String, Entry>>,
    backing: Option<Box<dyn BackingStore>>,
}

impl Default for SignalCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            backing: None,
        }
    }

    pub fn with_backing(backing: Box<dyn BackingStore>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            backing: Some(backing),
        }
    }

    /// Typed read. Returns the entry even past its TTL; use [`is_fresh`]
    /// to distinguish. Entries that fail to deserialize read as absent.
    ///
    /// [`is_fresh`]: SignalCache::is_fresh
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let entry = entries.get(key)?;
        match serde_json::from_value(entry.value.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("cache entry '{}' failed to deserialize: {}", key, e);
                None
            }
        }
    }

    pub fn has(&self, key: &str) -> bool {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.contains_key(key)
    }

    /// Whether the entry exists and its age is still inside its TTL.
    pub fn is_fresh(&self, key: &str) -> bool {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .map(|e| e.set_at.elapsed() < e.ttl)
            .unwrap_or(false)
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        match serde_json::to_value(value) {
            Ok(v) => self.set_raw(key, v, ttl),
            Err(e) => log::error!("cache write for '{}' failed to serialize: {}", key, e),
        }
    }

    fn set_raw(&self, key: &str, value: Value, ttl: Duration) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key.to_string(),
            Entry {
                value,
                set_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Dual-lifetime write: memory TTL plus longer backing-store retention.
    /// A backing-store failure is logged and swallowed; the memory write
    /// has already happened and remains authoritative for this process.
    pub async fn set_with_backing<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
        retention: Duration,
    ) {
        let json = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                log::error!("cache write for '{}' failed to serialize: {}", key, e);
                return;
            }
        };
        self.set_raw(key, json.clone(), ttl);
        if let Some(backing) = &self.backing {
            if let Err(e) = backing.put(key, &json, retention).await {
                log::warn!("backing-store write for '{}' failed: {}", key, e);
            }
        }
    }

    /// Memory first, then the backing store. A restored entry is re-seeded
    /// into memory with a bridge TTL so repeated reads stay local.
    pub async fn get_or_restore<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if let Some(v) = self.get::<T>(key) {
            return Some(v);
        }
        let backing = self.backing.as_ref()?;
        match backing.fetch(key).await {
            Ok(Some(json)) => {
                log::info!("restored '{}' from backing store", key);
                self.set_raw(key, json.clone(), RESTORE_BRIDGE_TTL);
                serde_json::from_value(json).ok()
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("backing-store read for '{}' failed: {}", key, e);
                None
            }
        }
    }
}

/// Test/demo backing store kept in memory. Retention is recorded but not
/// enforced; eviction is the real store's concern.
#[derive(Default)]
pub struct MemoryBackingStore {
    entries: Mutex<HashMap<String, Value>>,
    fail_writes: bool,
}

impl MemoryBackingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            fail_writes: true,
        }
    }
}

#[async_trait]
impl BackingStore for MemoryBackingStore {
    async fn put(&self, key: &str, value: &Value, _retention: Duration) -> Result<()> {
        if self.fail_writes {
            return Err(SitrepError::BackingStore("store unavailable".into()));
        }
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn fetch(&self, key: &str) -> Result<Option<Value>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_stale_entries() {
        let cache = SignalCache::new();
        cache.set("k", &vec![1, 2, 3], Duration::ZERO);
        assert!(!cache.is_fresh("k"), "zero TTL must read as stale");
        assert_eq!(cache.get::<Vec<i32>>("k"), Some(vec![1, 2, 3]));
    }

    #[test]
    fn is_fresh_within_ttl() {
        let cache = SignalCache::new();
        cache.set("k", &"v", Duration::from_secs(60));
        assert!(cache.is_fresh("k"));
        assert!(cache.has("k"));
        assert!(!cache.has("missing"));
        assert!(!cache.is_fresh("missing"));
    }

    #[test]
    fn get_wrong_type_reads_as_absent() {
        let cache = SignalCache::new();
        cache.set("k", &"a string", Duration::from_secs(60));
        assert_eq!(cache.get::<Vec<u64>>("k"), None);
    }

    #[tokio::test]
    async fn dual_write_lands_in_both_stores() {
        let cache = SignalCache::with_backing(Box::new(MemoryBackingStore::new()));
        cache
            .set_with_backing("k", &42u64, Duration::from_secs(60), Duration::from_secs(600))
            .await;
        assert_eq!(cache.get::<u64>("k"), Some(42));

        // New cache sharing nothing in memory, same backing contents
        let backing = MemoryBackingStore::new();
        backing
            .put("k", &serde_json::json!(42), Duration::from_secs(600))
            .await
            .unwrap();
        let restarted = SignalCache::with_backing(Box::new(backing));
        assert_eq!(restarted.get::<u64>("k"), None);
        assert_eq!(restarted.get_or_restore::<u64>("k").await, Some(42));
        // Restored entry is now served from memory
        assert_eq!(restarted.get::<u64>("k"), Some(42));
    }

    #[tokio::test]
    async fn backing_failure_keeps_memory_write() {
        let cache = SignalCache::with_backing(Box::new(MemoryBackingStore::failing()));
        cache
            .set_with_backing("k", &7u64, Duration::from_secs(60), Duration::from_secs(600))
            .await;
        assert_eq!(cache.get::<u64>("k"), Some(7));
    }
}
