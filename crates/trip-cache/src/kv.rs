//! Key-Value store wrapper with automatic serialization.

use crate::CacheError;
use parking_lot::RwLock;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Type-safe key-value cache.
///
/// Values are stored as JSON. An in-memory cache lives as long as the
/// process; a file-backed cache rewrites its JSON file after every change.
/// Clones share the same entries.
#[derive(Debug, Clone)]
pub struct Cache {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    entries: RwLock<BTreeMap<String, serde_json::Value>>,
    path: Option<PathBuf>,
}

impl Cache {
    /// A cache that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: RwLock::new(BTreeMap::new()),
                path: None,
            }),
        }
    }

    /// Open a file-backed cache, creating it on first write.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let cache = Cache::open("~/.local/share/trip/storage.json")?;
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| CacheError::OpenError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| CacheError::OpenError {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            inner: Arc::new(Inner {
                entries: RwLock::new(entries),
                path: Some(path),
            }),
        })
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let dates: Option<BookingDate> = cache.get("booking-date:A1")?;
    /// ```
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let entries = self.inner.entries.read();
        match entries.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value.clone())?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let value = serde_json::to_value(value)?;
        let mut entries = self.inner.entries.write();
        let previous = entries.insert(key.to_string(), value);
        self.persist(&entries).inspect_err(|_| match previous {
            Some(previous) => {
                entries.insert(key.to_string(), previous);
            }
            None => {
                entries.remove(key);
            }
        })
    }

    /// Delete a value from the cache. Deleting a missing key is not an error.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut entries = self.inner.entries.write();
        if let Some(previous) = entries.remove(key) {
            self.persist(&entries).inspect_err(|_| {
                entries.insert(key.to_string(), previous);
            })?;
        }
        Ok(())
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> bool {
        self.inner.entries.read().contains_key(key)
    }

    fn persist(&self, entries: &BTreeMap<String, serde_json::Value>) -> Result<(), CacheError> {
        let Some(path) = &self.inner.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CacheError::StoreError(e.to_string()))?;
        }

        let content = serde_json::to_vec_pretty(entries)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| CacheError::StoreError(e.to_string()))?;
        std::fs::rename(&tmp, path).map_err(|e| CacheError::StoreError(e.to_string()))?;

        tracing::trace!(path = %path.display(), entries = entries.len(), "cache persisted");
        Ok(())
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust
/// let key = trip_cache::cache_key!("booking-date", "A1");
/// assert_eq!(key, "booking-date:A1");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}
