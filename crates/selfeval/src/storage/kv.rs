//! Raw key-value backends.
//!
//! The survey store keeps whole JSON documents under a handful of keys, the
//! way a browser's local storage would. This module defines the backend
//! capability and an in-memory implementation used by tests.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::{Error, Result};

/// A synchronous string key-value area.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Returns `true` if a value was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<bool>;
}

/// In-memory key-value area with an optional size quota.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: RefCell<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryKv {
    /// Create an empty, unlimited store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes once the total size of all
    /// values would exceed `quota_bytes`.
    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RefCell::new(BTreeMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn used_bytes(&self) -> usize {
        self.entries.borrow().values().map(String::len).sum()
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if let Some(limit) = self.quota_bytes {
            let current = self.entries.borrow().get(key).map_or(0, String::len);
            let after = self.used_bytes() - current + value.len();
            if after > limit {
                return Err(Error::QuotaExceeded {
                    key: key.to_string(),
                    limit,
                });
            }
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.entries.borrow_mut().remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_set_get_remove() {
        let kv = MemoryKv::new();
        assert_eq!(kv.get("a").unwrap(), None);

        kv.set("a", "1").unwrap();
        assert_eq!(kv.get("a").unwrap(), Some("1".to_string()));

        kv.set("a", "2").unwrap();
        assert_eq!(kv.get("a").unwrap(), Some("2".to_string()));

        assert!(kv.remove("a").unwrap());
        assert!(!kv.remove("a").unwrap());
        assert_eq!(kv.get("a").unwrap(), None);
    }

    #[test]
    fn test_memory_quota_rejects_oversized_write() {
        let kv = MemoryKv::with_quota(8);
        kv.set("a", "1234").unwrap();

        let err = kv.set("b", "123456").unwrap_err();
        assert!(matches!(err, Error::QuotaExceeded { limit: 8, .. }));
        assert_eq!(kv.get("b").unwrap(), None);
    }

    #[test]
    fn test_memory_quota_counts_replacement() {
        let kv = MemoryKv::with_quota(8);
        kv.set("a", "12345678").unwrap();
        // Replacing the same key frees its previous size first.
        kv.set("a", "87654321").unwrap();
        assert_eq!(kv.used_bytes(), 8);
    }
}
