//! Storage layer for the quorum workspace.
//!
//! This crate provides the key-value storage abstraction the hosting
//! environment records engine state through, plus an in-memory backend
//! for tests and the demo binary.

use std::collections::HashMap;
use thiserror::Error;

/// Store error types
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("key not found")]
    KeyNotFound,

    #[error("write failed: {0}")]
    WriteFailed(String),

    #[error("read failed: {0}")]
    ReadFailed(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("backend error: {0}")]
    BackendError(String),
}

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Basic key-value store trait
pub trait KVStore: Send + Sync {
    /// Get a value by key
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Set a key-value pair
    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()>;

    /// Delete a key
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// Check if a key exists
    fn has(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Iterate over keys with a prefix, in key order
    fn prefix_iterator(&self, prefix: &[u8]) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)>>;
}

impl KVStore for Box<dyn KVStore> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        (**self).delete(key)
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        (**self).has(key)
    }

    fn prefix_iterator(&self, prefix: &[u8]) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)>> {
        (**self).prefix_iterator(prefix)
    }
}

/// In-memory key-value store implementation
pub struct MemStore {
    data: HashMap<Vec<u8>, Vec<u8>>,
}

impl MemStore {
    /// Create a new memory store
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KVStore for MemStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        self.data.insert(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.data.remove(key);
        Ok(())
    }

    fn prefix_iterator(&self, prefix: &[u8]) -> Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)>> {
        let prefix = prefix.to_vec();
        let mut items: Vec<_> = self
            .data
            .iter()
            .filter_map(|(k, v)| {
                if k.starts_with(&prefix) {
                    Some((k.clone(), v.clone()))
                } else {
                    None
                }
            })
            .collect();

        items.sort_by(|(a, _), (b, _)| a.cmp(b));
        Box::new(items.into_iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_delete() {
        let mut store = MemStore::new();
        assert_eq!(store.get(b"k").unwrap(), None);

        store.set(b"k".to_vec(), b"v".to_vec()).unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
        assert!(store.has(b"k").unwrap());

        store.delete(b"k").unwrap();
        assert_eq!(store.get(b"k").unwrap(), None);
    }

    #[test]
    fn test_prefix_iterator_ordering() {
        let mut store = MemStore::new();
        store.set(b"tx/2".to_vec(), b"c".to_vec()).unwrap();
        store.set(b"tx/0".to_vec(), b"a".to_vec()).unwrap();
        store.set(b"tx/1".to_vec(), b"b".to_vec()).unwrap();
        store.set(b"owners".to_vec(), b"x".to_vec()).unwrap();

        let keys: Vec<Vec<u8>> = store.prefix_iterator(b"tx/").map(|(k, _)| k).collect();
        assert_eq!(keys, vec![b"tx/0".to_vec(), b"tx/1".to_vec(), b"tx/2".to_vec()]);
    }
}
