use std::collections::HashMap;
use std::sync::RwLock;

use clubsite_core::{queue::BucketStore, Result};

use crate::errors::StorageError;

/// Process-local buckets; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryBucketStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryBucketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BucketStore for MemoryBucketStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| StorageError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut values = self.values.write().map_err(|_| StorageError::LockPoisoned)?;
        values.remove(key);
        Ok(())
    }
}
