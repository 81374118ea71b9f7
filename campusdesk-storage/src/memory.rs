use crate::{LocalStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory [`LocalStore`] with an optional byte quota.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    /// Creates an empty store without a quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store that refuses writes once the total size of
    /// keys and values would exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Number of keys written.
    pub fn len(&self) -> usize {
        self.values.lock().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut values = self.values.lock().map_err(|_| StorageError::Poisoned)?;
        if let Some(quota) = self.quota_bytes {
            let others: usize = values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded(format!(
                    "{key}: {needed} bytes exceeds quota of {quota}"
                )));
            }
        }
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
