use std::collections::HashMap;

use crate::errors::CoreError;

use super::traits::KeyValueStore;

/// In-process store. Optionally enforces a per-value size limit to behave
/// like quota-bound browser storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects values longer than `limit` bytes.
    pub fn with_quota(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(limit),
        }
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        if let Some(limit) = self.quota {
            if value.len() > limit {
                return Err(CoreError::QuotaExceeded {
                    needed: value.len(),
                    limit,
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, CoreError> {
        Ok(self.entries.remove(key).is_some())
    }
}
