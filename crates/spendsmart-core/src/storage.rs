use std::{collections::HashMap, sync::RwLock};

use crate::CoreError;

/// Entry holding the serialized expense list.
pub const EXPENSES_KEY: &str = "expenses";
/// Entry holding the serialized budget list.
pub const BUDGETS_KEY: &str = "budgets";

/// Synchronous string-valued key-value store backing the finance collections.
///
/// Writes replace the whole entry; there are no transactions.
pub trait FinanceStorage: Send + Sync {
    /// Returns the stored value, or `None` when the entry has never been written.
    fn read_entry(&self, key: &str) -> Result<Option<String>, CoreError>;

    fn write_entry(&self, key: &str, value: &str) -> Result<(), CoreError>;

    /// Keeps an unreadable value aside so it is not lost on the next write.
    ///
    /// Earlier copies are never overwritten: the first free name among
    /// `{key}.corrupt`, `{key}.corrupt-2`, ... is used. Returns that name.
    fn quarantine_entry(&self, key: &str, raw: &str) -> Result<String, CoreError> {
        let mut target = format!("{key}.corrupt");
        let mut attempt = 1;
        while self.read_entry(&target)?.is_some() {
            attempt += 1;
            target = format!("{key}.corrupt-{attempt}");
        }
        self.write_entry(&target, raw)?;
        Ok(target)
    }
}

/// Volatile storage for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with pre-existing entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            entries: RwLock::new(map),
        }
    }
}

impl FinanceStorage for MemoryStorage {
    fn read_entry(&self, key: &str) -> Result<Option<String>, CoreError> {
        let guard = self
            .entries
            .read()
            .map_err(|_| CoreError::Storage("memory storage lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn write_entry(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut guard = self
            .entries
            .write()
            .map_err(|_| CoreError::Storage("memory storage lock poisoned".into()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<T: FinanceStorage + ?Sized> FinanceStorage for std::sync::Arc<T> {
    fn read_entry(&self, key: &str) -> Result<Option<String>, CoreError> {
        (**self).read_entry(key)
    }

    fn write_entry(&self, key: &str, value: &str) -> Result<(), CoreError> {
        (**self).write_entry(key, value)
    }

    fn quarantine_entry(&self, key: &str, raw: &str) -> Result<String, CoreError> {
        (**self).quarantine_entry(key, raw)
    }
}
