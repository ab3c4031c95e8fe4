use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;

/// Abstract interface over the host's tab-scoped key/value storage.
///
/// Implementations may fail (quota, privacy mode, storage disabled); the
/// error is reported through `Result` and handled by the caller. No `Send`
/// bound: the production backend lives on the browser main thread.
pub trait TabStorage {
    /// Read a value, `None` if the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write or overwrite a value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Simple in-memory storage for tests and the headless harness.
///
/// Lives for the process, which matches a tab session's lifetime.
#[derive(Default)]
pub struct MemoryTabStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTabStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TabStorage for MemoryTabStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap();
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap();
        entries.remove(key);
        Ok(())
    }
}
