use anyhow::{anyhow, Result};
use web_sys::Storage;

use docwing_store::TabStorage;

/// `sessionStorage`-backed tab storage.
///
/// Handles live in the page's storage area: cleared when the tab closes,
/// shared across same-tab navigations.
pub struct SessionStorageBackend {
    storage: Storage,
}

impl SessionStorageBackend {
    /// Acquire the tab's session storage. Fails in privacy modes that
    /// disable storage; callers degrade to in-memory behavior.
    pub fn acquire() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| anyhow!("window is unavailable"))?;
        let storage = window
            .session_storage()
            .map_err(|err| anyhow!("sessionStorage rejected: {err:?}"))?
            .ok_or_else(|| anyhow!("sessionStorage is disabled"))?;
        Ok(Self { storage })
    }
}

impl TabStorage for SessionStorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|err| anyhow!("sessionStorage read failed: {err:?}"))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|err| anyhow!("sessionStorage write failed: {err:?}"))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|err| anyhow!("sessionStorage remove failed: {err:?}"))
    }
}
