use std::sync::Arc;

use tracing::{debug, warn};

use docwing_core::{EnvironmentLabel, SessionId, WidgetState};

use crate::storage::TabStorage;

/// Storage key holding the serialized `WidgetState` snapshot.
pub const STATE_KEY: &str = "docwing.state";
/// Storage key holding the cached environment label.
pub const ENVIRONMENT_KEY: &str = "docwing.environment";
/// Storage key holding the tab's session id.
pub const SESSION_KEY: &str = "docwing.session";

/// Durable wrapper around `TabStorage` owning the widget's three keys.
///
/// Every operation is infallible from the caller's perspective: storage
/// failures are logged at `warn` and degrade to in-memory-only behavior,
/// and an undecodable snapshot loads as "no prior state".
#[derive(Clone)]
pub struct StateStore {
    storage: Arc<dyn TabStorage>,
}

impl StateStore {
    pub fn new(storage: Arc<dyn TabStorage>) -> Self {
        Self { storage }
    }

    /// Persist the current widget snapshot.
    pub fn save(&self, state: &WidgetState) {
        let json = match serde_json::to_string(state) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "failed to encode widget state; skipping save");
                return;
            }
        };
        if let Err(err) = self.storage.set(STATE_KEY, &json) {
            warn!(error = %err, "failed to persist widget state");
        }
    }

    /// Restore the last snapshot, if one exists and still decodes.
    pub fn load(&self) -> Option<WidgetState> {
        let raw = match self.storage.get(STATE_KEY) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(error = %err, "failed to read widget state");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(state) => Some(state),
            Err(err) => {
                warn!(error = %err, "stored widget state did not decode; starting fresh");
                None
            }
        }
    }

    /// Drop the persisted snapshot.
    pub fn clear(&self) {
        if let Err(err) = self.storage.remove(STATE_KEY) {
            warn!(error = %err, "failed to clear widget state");
        }
    }

    /// The tab's session id, created lazily on first use.
    ///
    /// Persisted under its own key so it outlives a dialog close but not
    /// the tab. If storage is unavailable a fresh id is handed out each
    /// call, which only costs conversation continuity on the backend.
    pub fn session_id(&self) -> SessionId {
        match self.storage.get(SESSION_KEY) {
            Ok(Some(raw)) if !raw.is_empty() => return SessionId::from(raw),
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "failed to read session id");
            }
        }
        let id = SessionId::generate();
        if let Err(err) = self.storage.set(SESSION_KEY, id.as_str()) {
            warn!(error = %err, "failed to persist session id");
        } else {
            debug!(session = %id, "created new tab session");
        }
        id
    }

    /// The cached environment label, if one was persisted.
    pub fn cached_environment(&self) -> Option<EnvironmentLabel> {
        match self.storage.get(ENVIRONMENT_KEY) {
            Ok(Some(raw)) => EnvironmentLabel::parse(&raw),
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "failed to read environment label");
                None
            }
        }
    }

    /// Cache the environment label, never downgrading a latched `Spa`.
    pub fn cache_environment(&self, label: EnvironmentLabel) {
        let merged = self
            .cached_environment()
            .map(|cached| cached.upgraded_with(label))
            .unwrap_or(label);
        if let Err(err) = self.storage.set(ENVIRONMENT_KEY, merged.as_str()) {
            warn!(error = %err, "failed to persist environment label");
        }
    }
}
