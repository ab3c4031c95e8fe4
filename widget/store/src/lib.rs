//! Tab-scoped persistence for the widget.
//!
//! `TabStorage` abstracts the host's per-tab key/value storage; `StateStore`
//! is the never-throwing wrapper the rest of the runtime talks to.

pub mod state_store;
pub mod storage;

pub use state_store::{StateStore, ENVIRONMENT_KEY, SESSION_KEY, STATE_KEY};
pub use storage::{MemoryTabStorage, TabStorage};
