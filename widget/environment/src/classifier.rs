use std::cell::Cell;

use tracing::debug;

use docwing_core::EnvironmentLabel;
use docwing_store::StateStore;

use crate::navigation::{NavigationHooks, NavigationKind};
use crate::probe::{HostProbe, FRAMEWORK_MARKERS};

/// Decides whether the host page is a SPA or an MPA.
///
/// The label is memoized per tab through the `StateStore`. A latched `Spa`
/// is final; an `Mpa` belief keeps the navigation hooks listening so the
/// first observed history mutation upgrades it.
pub struct EnvironmentClassifier {
    store: StateStore,
    installed: Cell<bool>,
}

impl EnvironmentClassifier {
    pub fn new(store: StateStore) -> Self {
        Self {
            store,
            installed: Cell::new(false),
        }
    }

    /// Classify the host page.
    ///
    /// Order: cached label, framework marker probe, then default `Mpa`
    /// with interceptors armed for a later upgrade.
    pub fn detect(&self, probe: &dyn HostProbe, hooks: &dyn NavigationHooks) -> EnvironmentLabel {
        if let Some(cached) = self.store.cached_environment() {
            if cached == EnvironmentLabel::Spa {
                return cached;
            }
            // Cached Mpa is still upgradeable.
            self.install_once(hooks);
            return cached;
        }

        let marker = FRAMEWORK_MARKERS
            .iter()
            .find(|marker| probe.has_global(marker));
        let label = match marker {
            Some(marker) => {
                debug!(marker, "client-routing framework marker present");
                EnvironmentLabel::Spa
            }
            None => EnvironmentLabel::Mpa,
        };

        self.store.cache_environment(label);
        self.install_once(hooks);
        label
    }

    fn install_once(&self, hooks: &dyn NavigationHooks) {
        if self.installed.replace(true) {
            return;
        }
        let store = self.store.clone();
        hooks.install(Box::new(move |kind: NavigationKind| {
            debug!(?kind, "history mutation observed; latching spa");
            store.cache_environment(EnvironmentLabel::Spa);
        }));
    }
}
