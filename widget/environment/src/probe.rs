use std::collections::HashSet;

/// Global symbols injected by client-side-routing frameworks.
///
/// Presence of any of these is enough to classify the host as a SPA
/// without waiting for a navigation to happen.
pub const FRAMEWORK_MARKERS: &[&str] = &[
    "__NEXT_DATA__",
    "__NUXT__",
    "___gatsby",
    "__remixContext",
    "Ember",
];

/// Read-only view of the host page's global scope.
pub trait HostProbe {
    /// Whether a global symbol with this name exists on the host page.
    fn has_global(&self, symbol: &str) -> bool;
}

/// Probe over a fixed set of globals, for tests and the headless harness.
pub struct StaticProbe {
    globals: HashSet<String>,
}

impl StaticProbe {
    pub fn new<I, S>(globals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            globals: globals.into_iter().map(Into::into).collect(),
        }
    }

    /// A page exposing none of the known markers.
    pub fn empty() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl HostProbe for StaticProbe {
    fn has_global(&self, symbol: &str) -> bool {
        self.globals.contains(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_probe_membership() {
        let probe = StaticProbe::new(["__NEXT_DATA__"]);
        assert!(probe.has_global("__NEXT_DATA__"));
        assert!(!probe.has_global("__NUXT__"));
        assert!(!StaticProbe::empty().has_global("__NEXT_DATA__"));
    }
}
