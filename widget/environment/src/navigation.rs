use std::cell::RefCell;

/// The history mutation that was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKind {
    /// A new history entry was pushed.
    Push,
    /// The current history entry was replaced.
    Replace,
    /// The user navigated with back/forward.
    BackForward,
}

pub type NavigationCallback = Box<dyn Fn(NavigationKind)>;

/// Seam over the browser's three navigation primitives.
///
/// The production implementation wraps history push/replace and the
/// back-forward event; tests drive `ManualNavigationHooks` instead, so the
/// interception strategy never depends on real browser history.
pub trait NavigationHooks {
    /// Register a callback invoked on every observed navigation.
    fn install(&self, on_navigate: NavigationCallback);
}

/// Hand-driven hooks for tests and the headless harness.
#[derive(Default)]
pub struct ManualNavigationHooks {
    callbacks: RefCell<Vec<NavigationCallback>>,
}

impl ManualNavigationHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a navigation of the given kind.
    pub fn fire(&self, kind: NavigationKind) {
        for callback in self.callbacks.borrow().iter() {
            callback(kind);
        }
    }

    /// Number of callbacks currently installed.
    pub fn installed(&self) -> usize {
        self.callbacks.borrow().len()
    }
}

impl NavigationHooks for ManualNavigationHooks {
    fn install(&self, on_navigate: NavigationCallback) {
        self.callbacks.borrow_mut().push(on_navigate);
    }
}
