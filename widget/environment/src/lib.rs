//! Host-page environment classification.
//!
//! Labels the embedding page as a single-page or multi-page application so
//! the controller knows whether its host element must survive client-side
//! DOM replacement.

pub mod classifier;
pub mod navigation;
pub mod probe;

pub use classifier::EnvironmentClassifier;
pub use navigation::{ManualNavigationHooks, NavigationCallback, NavigationHooks, NavigationKind};
pub use probe::{HostProbe, StaticProbe, FRAMEWORK_MARKERS};
