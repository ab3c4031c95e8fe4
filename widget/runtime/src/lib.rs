//! Widget runtime.
//!
//! Owns the controller state machine, the single-instance command
//! registry, and the render surfaces: a headless one for tests and the
//! terminal harness, and a Shadow-DOM one compiled for the browser.

pub mod controller;
pub mod dialog;
pub mod registry;
pub mod surface;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use controller::{PendingSend, WidgetController};
pub use dialog::DialogState;
pub use registry::{WidgetCommand, WidgetRegistry};
pub use surface::{HeadlessSurface, RenderSurface};
