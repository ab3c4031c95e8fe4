//! Gesture arbitration for the floating launcher.
//!
//! Turns one raw pointer-down/move/up stream into exactly one terminal
//! outcome, either a click or a drag, with a hysteresis threshold.

pub mod arbiter;

pub use arbiter::{
    DragUpdate, GestureArbiter, GestureOutcome, CLICK_SUPPRESSION_MS, DRAG_THRESHOLD_PX,
};
