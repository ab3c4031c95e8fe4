use tracing::trace;

use docwing_core::{Point, Size, Viewport};

/// Displacement (Euclidean, px) beyond which a gesture becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// Window after a drag ends during which synthetic clicks are swallowed.
///
/// Some browsers still fire a click after a drag; without this the same
/// gesture would also toggle the dialog.
pub const CLICK_SUPPRESSION_MS: i64 = 100;

/// Where the arbiter is within the current gesture.
#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    /// Pointer is down but the gesture is not yet classified.
    Armed { start: Point, origin: Point },
    /// Classified as a drag; this cannot be undone within the gesture.
    Dragging { start: Point, origin: Point },
}

/// Result of feeding a pointer-move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragUpdate {
    /// Not (yet) a drag; let the event through.
    Ignored,
    /// Reposition the launcher live and suppress the event's default action.
    Moved(Point),
}

/// Terminal result of a gesture, from pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    /// No gesture was in progress.
    Ignored,
    /// Never crossed the threshold; the upcoming native click toggles the
    /// dialog, nothing else to do here.
    Tap,
    /// Drag finished; persist this clamped position.
    DragEnd(Point),
}

/// Classifies one pointer gesture stream at a time.
///
/// Events are processed in dispatch order; timestamps ride inside the
/// events so no wall clock is consulted.
pub struct GestureArbiter {
    widget: Size,
    phase: Phase,
    suppress_clicks_until: i64,
}

impl GestureArbiter {
    pub fn new(widget: Size) -> Self {
        Self {
            widget,
            phase: Phase::Idle,
            suppress_clicks_until: 0,
        }
    }

    /// Begin a gesture. `origin` is the launcher's current top-left corner.
    ///
    /// A second pointer while one is down is ignored (first touch wins).
    pub fn pointer_down(&mut self, at: Point, origin: Point) {
        if !matches!(self.phase, Phase::Idle) {
            return;
        }
        trace!(x = at.x, y = at.y, "gesture armed");
        self.phase = Phase::Armed { start: at, origin };
    }

    /// Feed a pointer-move.
    pub fn pointer_move(&mut self, at: Point, viewport: Viewport) -> DragUpdate {
        match self.phase {
            Phase::Idle => DragUpdate::Ignored,
            Phase::Armed { start, origin } => {
                if at.distance_to(start) > DRAG_THRESHOLD_PX {
                    trace!("gesture classified as drag");
                    self.phase = Phase::Dragging { start, origin };
                    DragUpdate::Moved(self.track(at, start, origin, viewport))
                } else {
                    DragUpdate::Ignored
                }
            }
            Phase::Dragging { start, origin } => {
                DragUpdate::Moved(self.track(at, start, origin, viewport))
            }
        }
    }

    /// End the gesture.
    pub fn pointer_up(&mut self, at: Point, timestamp_ms: i64, viewport: Viewport) -> GestureOutcome {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => GestureOutcome::Ignored,
            Phase::Armed { .. } => GestureOutcome::Tap,
            Phase::Dragging { start, origin } => {
                self.suppress_clicks_until = timestamp_ms + CLICK_SUPPRESSION_MS;
                GestureOutcome::DragEnd(self.track(at, start, origin, viewport))
            }
        }
    }

    /// Whether a click at this time should reach the dialog toggle.
    pub fn accept_click(&self, timestamp_ms: i64) -> bool {
        timestamp_ms >= self.suppress_clicks_until
    }

    fn track(&self, at: Point, start: Point, origin: Point, viewport: Viewport) -> Point {
        let raw = Point::new(origin.x + at.x - start.x, origin.y + at.y - start.y);
        viewport.clamp(raw, self.widget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport {
        width: 1280,
        height: 720,
    };

    fn arbiter() -> GestureArbiter {
        GestureArbiter::new(Size::new(60, 60))
    }

    #[test]
    fn test_small_displacement_is_a_tap() {
        let mut arbiter = arbiter();
        arbiter.pointer_down(Point::new(100, 100), Point::new(90, 90));

        assert_eq!(
            arbiter.pointer_move(Point::new(103, 103), VIEWPORT),
            DragUpdate::Ignored
        );
        assert_eq!(
            arbiter.pointer_up(Point::new(103, 103), 1_000, VIEWPORT),
            GestureOutcome::Tap
        );
        // native click is allowed straight away
        assert!(arbiter.accept_click(1_000));
    }

    #[test]
    fn test_crossing_threshold_classifies_drag() {
        let mut arbiter = arbiter();
        arbiter.pointer_down(Point::new(100, 100), Point::new(90, 90));

        // exactly 5px is still a tap, just over is a drag
        assert_eq!(
            arbiter.pointer_move(Point::new(105, 100), VIEWPORT),
            DragUpdate::Ignored
        );
        assert_eq!(
            arbiter.pointer_move(Point::new(106, 100), VIEWPORT),
            DragUpdate::Moved(Point::new(96, 90))
        );

        match arbiter.pointer_up(Point::new(120, 130), 2_000, VIEWPORT) {
            GestureOutcome::DragEnd(p) => assert_eq!(p, Point::new(110, 120)),
            other => panic!("expected DragEnd, got {other:?}"),
        }
    }

    #[test]
    fn test_drag_classification_cannot_be_undone() {
        let mut arbiter = arbiter();
        arbiter.pointer_down(Point::new(100, 100), Point::new(90, 90));
        arbiter.pointer_move(Point::new(120, 100), VIEWPORT);

        // returning to the start point still drags
        assert_eq!(
            arbiter.pointer_move(Point::new(100, 100), VIEWPORT),
            DragUpdate::Moved(Point::new(90, 90))
        );
        assert!(matches!(
            arbiter.pointer_up(Point::new(100, 100), 3_000, VIEWPORT),
            GestureOutcome::DragEnd(_)
        ));
    }

    #[test]
    fn test_click_suppressed_after_drag_then_allowed() {
        let mut arbiter = arbiter();
        arbiter.pointer_down(Point::new(100, 100), Point::new(90, 90));
        arbiter.pointer_move(Point::new(140, 100), VIEWPORT);
        arbiter.pointer_up(Point::new(140, 100), 5_000, VIEWPORT);

        assert!(!arbiter.accept_click(5_050));
        assert!(arbiter.accept_click(5_000 + CLICK_SUPPRESSION_MS));
    }

    #[test]
    fn test_release_outside_viewport_clamps_final_position() {
        let mut arbiter = arbiter();
        arbiter.pointer_down(Point::new(1200, 700), Point::new(1190, 690));
        arbiter.pointer_move(Point::new(1400, 900), VIEWPORT);

        match arbiter.pointer_up(Point::new(2000, -50), 6_000, VIEWPORT) {
            GestureOutcome::DragEnd(p) => {
                assert_eq!(p, Point::new(1220, 0));
            }
            other => panic!("expected DragEnd, got {other:?}"),
        }
    }

    #[test]
    fn test_second_pointer_down_is_ignored() {
        let mut arbiter = arbiter();
        arbiter.pointer_down(Point::new(100, 100), Point::new(90, 90));
        // second touch point must not re-arm the gesture
        arbiter.pointer_down(Point::new(500, 500), Point::new(400, 400));

        arbiter.pointer_move(Point::new(120, 100), VIEWPORT);
        match arbiter.pointer_up(Point::new(120, 100), 7_000, VIEWPORT) {
            GestureOutcome::DragEnd(p) => assert_eq!(p, Point::new(110, 90)),
            other => panic!("expected DragEnd, got {other:?}"),
        }
    }

    #[test]
    fn test_events_without_down_are_ignored() {
        let mut arbiter = arbiter();
        assert_eq!(
            arbiter.pointer_move(Point::new(10, 10), VIEWPORT),
            DragUpdate::Ignored
        );
        assert_eq!(
            arbiter.pointer_up(Point::new(10, 10), 8_000, VIEWPORT),
            GestureOutcome::Ignored
        );
    }
}
