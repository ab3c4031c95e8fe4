use serde::{Deserialize, Serialize};

/// A position in viewport pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point, in pixels.
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Pixel dimensions of a rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// The visible viewport of the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Clamp a widget position so the whole element stays on screen.
    ///
    /// Valid range is `[0, viewport - widget]` per axis; a widget larger
    /// than the viewport pins to the origin.
    pub fn clamp(&self, position: Point, widget: Size) -> Point {
        let max_x = (self.width - widget.width).max(0);
        let max_y = (self.height - widget.height).max(0);
        Point {
            x: position.x.clamp(0, max_x),
            y: position.y.clamp(0, max_y),
        }
    }
}
