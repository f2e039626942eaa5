//=========================================================================
// Math
//=========================================================================
//
// Thin aliases over nalgebra plus the handful of 2D helpers the object
// model needs (unit vectors, rectangles).
//
//=========================================================================

//=== External Dependencies ===============================================

pub use nalgebra::Vector2;

//=== Types ===============================================================

/// 2D vector used for positions and directions.
pub type Vec2 = Vector2<f32>;

/// Returns the unit vector of `v`, or zero if `v` has no length.
pub fn unit_or_zero(v: Vec2) -> Vec2 {
    let len = v.norm();
    if len > f32::EPSILON {
        v / len
    } else {
        Vec2::zeros()
    }
}

//=== Rect ================================================================

/// Axis-aligned rectangle anchored at its bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap test; touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.top()
            && other.y < self.top()
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.top()
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
