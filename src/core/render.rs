//=========================================================================
// Render Boundary
//=========================================================================
//
// The core never talks to a graphics API. Actors are drawn through the
// `Canvas` trait, which the host application implements on top of its
// own batching/shader layer.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::math::Vec2;
use crate::core::object::Sprite;

//=== Canvas ==============================================================

/// Drawing surface handed to actors during the render pass.
pub trait Canvas {
    /// Draws `sprite` with its origin at `position`.
    fn draw_sprite(&mut self, sprite: &Sprite, position: Vec2);
}

/// Canvas that discards everything. Used when running headless.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCanvas;

impl Canvas for NullCanvas {
    fn draw_sprite(&mut self, _sprite: &Sprite, _position: Vec2) {}
}

//=== Camera ==============================================================

/// Shared scene camera. The core only stores and hands it out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec2,
    pub zoom: f32,
}

impl Camera {
    pub fn new(position: Vec2) -> Self {
        Self { position, zoom: 1.0 }
    }

    /// Converts a world position into camera-relative coordinates.
    pub fn to_view(&self, world: Vec2) -> Vec2 {
        (world - self.position) * self.zoom
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec2::zeros())
    }
}
