//=========================================================================
// Actor State
//=========================================================================
//
// Render and collision data carried by actor objects: depth, a named
// sprite set with one current sprite, a collider stub and an active flag.
//
// Invariant: `current`, when set, is always a key of `sprites`.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::math::{Rect, Vec2};
use crate::core::resource::AssetHandle;

//=== Sprite ==============================================================

/// A loaded image plus the animation parameters to draw it with.
#[derive(Debug, Clone)]
pub struct Sprite {
    name: String,
    handle: AssetHandle,
    frame_count: u32,
    frame_time: Option<f32>,
    width: f32,
    height: f32,
}

impl Sprite {
    /// Single-frame, unanimated sprite of unknown size.
    pub fn new(name: impl Into<String>, handle: AssetHandle) -> Self {
        Self {
            name: name.into(),
            handle,
            frame_count: 1,
            frame_time: None,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Splits the image into `frame_count` frames shown for `frame_time` ms each.
    pub fn with_frames(mut self, frame_count: u32, frame_time: Option<f32>) -> Self {
        self.frame_count = frame_count.max(1);
        self.frame_time = frame_time;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> &AssetHandle {
        &self.handle
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn frame_time(&self) -> Option<f32> {
        self.frame_time
    }

    pub fn set_frame_time(&mut self, frame_time: Option<f32>) {
        self.frame_time = frame_time;
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

//=== Collider ============================================================

/// Anchor of a collider relative to its owner's position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColliderOffset {
    Top,
    TopLeft,
    TopRight,
    Center,
    CenterLeft,
    CenterRight,
    Bottom,
    #[default]
    BottomLeft,
    BottomRight,
}

impl ColliderOffset {
    /// Offset from the anchor point to the rectangle's bottom-left corner.
    fn shift(self, width: f32, height: f32) -> Vec2 {
        let x = match self {
            Self::TopLeft | Self::CenterLeft | Self::BottomLeft => 0.0,
            Self::Top | Self::Center | Self::Bottom => -width / 2.0,
            Self::TopRight | Self::CenterRight | Self::BottomRight => -width,
        };
        let y = match self {
            Self::BottomLeft | Self::Bottom | Self::BottomRight => 0.0,
            Self::CenterLeft | Self::Center | Self::CenterRight => -height / 2.0,
            Self::TopLeft | Self::Top | Self::TopRight => -height,
        };
        Vec2::new(x, y)
    }
}

/// Axis-aligned collision box. Detection is a plain overlap test.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Collider {
    pub width: f32,
    pub height: f32,
    pub offset: ColliderOffset,
}

impl Collider {
    pub fn new(width: f32, height: f32, offset: ColliderOffset) -> Self {
        Self { width, height, offset }
    }

    /// World-space bounds when the owner stands at `position`.
    pub fn bounds(&self, position: Vec2) -> Rect {
        let corner = position + self.offset.shift(self.width, self.height);
        Rect::new(corner.x, corner.y, self.width, self.height)
    }

    pub fn overlaps(&self, position: Vec2, other: &Collider, other_position: Vec2) -> bool {
        self.bounds(position).overlaps(&other.bounds(other_position))
    }
}

//=== ActorState ==========================================================

/// Everything an object needs to be rendered and collided.
#[derive(Debug, Clone)]
pub struct ActorState {
    depth: f32,
    sprites: HashMap<String, Sprite>,
    current: Option<String>,
    collider: Collider,
    active: bool,
}

impl ActorState {
    /// Active actor with no sprites and an empty collider.
    pub fn new() -> Self {
        Self {
            depth: 0.0,
            sprites: HashMap::new(),
            current: None,
            collider: Collider::default(),
            active: true,
        }
    }

    //--- Depth ------------------------------------------------------------

    /// Render depth; lower values are drawn first (further back).
    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth;
    }

    //--- Sprites ----------------------------------------------------------

    /// Adds `sprite` under its name. The first sprite becomes current.
    ///
    /// Returns `false` if a sprite with that name is already present.
    pub fn add_sprite(&mut self, sprite: Sprite) -> bool {
        let name = sprite.name().to_owned();
        if self.sprites.contains_key(&name) {
            debug!("Sprite '{}' already in sprite set", name);
            return false;
        }

        self.sprites.insert(name.clone(), sprite);
        if self.current.is_none() {
            self.current = Some(name);
        }
        true
    }

    /// Switches the current sprite. Names outside the set are refused.
    pub fn set_sprite(&mut self, name: &str) -> bool {
        if !self.sprites.contains_key(name) {
            warn!("Sprite '{}' is not in the sprite set", name);
            return false;
        }

        if self.current.as_deref() != Some(name) {
            self.current = Some(name.to_owned());
        }
        true
    }

    /// Removes a sprite. Clears the current sprite if it was the one removed.
    pub fn remove_sprite(&mut self, name: &str) -> Option<Sprite> {
        let removed = self.sprites.remove(name);
        if removed.is_some() && self.current.as_deref() == Some(name) {
            self.current = None;
        }
        removed
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        self.current.as_ref().and_then(|name| self.sprites.get(name))
    }

    pub fn sprite_mut(&mut self) -> Option<&mut Sprite> {
        let name = self.current.as_ref()?;
        self.sprites.get_mut(name)
    }

    pub fn sprite_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn has_sprite(&self, name: &str) -> bool {
        self.sprites.contains_key(name)
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Width of the current sprite, 0 without one.
    pub fn width(&self) -> f32 {
        self.sprite().map_or(0.0, Sprite::width)
    }

    /// Height of the current sprite, 0 without one.
    pub fn height(&self) -> f32 {
        self.sprite().map_or(0.0, Sprite::height)
    }

    //--- Collider & Activity ---------------------------------------------

    pub fn collider(&self) -> &Collider {
        &self.collider
    }

    pub fn set_collider(&mut self, collider: Collider) {
        self.collider = collider;
    }

    /// Inactive actors are neither updated nor rendered.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Default for ActorState {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resource::AssetKind;

    fn sprite(name: &str) -> Sprite {
        Sprite::new(name, AssetHandle::new(name, AssetKind::Texture, Vec::<u8>::new()))
            .with_size(16.0, 8.0)
    }

    #[test]
    fn first_sprite_becomes_current() {
        let mut actor = ActorState::new();
        assert!(actor.sprite().is_none());
        assert_eq!(actor.width(), 0.0);

        assert!(actor.add_sprite(sprite("idle")));
        assert!(actor.add_sprite(sprite("run")));

        assert_eq!(actor.sprite_name(), Some("idle"));
        assert_eq!(actor.width(), 16.0);
        assert_eq!(actor.height(), 8.0);
    }

    #[test]
    fn duplicate_sprite_is_rejected() {
        let mut actor = ActorState::new();
        assert!(actor.add_sprite(sprite("idle")));
        assert!(!actor.add_sprite(sprite("idle")));
        assert_eq!(actor.sprite_count(), 1);
    }

    #[test]
    fn current_sprite_stays_inside_set() {
        let mut actor = ActorState::new();
        actor.add_sprite(sprite("idle"));

        assert!(!actor.set_sprite("missing"));
        assert_eq!(actor.sprite_name(), Some("idle"));

        actor.add_sprite(sprite("run"));
        assert!(actor.set_sprite("run"));
        assert_eq!(actor.sprite_name(), Some("run"));

        actor.remove_sprite("run");
        assert_eq!(actor.sprite_name(), None);
        assert!(actor.has_sprite("idle"));
    }

    #[test]
    fn collider_bounds_follow_offset() {
        let centered = Collider::new(4.0, 2.0, ColliderOffset::Center);
        assert_eq!(centered.bounds(Vec2::new(10.0, 10.0)), Rect::new(8.0, 9.0, 4.0, 2.0));

        let top_right = Collider::new(4.0, 2.0, ColliderOffset::TopRight);
        assert_eq!(top_right.bounds(Vec2::new(10.0, 10.0)), Rect::new(6.0, 8.0, 4.0, 2.0));
    }

    #[test]
    fn colliders_overlap_by_bounds() {
        let a = Collider::new(2.0, 2.0, ColliderOffset::BottomLeft);
        let b = Collider::new(2.0, 2.0, ColliderOffset::Center);

        assert!(a.overlaps(Vec2::new(0.0, 0.0), &b, Vec2::new(2.0, 2.0)));
        assert!(!a.overlaps(Vec2::new(0.0, 0.0), &b, Vec2::new(4.0, 4.0)));
    }

    #[test]
    fn actors_start_active() {
        let mut actor = ActorState::default();
        assert!(actor.is_active());
        actor.set_active(false);
        assert!(!actor.is_active());
    }
}
