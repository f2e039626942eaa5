//=========================================================================
// Runtime Objects
//=========================================================================
//
// Base unit of simulation.
//
// Architecture:
//   GameObject (trait, user type)
//     ├─ ObjectCore: identity, position, direction, alarms, dispose flag
//     └─ ActorState (optional): depth, sprites, collider, active flag
//
// Update order per frame (driven by ObjectRegistry):
//   alarms → update_depth (actors) → pre_step → step → post_step
//
// Whether an object is an actor is decided once, at spawn time, from
// `actor()`. The registry never re-tests it per frame.
//
//=========================================================================

//=== Module Declarations =================================================

mod actor;
mod registry;

//=== Public API ==========================================================

pub use actor::{ActorState, Collider, ColliderOffset, Sprite};
pub use registry::{ObjectCommands, ObjectEnv, ObjectKind, ObjectRegistry};

//=== External Dependencies ===============================================

use std::any::Any;

//=== Internal Dependencies ===============================================

use crate::core::alarm::{AlarmBank, AlarmError};
use crate::core::identity::ObjectId;
use crate::core::math::{unit_or_zero, Vec2};
use crate::core::render::Canvas;

//=== Constants ===========================================================

/// Speed used by the movement helpers when none is given (units/frame).
pub const DEFAULT_SPEED: f32 = 15.0;

//=== AsAny ===============================================================

/// Downcasting support for boxed objects. Implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== ObjectCore ==========================================================

/// State every runtime object carries.
///
/// Created by the registry during `spawn` and handed to the object's
/// factory, so the identity is always the one the registry issued.
#[derive(Debug)]
pub struct ObjectCore {
    id: ObjectId,
    position: Vec2,
    direction: Vec2,
    alarms: AlarmBank<ObjectCore>,
    dispose_requested: bool,
}

impl ObjectCore {
    pub(crate) fn new(id: ObjectId) -> Self {
        Self {
            id,
            position: Vec2::zeros(),
            direction: Vec2::zeros(),
            alarms: AlarmBank::new(),
            dispose_requested: false,
        }
    }

    /// Places the object at `position`. Builder-style, for factories.
    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    //--- Identity ---------------------------------------------------------

    /// Identity issued by the registry at spawn.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    //--- Position & Direction ---------------------------------------------

    /// World position.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Moves by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    /// Current heading. Unit length only when set through
    /// [`face`](Self::face) or [`move_towards`](Self::move_towards).
    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Stores `direction` as given; it is not normalized.
    pub fn set_direction(&mut self, direction: Vec2) {
        self.direction = direction;
    }

    /// Sets the direction to the unit vector pointing at `target`.
    pub fn face(&mut self, target: Vec2) {
        self.direction = unit_or_zero(target - self.position);
    }

    /// Moves along the current direction by `speed`.
    pub fn move_forward(&mut self, speed: f32) {
        self.position += self.direction * speed;
    }

    /// Turns towards `target` and moves `speed` units.
    pub fn move_towards(&mut self, target: Vec2, speed: f32) {
        self.face(target);
        self.move_forward(speed);
    }

    /// Euclidean distance from the object's position to `point`.
    pub fn distance_to(&self, point: Vec2) -> f32 {
        (point - self.position).norm()
    }

    //--- Alarms -----------------------------------------------------------

    /// Arms alarm `index` to run `callback` after `seconds`.
    pub fn set_alarm<F>(&mut self, index: usize, seconds: f32, callback: F) -> Result<(), AlarmError>
    where
        F: FnOnce(&mut ObjectCore) + 'static,
    {
        self.alarms.arm(index, seconds, callback)
    }

    /// The object's alarm bank.
    pub fn alarms(&self) -> &AlarmBank<ObjectCore> {
        &self.alarms
    }

    pub fn alarms_mut(&mut self) -> &mut AlarmBank<ObjectCore> {
        &mut self.alarms
    }

    pub(crate) fn tick_alarms(&mut self, delta: f32) {
        for alarm in self.alarms.tick(delta) {
            alarm.fire(self);
        }
    }

    //--- Disposal ---------------------------------------------------------

    /// Asks the registry to despawn this object after its current update.
    pub fn queue_dispose(&mut self) {
        self.dispose_requested = true;
    }

    /// Whether the object is on its way out.
    pub fn will_dispose(&self) -> bool {
        self.dispose_requested
    }
}

//=== GameObject Trait ====================================================

/// Behaviour of a runtime object.
///
/// Only `core`, `core_mut` and `step` are required. Actors also override
/// `actor`/`actor_mut` to expose their [`ActorState`].
///
/// ```
/// use proscenium::prelude::*;
///
/// struct Mote {
///     core: ObjectCore,
/// }
///
/// impl GameObject for Mote {
///     fn core(&self) -> &ObjectCore { &self.core }
///     fn core_mut(&mut self) -> &mut ObjectCore { &mut self.core }
///
///     fn step(&mut self, _cmds: &mut ObjectCommands<'_>, _delta: f32) {
///         self.core.move_forward(1.0);
///     }
/// }
/// ```
pub trait GameObject: AsAny {
    fn core(&self) -> &ObjectCore;

    fn core_mut(&mut self) -> &mut ObjectCore;

    /// Runs before [`step`](Self::step).
    fn pre_step(&mut self, _cmds: &mut ObjectCommands<'_>, _delta: f32) {}

    /// Main per-frame update.
    fn step(&mut self, cmds: &mut ObjectCommands<'_>, delta: f32);

    /// Runs after [`step`](Self::step). Mostly cleanup.
    fn post_step(&mut self, _cmds: &mut ObjectCommands<'_>, _delta: f32) {}

    /// Actor capabilities, if this object is rendered.
    fn actor(&self) -> Option<&ActorState> {
        None
    }

    fn actor_mut(&mut self) -> Option<&mut ActorState> {
        None
    }

    /// Recomputes render depth before the pre-step. Default: depth = y.
    fn update_depth(&mut self) {
        let y = self.core().position().y;
        if let Some(actor) = self.actor_mut() {
            actor.set_depth(y);
        }
    }

    /// Extra drawing after the current sprite has been drawn.
    fn draw(&self, _canvas: &mut dyn Canvas) {}
}

/// Downcasts a boxed object to its concrete type.
pub fn downcast_ref<T: GameObject>(object: &dyn GameObject) -> Option<&T> {
    object.as_any().downcast_ref::<T>()
}

/// Mutable variant of [`downcast_ref`].
pub fn downcast_mut<T: GameObject>(object: &mut dyn GameObject) -> Option<&mut T> {
    object.as_any_mut().downcast_mut::<T>()
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::IdentityPool;
    use approx::assert_relative_eq;

    fn core_at(x: f32, y: f32) -> ObjectCore {
        let mut pool = IdentityPool::new();
        ObjectCore::new(pool.allocate()).at(Vec2::new(x, y))
    }

    #[test]
    fn move_towards_normalizes_direction() {
        let mut core = core_at(0.0, 0.0);
        core.move_towards(Vec2::new(10.0, 0.0), 2.0);

        assert_eq!(core.direction(), Vec2::new(1.0, 0.0));
        assert_eq!(core.position(), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn set_direction_is_stored_raw() {
        let mut core = core_at(0.0, 0.0);
        core.set_direction(Vec2::new(3.0, 4.0));
        core.move_forward(1.0);

        assert_eq!(core.position(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn distance_is_euclidean() {
        let core = core_at(1.0, 1.0);
        assert_relative_eq!(core.distance_to(Vec2::new(4.0, 5.0)), 5.0);
    }

    #[test]
    fn alarm_callback_can_mutate_core() {
        let mut core = core_at(0.0, 0.0);
        core.set_alarm(0, 0.5, |c| c.translate(Vec2::new(1.0, 0.0)))
            .unwrap();

        core.tick_alarms(0.25);
        assert_eq!(core.position().x, 0.0);

        core.tick_alarms(0.25);
        assert_eq!(core.position().x, 1.0);
    }

    #[test]
    fn alarm_can_queue_dispose() {
        let mut core = core_at(0.0, 0.0);
        core.set_alarm(1, 1.0, ObjectCore::queue_dispose).unwrap();

        assert!(!core.will_dispose());
        core.tick_alarms(1.0);
        assert!(core.will_dispose());
    }
}
