//=========================================================================
// Scene System
//=========================================================================
//
// Ordered scene list with one current scene and lazy, one-time creation.
//
// Architecture:
//   SceneManager
//     ├─ slots: Vec<SceneSlot>  (index = SceneId = registration order)
//     │    └─ SceneSlot: Box<dyn Scene> + ObjectRegistry + initialized
//     └─ current: Option<SceneId>
//
// Flow (per frame, current scene only):
//   begin_frame → Scene::step → objects update → objects render
//     → Scene::draw → end_frame
//
// Scenes request switches through `SceneContext::go_to`/`go_to_next`;
// the requests are queued and applied at the frame boundary.
//
//=========================================================================

//=== Module Declarations =================================================

mod scene_manager;
mod slot;
mod transition_queue;

//=== Public API ==========================================================

pub use scene_manager::SceneManager;
pub use slot::SceneSlot;
pub use transition_queue::{SceneTransition, TransitionQueue};

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::globals::RuntimeContext;
use crate::core::identity::ObjectId;
use crate::core::object::{GameObject, ObjectCore, ObjectRegistry};
use crate::core::render::{Camera, Canvas};
use crate::core::resource::ResourceLoader;

//=== SceneId =============================================================

/// Registration index of a scene. Stable for the life of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SceneId(usize);

impl SceneId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scene {}", self.0)
    }
}

//=== Scene Trait =========================================================

/// A named container for a step/draw cycle.
///
/// `create` runs once, the first time the scene becomes current. `step`
/// always runs before `draw` within a frame.
///
/// ```rust
/// # use proscenium::prelude::*;
/// struct Title;
///
/// impl Scene for Title {
///     fn name(&self) -> &str {
///         "title"
///     }
///
///     fn create(&mut self, _ctx: &mut SceneContext<'_>) {
///         // spawn the title screen objects here
///     }
/// }
/// ```
pub trait Scene {
    fn name(&self) -> &str;

    /// One-time setup. Never re-entered.
    fn create(&mut self, ctx: &mut SceneContext<'_>);

    /// Called every frame before objects update.
    fn step(&mut self, _ctx: &mut SceneContext<'_>, _delta: f32) {}

    /// Called every frame after objects have been drawn.
    fn draw(&mut self, _ctx: &mut SceneContext<'_>, _canvas: &mut dyn Canvas, _delta: f32) {}
}

//=== SceneContext ========================================================

/// What a scene can reach while one of its hooks runs.
pub struct SceneContext<'a> {
    scene: SceneId,
    objects: &'a mut ObjectRegistry,
    runtime: &'a mut RuntimeContext,
}

impl<'a> SceneContext<'a> {
    pub(crate) fn new(
        scene: SceneId,
        objects: &'a mut ObjectRegistry,
        runtime: &'a mut RuntimeContext,
    ) -> Self {
        Self {
            scene,
            objects,
            runtime,
        }
    }

    /// The scene whose hook is running.
    pub fn scene_id(&self) -> SceneId {
        self.scene
    }

    //--- Objects ----------------------------------------------------------

    /// Spawns into this scene. The object is live from the next frame.
    pub fn spawn<T, F>(&mut self, factory: F) -> ObjectId
    where
        T: GameObject,
        F: FnOnce(ObjectCore) -> T,
    {
        self.objects.spawn(self.runtime.identities_mut(), factory)
    }

    pub fn despawn(&mut self, id: ObjectId) -> bool {
        self.objects.despawn(id)
    }

    pub fn objects(&self) -> &ObjectRegistry {
        &*self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectRegistry {
        &mut *self.objects
    }

    //--- Shared State -----------------------------------------------------

    pub fn runtime(&self) -> &RuntimeContext {
        &*self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut RuntimeContext {
        &mut *self.runtime
    }

    pub fn assets(&self) -> &ResourceLoader {
        self.runtime.assets()
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.runtime.camera()
    }

    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.runtime.camera_mut()
    }

    pub fn ticks(&self) -> u64 {
        self.runtime.ticks()
    }

    //--- Transitions ------------------------------------------------------

    /// Makes `scene` current at the end of this frame.
    pub fn go_to(&mut self, scene: SceneId) {
        self.runtime
            .scene_transitions
            .push(SceneTransition::Goto(scene));
    }

    /// Advances to the next registered scene at the end of this frame.
    pub fn go_to_next(&mut self) {
        self.runtime.scene_transitions.push(SceneTransition::Next);
    }
}
