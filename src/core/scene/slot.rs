//=========================================================================
// Scene Slot
//=========================================================================
//
// A registered scene together with the objects it owns.
//
// State machine:
//   Uninitialized ──activate()──▶ Initialized   (create runs here, once)
//   Initialized   ──activate()──▶ Initialized   (no-op)
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;

//=== Internal Dependencies ===============================================

use super::{Scene, SceneContext, SceneId};
use crate::core::globals::RuntimeContext;
use crate::core::object::ObjectRegistry;
use crate::core::render::Canvas;

//=== SceneSlot ===========================================================

/// A registered scene, its object registry and its initialized flag.
pub struct SceneSlot {
    id: SceneId,
    scene: Box<dyn Scene>,
    objects: ObjectRegistry,
    initialized: bool,
}

impl SceneSlot {
    pub(crate) fn new(id: SceneId, scene: Box<dyn Scene>) -> Self {
        Self {
            id,
            scene,
            objects: ObjectRegistry::new(),
            initialized: false,
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Runs the creation hook the first time only.
    pub(crate) fn activate(&mut self, runtime: &mut RuntimeContext) {
        if self.initialized {
            debug!("Activated {} '{}'", self.id, self.scene.name());
            return;
        }

        debug!("Creating {} '{}'", self.id, self.scene.name());
        let mut ctx = SceneContext::new(self.id, &mut self.objects, runtime);
        self.scene.create(&mut ctx);
        self.initialized = true;
    }

    /// Runs one frame: scene step, object update, object render, scene draw.
    pub(crate) fn render(&mut self, runtime: &mut RuntimeContext, canvas: &mut dyn Canvas, delta: f32) {
        let Self {
            id, scene, objects, ..
        } = self;

        objects.begin_frame();

        scene.step(&mut SceneContext::new(*id, objects, runtime), delta);
        objects.update(&mut runtime.object_env(), delta);

        objects.render(canvas);
        scene.draw(&mut SceneContext::new(*id, objects, runtime), canvas, delta);

        objects.end_frame(runtime.identities_mut());
    }

    /// Drops every object, returning identities to the pool.
    pub(crate) fn dispose(&mut self, runtime: &mut RuntimeContext) {
        self.objects.clear(runtime.identities_mut());
    }

    //--- Queries ----------------------------------------------------------

    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Name reported by the scene.
    pub fn name(&self) -> &str {
        self.scene.name()
    }

    pub fn scene(&self) -> &dyn Scene {
        self.scene.as_ref()
    }

    /// Objects owned by this scene.
    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectRegistry {
        &mut self.objects
    }

    /// Whether the creation hook has run.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
