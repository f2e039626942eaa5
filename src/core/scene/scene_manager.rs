//=========================================================================
// Scene Manager
//=========================================================================
//
// Manages scene registration, the current scene and switching.
//
// Scenes are stored in registration order; a scene's index is its id.
// Switching never tears a scene down: a scene keeps its objects and
// initialized state for the life of the application.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{Scene, SceneId, SceneSlot, SceneTransition};
use crate::core::globals::RuntimeContext;
use crate::core::render::Canvas;

//=== Scene Manager =======================================================

/// Ordered scene list with one current scene.
#[derive(Default)]
pub struct SceneManager {
    slots: Vec<SceneSlot>,
    current: Option<SceneId>,
}

impl SceneManager {
    //--- Construction -----------------------------------------------------

    /// Creates a manager with no scenes and no current scene.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            current: None,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Appends a scene and returns its id. Nothing is created until the
    /// scene first becomes current.
    pub fn register<T>(&mut self, scene: T) -> SceneId
    where
        T: Scene + 'static,
    {
        self.register_boxed(Box::new(scene))
    }

    /// Boxed variant of [`register`](Self::register). A repeated name is
    /// accepted with a warning; look-ups by name find the first.
    pub fn register_boxed(&mut self, scene: Box<dyn Scene>) -> SceneId {
        let id = SceneId::new(self.slots.len());

        if self.scene_by_name(scene.name()).is_some() {
            warn!("Scene name '{}' is registered more than once", scene.name());
        }

        debug!("Registered {} '{}'", id, scene.name());
        self.slots.push(SceneSlot::new(id, scene));
        id
    }

    //--- Switching --------------------------------------------------------

    /// Makes `id` current and activates it, running its creation hook if
    /// this is the first activation.
    ///
    /// Returns `false` and keeps the current scene if `id` is unknown.
    pub fn set_current_scene(&mut self, id: SceneId, runtime: &mut RuntimeContext) -> bool {
        let Some(slot) = self.slots.get_mut(id.index()) else {
            warn!("Attempted to switch to unregistered {}", id);
            return false;
        };

        debug!("Switching to {} '{}'", id, slot.name());
        self.current = Some(id);
        slot.activate(runtime);
        true
    }

    /// Switches to the scene after the current one, wrapping to the first.
    ///
    /// Without a current scene this starts at the first scene. Returns the
    /// new current scene, `None` if no scenes are registered.
    pub fn go_to_next_scene(&mut self, runtime: &mut RuntimeContext) -> Option<SceneId> {
        if self.slots.is_empty() {
            warn!("No scenes registered, cannot advance");
            return None;
        }

        let mut next = self.current.map_or(0, |id| id.index() + 1);
        if next >= self.slots.len() {
            warn!("No scene at index {}, wrapping to scene 0", next);
            next = 0;
        }

        let id = SceneId::new(next);
        self.set_current_scene(id, runtime);
        Some(id)
    }

    /// Applies every transition queued so far, in order.
    pub fn process_transitions(&mut self, runtime: &mut RuntimeContext) {
        for transition in runtime.scene_transitions.take() {
            match transition {
                SceneTransition::Goto(id) => {
                    self.set_current_scene(id, runtime);
                }
                SceneTransition::Next => {
                    self.go_to_next_scene(runtime);
                }
            }
        }
    }

    //--- Frame ------------------------------------------------------------

    /// Runs one frame of the current scene. Does nothing without one.
    pub fn render(&mut self, runtime: &mut RuntimeContext, canvas: &mut dyn Canvas, delta: f32) {
        let Some(id) = self.current else {
            return;
        };

        if let Some(slot) = self.slots.get_mut(id.index()) {
            slot.render(runtime, canvas, delta);
        }
    }

    /// Drops the objects of every scene.
    pub fn dispose(&mut self, runtime: &mut RuntimeContext) {
        for slot in &mut self.slots {
            slot.dispose(runtime);
        }
        debug!("Disposed {} scenes", self.slots.len());
    }

    //--- Queries ----------------------------------------------------------

    /// Number of registered scenes.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no scene is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Id of the current scene, `None` before the first activation.
    pub fn current(&self) -> Option<SceneId> {
        self.current
    }

    /// The current scene with its objects.
    pub fn current_scene(&self) -> Option<&SceneSlot> {
        self.current.and_then(|id| self.scene(id))
    }

    pub fn current_scene_mut(&mut self) -> Option<&mut SceneSlot> {
        let id = self.current?;
        self.scene_mut(id)
    }

    /// Registered scene `id`, current or not.
    pub fn scene(&self, id: SceneId) -> Option<&SceneSlot> {
        self.slots.get(id.index())
    }

    /// Mutable access to scene `id`. Despawns issued here take effect
    /// when that scene next runs a frame.
    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut SceneSlot> {
        self.slots.get_mut(id.index())
    }

    /// First scene registered under `name`.
    pub fn scene_by_name(&self, name: &str) -> Option<SceneId> {
        self.slots
            .iter()
            .find(|slot| slot.name() == name)
            .map(SceneSlot::id)
    }

    /// Every scene in registration order.
    pub fn scenes(&self) -> impl Iterator<Item = &SceneSlot> {
        self.slots.iter()
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::object::{GameObject, ObjectCommands, ObjectCore};
    use crate::core::render::NullCanvas;
    use crate::core::scene::SceneContext;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counted {
        name: &'static str,
        creates: Rc<Cell<u32>>,
        advance_on_step: bool,
    }

    impl Counted {
        fn new(name: &'static str) -> (Self, Rc<Cell<u32>>) {
            let creates = Rc::new(Cell::new(0));
            let scene = Self {
                name,
                creates: Rc::clone(&creates),
                advance_on_step: false,
            };
            (scene, creates)
        }
    }

    impl Scene for Counted {
        fn name(&self) -> &str {
            self.name
        }

        fn create(&mut self, _ctx: &mut SceneContext<'_>) {
            self.creates.set(self.creates.get() + 1);
        }

        fn step(&mut self, ctx: &mut SceneContext<'_>, _delta: f32) {
            if self.advance_on_step {
                ctx.go_to_next();
            }
        }
    }

    fn two_scenes() -> (SceneManager, SceneId, SceneId) {
        let mut manager = SceneManager::new();
        let a = manager.register(Counted::new("a").0);
        let b = manager.register(Counted::new("b").0);
        (manager, a, b)
    }

    #[test]
    fn ids_follow_registration_order() {
        let (manager, a, b) = two_scenes();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(manager.scene_by_name("b"), Some(b));
        assert_eq!(manager.scene_by_name("missing"), None);
        assert!(manager.current().is_none());
    }

    #[test]
    fn next_scene_wraps_around() {
        let (mut manager, a, b) = two_scenes();
        let mut runtime = RuntimeContext::default();
        manager.set_current_scene(a, &mut runtime);

        let visited: Vec<_> = (0..3)
            .filter_map(|_| manager.go_to_next_scene(&mut runtime))
            .collect();
        assert_eq!(visited, vec![b, a, b]);
    }

    #[test]
    fn creation_hook_runs_on_first_activation_only() {
        let mut manager = SceneManager::new();
        let (scene, creates) = Counted::new("once");
        let id = manager.register(scene);
        let mut runtime = RuntimeContext::default();

        assert_eq!(creates.get(), 0);
        for _ in 0..5 {
            manager.set_current_scene(id, &mut runtime);
        }
        assert_eq!(creates.get(), 1);
    }

    #[test]
    fn unknown_scene_keeps_current() {
        let (mut manager, a, _) = two_scenes();
        let mut runtime = RuntimeContext::default();
        manager.set_current_scene(a, &mut runtime);

        assert!(!manager.set_current_scene(SceneId::new(9), &mut runtime));
        assert_eq!(manager.current(), Some(a));
    }

    #[test]
    fn next_on_empty_manager_is_none() {
        let mut manager = SceneManager::new();
        let mut runtime = RuntimeContext::default();
        assert_eq!(manager.go_to_next_scene(&mut runtime), None);
    }

    #[test]
    fn queued_transition_applies_at_boundary() {
        let mut manager = SceneManager::new();
        let (mut first, _) = Counted::new("first");
        first.advance_on_step = true;
        let a = manager.register(first);
        let b = manager.register(Counted::new("second").0);
        let mut runtime = RuntimeContext::default();

        manager.set_current_scene(a, &mut runtime);
        manager.render(&mut runtime, &mut NullCanvas, 0.016);
        assert_eq!(manager.current(), Some(a));

        manager.process_transitions(&mut runtime);
        assert_eq!(manager.current(), Some(b));
        assert!(runtime.scene_transitions.is_empty());
    }

    struct Marker {
        core: ObjectCore,
    }

    impl GameObject for Marker {
        fn core(&self) -> &ObjectCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut ObjectCore {
            &mut self.core
        }

        fn step(&mut self, _cmds: &mut ObjectCommands<'_>, _delta: f32) {}
    }

    /// Spawns one marker on creation.
    struct Nest;

    impl Scene for Nest {
        fn name(&self) -> &str {
            "nest"
        }

        fn create(&mut self, ctx: &mut SceneContext<'_>) {
            ctx.spawn(|core| Marker { core });
        }
    }

    #[test]
    fn identity_is_not_shared_across_scenes() {
        let mut manager = SceneManager::new();
        let a = manager.register(Nest);
        let b = manager.register(Counted::new("other").0);
        let mut runtime = RuntimeContext::default();

        manager.set_current_scene(a, &mut runtime);
        manager.render(&mut runtime, &mut NullCanvas, 0.016);
        let x = manager.scene(a).unwrap().objects().ids().next().unwrap();

        manager.set_current_scene(b, &mut runtime);
        assert!(manager.scene_mut(a).unwrap().objects_mut().despawn(x));
        manager.render(&mut runtime, &mut NullCanvas, 0.016);

        let y = manager
            .scene_mut(b)
            .unwrap()
            .objects_mut()
            .spawn(runtime.identities_mut(), |core| Marker { core });
        manager.render(&mut runtime, &mut NullCanvas, 0.016);

        assert_ne!(x, y);
        assert!(manager.scene(a).unwrap().objects().contains(x));
        assert!(manager.scene(b).unwrap().objects().contains(y));
    }
}
