//=========================================================================
// Runtime Context
//=========================================================================
//
// Shared data container for scenes and objects.
//
// Contains the state that outlives any single scene:
// - identities: the one identity pool every registry allocates from
// - assets: the loaded resource pipeline
// - camera: shared scene camera, created by the pre-load hook
// - ticks: frame counter, monotonic, never reset
// - data: the single read/write stream for save data
// - scene_transitions: command queue for scene changes
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::identity::IdentityPool;
use crate::core::object::ObjectEnv;
use crate::core::render::Camera;
use crate::core::resource::ResourceLoader;
use crate::core::scene::TransitionQueue;
use crate::core::storage::DataChannel;

//=== RuntimeContext ======================================================

/// Application-wide state handed to every scene hook.
pub struct RuntimeContext {
    identities: IdentityPool,
    assets: ResourceLoader,
    camera: Option<Camera>,
    ticks: u64,
    data: DataChannel,

    /// Transition queue for scene changes.
    ///
    /// Scenes queue transitions here while they run. The application
    /// applies them at the frame boundary.
    pub scene_transitions: TransitionQueue,
}

impl RuntimeContext {
    pub fn new(assets: ResourceLoader) -> Self {
        Self {
            identities: IdentityPool::new(),
            assets,
            camera: None,
            ticks: 0,
            data: DataChannel::new(),
            scene_transitions: TransitionQueue::new(),
        }
    }

    //--- Identities -------------------------------------------------------

    pub fn identities(&self) -> &IdentityPool {
        &self.identities
    }

    pub fn identities_mut(&mut self) -> &mut IdentityPool {
        &mut self.identities
    }

    //--- Assets -----------------------------------------------------------

    pub fn assets(&self) -> &ResourceLoader {
        &self.assets
    }

    pub fn assets_mut(&mut self) -> &mut ResourceLoader {
        &mut self.assets
    }

    //--- Camera -----------------------------------------------------------

    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    //--- Ticks ------------------------------------------------------------

    /// Frames run since the application started.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub(crate) fn advance_tick(&mut self) {
        self.ticks += 1;
    }

    //--- Data ------------------------------------------------------------

    pub fn data(&self) -> &DataChannel {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut DataChannel {
        &mut self.data
    }

    //--- Registry Access --------------------------------------------------

    /// Borrows what an object registry needs for one frame.
    pub fn object_env(&mut self) -> ObjectEnv<'_> {
        ObjectEnv::new(&mut self.identities, &self.assets, self.ticks)
    }
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self::new(ResourceLoader::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::Vec2;

    #[test]
    fn ticks_only_move_forward() {
        let mut runtime = RuntimeContext::default();
        assert_eq!(runtime.ticks(), 0);

        runtime.advance_tick();
        runtime.advance_tick();
        assert_eq!(runtime.ticks(), 2);
        assert_eq!(runtime.object_env().ticks, 2);
    }

    #[test]
    fn camera_is_absent_until_set() {
        let mut runtime = RuntimeContext::default();
        assert!(runtime.camera().is_none());

        runtime.set_camera(Camera::new(Vec2::new(1.0, 2.0)));
        runtime.camera_mut().unwrap().zoom = 3.0;
        assert_eq!(runtime.camera().unwrap().zoom, 3.0);
    }
}
