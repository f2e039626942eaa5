//=========================================================================
// Application
//
// Top-level driver: owns the scene list, the shared runtime context and
// the resource pipeline, and runs the boot sequence.
//
// Architecture:
// ```text
//     ApplicationBuilder ──build()──> Application ──launch(rx)──> exit code
//         │                               │
//         ├─ with_config()                ├─ boot()   pre_load → discover
//         ├─ with_backend()               │           → load → init
//         ├─ with_manifest()              │           → default scene → start
//         ├─ with_scene()                 ├─ run(rx)  one frame per FrameEvent
//         └─ with_hooks()                 └─ dispose()
// ```
//
// Boot is strictly ordered and runs once. A failing step aborts it with
// a `BootError`; `launch` is the single place that error is caught.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::Receiver;
use log::{debug, error, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::config::AppConfig;
use crate::core::error::BootError;
use crate::core::globals::RuntimeContext;
use crate::core::platform_bridge::{FrameCollector, FrameEvent, TickControl};
use crate::core::render::{Camera, Canvas, NullCanvas};
use crate::core::resource::{
    AssetBackend, AssetManifest, DeclaresAssets, FileBackend, ResourceLoader, ResourceScanner,
};
use crate::core::scene::{Scene, SceneId, SceneManager};

//=== GameHooks ===========================================================

/// Application-specific steps of the boot sequence.
///
/// Every hook has a default, so an application only overrides what it needs.
pub trait GameHooks {
    /// Runs first, before any resource is discovered. Default: creates the
    /// shared camera.
    fn pre_load(&mut self, runtime: &mut RuntimeContext) {
        runtime.set_camera(Camera::default());
    }

    /// Runs once every resource has loaded. Scenes may be registered or
    /// made current here.
    fn init(&mut self, _scenes: &mut SceneManager, _runtime: &mut RuntimeContext) {}

    /// Runs last, once a scene is current.
    fn start(&mut self, _scenes: &mut SceneManager, _runtime: &mut RuntimeContext) {}
}

/// Hooks that keep every default.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHooks;

impl GameHooks for DefaultHooks {}

//=== ApplicationBuilder ==================================================

/// Builder for configuring and constructing an [`Application`].
///
/// # Default Values
///
/// - **Config**: [`AppConfig::default`] (720x480 at 60 fps, assets under `.`)
/// - **Backend**: [`FileBackend`]
/// - **Canvas**: [`NullCanvas`]
///
/// ```no_run
/// use proscenium::prelude::*;
///
/// struct Menu;
///
/// impl Scene for Menu {
///     fn name(&self) -> &str { "menu" }
///     fn create(&mut self, _ctx: &mut SceneContext<'_>) {}
/// }
///
/// let (_driver, frames) = frame_channel();
/// let code = ApplicationBuilder::new()
///     .with_scene(Menu)
///     .build()
///     .launch(frames);
/// std::process::exit(code);
/// ```
pub struct ApplicationBuilder {
    config: AppConfig,
    backend: Box<dyn AssetBackend>,
    canvas: Box<dyn Canvas>,
    manifest: AssetManifest,
    scenes: Vec<Box<dyn Scene>>,
    hooks: Box<dyn GameHooks>,
}

impl ApplicationBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            backend: Box::new(FileBackend::new()),
            canvas: Box::new(NullCanvas),
            manifest: AssetManifest::new(),
            scenes: Vec::new(),
            hooks: Box::new(DefaultHooks),
        }
    }

    /// Replaces the configuration.
    ///
    /// # Panics
    ///
    /// Panics if the window size or `target_fps` is zero.
    pub fn with_config(mut self, config: AppConfig) -> Self {
        assert!(
            config.width > 0 && config.height > 0,
            "Window size must be positive, got {}x{}",
            config.width,
            config.height
        );
        assert!(config.target_fps > 0, "Target FPS must be positive");
        self.config = config;
        self
    }

    /// Sets the backend resources are loaded through.
    pub fn with_backend<B>(mut self, backend: B) -> Self
    where
        B: AssetBackend + 'static,
    {
        self.backend = Box::new(backend);
        self
    }

    /// Sets the surface actors are drawn on.
    pub fn with_canvas<C>(mut self, canvas: C) -> Self
    where
        C: Canvas + 'static,
    {
        self.canvas = Box::new(canvas);
        self
    }

    /// Replaces the asset manifest.
    pub fn with_manifest(mut self, manifest: AssetManifest) -> Self {
        self.manifest = manifest;
        self
    }

    /// Adds the assets `T` declares to the manifest.
    pub fn with_assets<T: DeclaresAssets>(mut self) -> Self {
        self.manifest.register::<T>();
        self
    }

    /// Appends a scene. Registration order is scene id order.
    pub fn with_scene<T>(mut self, scene: T) -> Self
    where
        T: Scene + 'static,
    {
        self.scenes.push(Box::new(scene));
        self
    }

    /// Sets the boot hooks. Default: [`DefaultHooks`].
    pub fn with_hooks<H>(mut self, hooks: H) -> Self
    where
        H: GameHooks + 'static,
    {
        self.hooks = Box::new(hooks);
        self
    }

    /// Builds the application. Nothing is loaded until [`Application::boot`].
    pub fn build(self) -> Application {
        info!(
            "Building application '{}' ({}x{} @ {} fps, {} scenes)",
            self.config.title,
            self.config.width,
            self.config.height,
            self.config.target_fps,
            self.scenes.len()
        );

        let mut scenes = SceneManager::new();
        for scene in self.scenes {
            scenes.register_boxed(scene);
        }

        Application {
            config: self.config,
            scenes,
            runtime: RuntimeContext::new(ResourceLoader::new(self.backend)),
            manifest: self.manifest,
            canvas: self.canvas,
            hooks: self.hooks,
            state: AppState::Created,
        }
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Application =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppState {
    Created,
    Running,
    /// A boot step failed. Terminal until disposed.
    Failed,
    Disposed,
}

/// The running application. Create via [`ApplicationBuilder`].
pub struct Application {
    config: AppConfig,
    scenes: SceneManager,
    runtime: RuntimeContext,
    manifest: AssetManifest,
    canvas: Box<dyn Canvas>,
    hooks: Box<dyn GameHooks>,
    state: AppState,
}

impl Application {
    //--- Boot -------------------------------------------------------------

    /// Runs the boot sequence:
    ///
    /// 1. `pre_load` hook
    /// 2. discover every declared resource and enqueue it
    /// 3. load until done, then the `init` hook
    /// 4. make scene 0 current unless `init` picked one
    /// 5. `start` hook
    ///
    /// Boot runs once, successful or not; later calls only log.
    pub fn boot(&mut self) -> Result<(), BootError> {
        if self.state != AppState::Created {
            warn!("Boot already ran ({:?}), ignoring", self.state);
            return Ok(());
        }

        let result = self.boot_steps();
        self.state = match result {
            Ok(()) => AppState::Running,
            Err(_) => AppState::Failed,
        };
        result
    }

    fn boot_steps(&mut self) -> Result<(), BootError> {
        //--- 1. Pre-load --------------------------------------------------
        self.hooks.pre_load(&mut self.runtime);

        //--- 2. Discover and queue resources -----------------------------
        let scanner = ResourceScanner::new(&self.config.asset_root)
            .with_namespace(self.config.namespace.as_str());
        let requests = scanner.discover(&self.manifest)?;
        self.runtime.assets_mut().enqueue(&requests);

        //--- 3. Load, then init -------------------------------------------
        self.runtime.assets_mut().finish_loading()?;
        self.hooks.init(&mut self.scenes, &mut self.runtime);

        //--- 4. Default scene ---------------------------------------------
        if self.scenes.current().is_none() {
            if self.scenes.is_empty() {
                return Err(BootError::NoDefaultScene);
            }
            self.scenes.set_current_scene(SceneId::new(0), &mut self.runtime);
        }

        //--- 5. Start -----------------------------------------------------
        self.hooks.start(&mut self.scenes, &mut self.runtime);

        info!("Boot complete, {} scenes registered", self.scenes.len());
        Ok(())
    }

    //--- Execution --------------------------------------------------------

    /// Runs one frame of the current scene, then applies queued scene
    /// transitions.
    pub fn frame(&mut self, delta: f32) {
        if self.state != AppState::Running {
            warn!("Frame requested while application is not running");
            return;
        }

        self.runtime.advance_tick();
        self.scenes
            .render(&mut self.runtime, self.canvas.as_mut(), delta);
        self.scenes.process_transitions(&mut self.runtime);
    }

    /// Runs one frame per `FrameEvent::Frame` until the driver sends
    /// `Closed` or hangs up.
    pub fn run(&mut self, receiver: Receiver<FrameEvent>) {
        info!("Entering frame loop");
        let mut collector = FrameCollector::new(receiver);

        loop {
            let control = collector.collect_frame();
            trace!("Collected {} frames", collector.deltas().len());

            for delta in collector.take_deltas() {
                self.frame(delta);
            }

            if control == TickControl::Exit {
                break;
            }
        }

        info!("Frame loop exited after {} ticks", self.runtime.ticks());
    }

    /// Boots, runs until the driver closes, and disposes.
    ///
    /// Returns the process status: 0 on a clean exit, the error's status
    /// code when boot fails.
    pub fn launch(&mut self, receiver: Receiver<FrameEvent>) -> i32 {
        if let Err(err) = self.boot() {
            error!("Boot failed: {}", err);
            self.dispose();
            return err.status_code();
        }

        if self.is_running() {
            self.run(receiver);
        }
        self.dispose();
        0
    }

    /// Drops every scene's objects and closes open data streams.
    pub fn dispose(&mut self) {
        if self.state == AppState::Disposed {
            return;
        }

        self.scenes.dispose(&mut self.runtime);

        let data = self.runtime.data_mut();
        data.stop_reading();
        if let Err(err) = data.stop_writing() {
            error!("Failed to flush data stream: {}", err);
        }

        self.state = AppState::Disposed;
        debug!("Application disposed");
    }

    //--- Scene Switching --------------------------------------------------

    /// Makes `id` current, creating it on first activation. Returns
    /// `false` for an unknown id.
    pub fn set_current_scene(&mut self, id: SceneId) -> bool {
        self.scenes.set_current_scene(id, &mut self.runtime)
    }

    /// Advances to the next scene, wrapping to the first.
    pub fn go_to_next_scene(&mut self) -> Option<SceneId> {
        self.scenes.go_to_next_scene(&mut self.runtime)
    }

    //--- Accessors --------------------------------------------------------

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    /// Shared state: identities, assets, camera, ticks, data channel.
    pub fn runtime(&self) -> &RuntimeContext {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut RuntimeContext {
        &mut self.runtime
    }

    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    /// Whether boot completed and the application has not been disposed.
    pub fn is_running(&self) -> bool {
        self.state == AppState::Running
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{EXIT_NO_DEFAULT_SCENE, EXIT_RESOURCE_NOT_FOUND};
    use crate::core::identity::ObjectId;
    use crate::core::object::{GameObject, ObjectCommands, ObjectCore};
    use crate::core::platform_bridge::frame_channel;
    use crate::core::resource::{AssetKind, AssetRef};
    use crate::core::scene::SceneContext;
    use std::cell::{Cell, RefCell};
    use std::fs;
    use std::rc::Rc;

    //--- Fixtures ---------------------------------------------------------

    struct Named {
        name: &'static str,
        creates: Rc<Cell<u32>>,
    }

    impl Named {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                creates: Rc::new(Cell::new(0)),
            }
        }
    }

    impl Scene for Named {
        fn name(&self) -> &str {
            self.name
        }

        fn create(&mut self, _ctx: &mut SceneContext<'_>) {
            self.creates.set(self.creates.get() + 1);
        }
    }

    struct Blip {
        core: ObjectCore,
    }

    impl GameObject for Blip {
        fn core(&self) -> &ObjectCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut ObjectCore {
            &mut self.core
        }

        fn step(&mut self, _cmds: &mut ObjectCommands<'_>, _delta: f32) {}
    }

    /// Spawns one object on create and records its id.
    struct Spawner {
        spawned: Rc<Cell<Option<ObjectId>>>,
    }

    impl Scene for Spawner {
        fn name(&self) -> &str {
            "spawner"
        }

        fn create(&mut self, ctx: &mut SceneContext<'_>) {
            let id = ctx.spawn(|core| Blip { core });
            assert!(!ctx.objects().contains(id));
            self.spawned.set(Some(id));
        }
    }

    fn two_scene_app() -> Application {
        ApplicationBuilder::new()
            .with_scene(Named::new("a"))
            .with_scene(Named::new("b"))
            .build()
    }

    //--- Builder ----------------------------------------------------------

    #[test]
    fn builder_defaults() {
        let app = ApplicationBuilder::new().build();
        assert_eq!(app.config(), &AppConfig::default());
        assert!(app.scenes().is_empty());
        assert!(!app.is_running());
    }

    #[test]
    #[should_panic(expected = "Target FPS must be positive")]
    fn builder_with_config_panics_on_zero_fps() {
        ApplicationBuilder::new().with_config(AppConfig {
            target_fps: 0,
            ..AppConfig::default()
        });
    }

    //--- Boot -------------------------------------------------------------

    #[test]
    fn boot_activates_first_scene_and_creates_camera() {
        let mut app = two_scene_app();
        app.boot().unwrap();

        assert!(app.is_running());
        assert_eq!(app.scenes().current(), Some(SceneId::new(0)));
        assert!(app.runtime().camera().is_some());
        assert!(app.scenes().scene(SceneId::new(0)).unwrap().is_initialized());
        assert!(!app.scenes().scene(SceneId::new(1)).unwrap().is_initialized());
    }

    #[test]
    fn next_scene_from_first_visits_b_a_b() {
        let mut app = two_scene_app();
        app.boot().unwrap();

        let visited: Vec<_> = (0..3).filter_map(|_| app.go_to_next_scene()).collect();
        assert_eq!(
            visited,
            vec![SceneId::new(1), SceneId::new(0), SceneId::new(1)]
        );
    }

    #[test]
    fn repeated_activation_creates_once() {
        let scene = Named::new("solo");
        let creates = Rc::clone(&scene.creates);
        let mut app = ApplicationBuilder::new().with_scene(scene).build();
        app.boot().unwrap();

        for _ in 0..4 {
            app.set_current_scene(SceneId::new(0));
        }
        assert_eq!(creates.get(), 1);
    }

    #[test]
    fn empty_scene_list_fails_with_no_default_scene() {
        let mut app = ApplicationBuilder::new().build();
        let err = app.boot().unwrap_err();

        assert!(matches!(err, BootError::NoDefaultScene));
        assert_eq!(err.status_code(), EXIT_NO_DEFAULT_SCENE);
    }

    #[test]
    fn missing_resource_fails_launch_without_enqueuing() {
        static FOUND: AssetRef = AssetRef::new("found.png", AssetKind::Texture);
        static LOST: AssetRef = AssetRef::new("lost.png", AssetKind::Texture);

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("found.png"), b"png").unwrap();

        let mut manifest = AssetManifest::new();
        manifest.register_table("game::Hero", &[&FOUND, &LOST]);

        let mut app = ApplicationBuilder::new()
            .with_config(AppConfig {
                asset_root: dir.path().to_path_buf(),
                ..AppConfig::default()
            })
            .with_manifest(manifest)
            .with_scene(Named::new("a"))
            .build();

        let (_tx, rx) = frame_channel();
        assert_eq!(app.launch(rx), EXIT_RESOURCE_NOT_FOUND);
        assert_eq!(app.runtime().assets().enqueued(), 0);
        assert!(FOUND.resolved().is_none());
        assert!(!app.is_running());
    }

    #[test]
    fn init_runs_after_assets_are_loaded() {
        static BANNER: AssetRef = AssetRef::new("banner.png", AssetKind::Texture);

        struct CheckLoaded {
            saw_asset: Rc<Cell<bool>>,
        }

        impl GameHooks for CheckLoaded {
            fn init(&mut self, _scenes: &mut SceneManager, runtime: &mut RuntimeContext) {
                let loaded = runtime.assets().is_finished() && runtime.assets().sprite(&BANNER).is_ok();
                self.saw_asset.set(loaded);
            }
        }

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("banner.png"), b"png").unwrap();
        let mut manifest = AssetManifest::new();
        manifest.register_table("game::Title", &[&BANNER]);

        let saw_asset = Rc::new(Cell::new(false));
        let mut app = ApplicationBuilder::new()
            .with_config(AppConfig {
                asset_root: dir.path().to_path_buf(),
                ..AppConfig::default()
            })
            .with_manifest(manifest)
            .with_scene(Named::new("title"))
            .with_hooks(CheckLoaded {
                saw_asset: Rc::clone(&saw_asset),
            })
            .build();

        app.boot().unwrap();
        assert!(saw_asset.get());
    }

    #[test]
    fn scene_chosen_in_init_is_kept() {
        struct PickSecond;

        impl GameHooks for PickSecond {
            fn init(&mut self, scenes: &mut SceneManager, runtime: &mut RuntimeContext) {
                scenes.set_current_scene(SceneId::new(1), runtime);
            }
        }

        let mut app = ApplicationBuilder::new()
            .with_scene(Named::new("a"))
            .with_scene(Named::new("b"))
            .with_hooks(PickSecond)
            .build();
        app.boot().unwrap();

        assert_eq!(app.scenes().current(), Some(SceneId::new(1)));
        assert!(!app.scenes().scene(SceneId::new(0)).unwrap().is_initialized());
    }

    #[test]
    fn hooks_run_in_boot_order() {
        struct Recorder(Rc<RefCell<Vec<&'static str>>>);

        impl GameHooks for Recorder {
            fn pre_load(&mut self, _runtime: &mut RuntimeContext) {
                self.0.borrow_mut().push("pre_load");
            }

            fn init(&mut self, scenes: &mut SceneManager, _runtime: &mut RuntimeContext) {
                assert!(scenes.current().is_none());
                self.0.borrow_mut().push("init");
            }

            fn start(&mut self, scenes: &mut SceneManager, _runtime: &mut RuntimeContext) {
                assert!(scenes.current().is_some());
                self.0.borrow_mut().push("start");
            }
        }

        let order = Rc::new(RefCell::new(Vec::new()));
        let mut app = ApplicationBuilder::new()
            .with_scene(Named::new("a"))
            .with_hooks(Recorder(Rc::clone(&order)))
            .build();
        app.boot().unwrap();
        app.boot().unwrap();

        assert_eq!(*order.borrow(), vec!["pre_load", "init", "start"]);
    }

    //--- Frames -----------------------------------------------------------

    #[test]
    fn spawned_object_is_live_after_first_frame() {
        let spawned = Rc::new(Cell::new(None));
        let mut app = ApplicationBuilder::new()
            .with_scene(Spawner {
                spawned: Rc::clone(&spawned),
            })
            .build();
        app.boot().unwrap();

        let id = spawned.get().unwrap();
        let slot = app.scenes().current_scene().unwrap();
        assert!(!slot.objects().contains(id));
        assert!(slot.objects().is_pending(id));

        app.frame(1.0 / 60.0);
        assert!(app.scenes().current_scene().unwrap().objects().contains(id));
    }

    #[test]
    fn run_consumes_frames_until_closed() {
        let mut app = two_scene_app();
        app.boot().unwrap();

        let (tx, rx) = frame_channel();
        for _ in 0..3 {
            tx.send(FrameEvent::Frame { delta: 0.016 }).unwrap();
        }
        tx.send(FrameEvent::Closed).unwrap();

        app.run(rx);
        assert_eq!(app.runtime().ticks(), 3);
    }

    #[test]
    fn launch_returns_zero_on_clean_exit() {
        let mut app = two_scene_app();
        let (tx, rx) = frame_channel();
        tx.send(FrameEvent::Frame { delta: 0.016 }).unwrap();
        drop(tx);

        assert_eq!(app.launch(rx), 0);
        assert_eq!(app.runtime().ticks(), 1);
        assert!(!app.is_running());
    }

    #[test]
    fn failed_boot_is_not_restartable() {
        static MISSING: AssetRef = AssetRef::new("missing.png", AssetKind::Texture);

        struct CountPreLoad(Rc<Cell<u32>>);

        impl GameHooks for CountPreLoad {
            fn pre_load(&mut self, _runtime: &mut RuntimeContext) {
                self.0.set(self.0.get() + 1);
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let mut manifest = AssetManifest::new();
        manifest.register_table("game::Ghost", &[&MISSING]);

        let pre_loads = Rc::new(Cell::new(0));
        let mut app = ApplicationBuilder::new()
            .with_config(AppConfig {
                asset_root: dir.path().to_path_buf(),
                ..AppConfig::default()
            })
            .with_manifest(manifest)
            .with_scene(Named::new("a"))
            .with_hooks(CountPreLoad(Rc::clone(&pre_loads)))
            .build();

        assert_eq!(app.boot().unwrap_err().status_code(), EXIT_RESOURCE_NOT_FOUND);
        assert!(app.boot().is_ok());
        assert_eq!(pre_loads.get(), 1);
        assert!(!app.is_running());
        assert!(app.scenes().current().is_none());
    }
}
