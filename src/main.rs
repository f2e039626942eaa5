//=========================================================================
// Proscenium Demo
//
// Headless two-scene demo. A driver thread plays the role of the window
// and sends one frame event per `frame_time`, then closes.
//
// Usage:
//   proscenium-demo [config.toml]
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::Duration;

use env_logger::Env;
use log::{debug, error, info, trace};

//=== Internal Dependencies ===============================================

use proscenium::core::error::BootError;
use proscenium::core::object::DEFAULT_SPEED;
use proscenium::prelude::*;

//=== Constants ===========================================================

const DEMO_FRAMES: u32 = 600;
const SCENE_SECONDS: u64 = 3;

//=== Canvas ==============================================================

struct LogCanvas;

impl Canvas for LogCanvas {
    fn draw_sprite(&mut self, sprite: &Sprite, position: Vec2) {
        trace!("draw '{}' at ({:.1}, {:.1})", sprite.name(), position.x, position.y);
    }
}

//=== Objects =============================================================

/// Actor that walks towards a goal and picks a new one on arrival.
struct Wanderer {
    core: ObjectCore,
    actor: ActorState,
    goal: Vec2,
}

impl Wanderer {
    fn new(core: ObjectCore, goal: Vec2) -> Self {
        let mut actor = ActorState::new();
        actor.set_collider(Collider::new(16.0, 16.0, ColliderOffset::Center));
        Self { core, actor, goal }
    }
}

impl GameObject for Wanderer {
    fn core(&self) -> &ObjectCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ObjectCore {
        &mut self.core
    }

    fn step(&mut self, cmds: &mut ObjectCommands<'_>, delta: f32) {
        if self.core.distance_to(self.goal) < 2.0 {
            let t = cmds.ticks() as f32;
            self.goal = Vec2::new((t * 37.0) % 720.0, (t * 53.0) % 480.0);
            debug!("Object {} heads for ({:.0}, {:.0})", self.core.id(), self.goal.x, self.goal.y);
        }
        self.core.move_towards(self.goal, 60.0 * delta);
    }

    fn actor(&self) -> Option<&ActorState> {
        Some(&self.actor)
    }

    fn actor_mut(&mut self) -> Option<&mut ActorState> {
        Some(&mut self.actor)
    }
}

/// Plain object that lives for a fixed time.
struct Ember {
    core: ObjectCore,
}

impl Ember {
    fn new(core: ObjectCore, lifetime: f32) -> Self {
        let mut ember = Self { core };
        if let Err(err) = ember.core.set_alarm(0, lifetime, ObjectCore::queue_dispose) {
            error!("Ember alarm refused: {}", err);
        }
        ember
    }
}

impl GameObject for Ember {
    fn core(&self) -> &ObjectCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ObjectCore {
        &mut self.core
    }

    fn step(&mut self, _cmds: &mut ObjectCommands<'_>, delta: f32) {
        self.core.translate(Vec2::new(0.0, -DEFAULT_SPEED * delta));
    }
}

//=== Scenes ==============================================================

/// Scene that advances to the next one every few seconds.
struct Showcase {
    name: &'static str,
    spawn: fn(&mut SceneContext<'_>),
    entered_at: u64,
    fps: u64,
}

impl Scene for Showcase {
    fn name(&self) -> &str {
        self.name
    }

    fn create(&mut self, ctx: &mut SceneContext<'_>) {
        (self.spawn)(ctx);
        info!("Created scene '{}'", self.name);
    }

    fn step(&mut self, ctx: &mut SceneContext<'_>, _delta: f32) {
        if self.entered_at == 0 {
            self.entered_at = ctx.ticks();
        }
        if ctx.ticks() - self.entered_at >= SCENE_SECONDS * self.fps {
            self.entered_at = 0;
            info!("Leaving '{}' with {} objects", self.name, ctx.objects().len());
            ctx.go_to_next();
        }
    }
}

fn spawn_meadow(ctx: &mut SceneContext<'_>) {
    for i in 0..4 {
        let start = Vec2::new(100.0 * i as f32, 40.0 * i as f32);
        ctx.spawn(move |core| Wanderer::new(core.at(start), Vec2::new(360.0, 240.0)));
    }
}

fn spawn_hearth(ctx: &mut SceneContext<'_>) {
    for i in 0..8 {
        let lifetime = 0.5 + 0.25 * i as f32;
        ctx.spawn(move |core| Ember::new(core.at(Vec2::new(360.0, 400.0)), lifetime));
    }
}

//=== Entry Point =========================================================

fn load_config() -> Result<AppConfig, BootError> {
    match std::env::args().nth(1) {
        Some(path) => Ok(AppConfig::load_from_file(path)?),
        None => Ok(AppConfig::default()),
    }
}

fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
            error!("{}", err);
            std::process::exit(err.status_code());
        }
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_filter.as_str()))
        .init();

    let frame_time = Duration::from_secs_f32(config.frame_time());
    let fps = u64::from(config.target_fps);

    let mut app = ApplicationBuilder::new()
        .with_config(config)
        .with_canvas(LogCanvas)
        .with_scene(Showcase {
            name: "meadow",
            spawn: spawn_meadow,
            entered_at: 0,
            fps,
        })
        .with_scene(Showcase {
            name: "hearth",
            spawn: spawn_hearth,
            entered_at: 0,
            fps,
        })
        .build();

    let (driver, frames) = frame_channel();
    let delta = frame_time.as_secs_f32();
    thread::spawn(move || {
        for _ in 0..DEMO_FRAMES {
            thread::sleep(frame_time);
            if driver.send(FrameEvent::Frame { delta }).is_err() {
                return;
            }
        }
        let _ = driver.send(FrameEvent::Closed);
    });

    std::process::exit(app.launch(frames));
}
