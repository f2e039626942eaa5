//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use proscenium::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Application
pub use crate::application::{Application, ApplicationBuilder, DefaultHooks, GameHooks};
pub use crate::core::config::AppConfig;
pub use crate::core::error::BootError;

// Runtime context and frame driver
pub use crate::core::globals::RuntimeContext;
pub use crate::core::platform_bridge::{frame_channel, FrameEvent};

// Objects
pub use crate::core::identity::ObjectId;
pub use crate::core::object::{
    ActorState, Collider, ColliderOffset, GameObject, ObjectCommands, ObjectCore, ObjectRegistry,
    Sprite,
};

// Scenes
pub use crate::core::scene::{Scene, SceneContext, SceneId, SceneManager};

// Resources
pub use crate::core::resource::{AssetKind, AssetManifest, AssetRef, DeclaresAssets, ResourceLoader};

// Drawing and math
pub use crate::core::math::Vec2;
pub use crate::core::render::{Camera, Canvas};
