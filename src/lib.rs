//=========================================================================
// Proscenium Library Root
//
// This crate defines the public API surface of Proscenium, a scene-based
// runtime core.
//
// Responsibilities:
// - Expose the application facade (`Application`, `ApplicationBuilder`)
// - Expose the core systems (objects, scenes, resources) for extension
// - Keep the frame loop plumbing private
//
// Typical usage:
// ```no_run
// use proscenium::prelude::*;
//
// let (driver, frames) = frame_channel();
// let code = ApplicationBuilder::new().build().launch(frames);
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains the runtime systems: identities, alarms, objects,
// resources, scenes and the shared runtime context.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `application` defines the boot sequence and the frame loop.
//
mod application;

//--- Public Exports ------------------------------------------------------

pub use application::{Application, ApplicationBuilder, DefaultHooks, GameHooks};
