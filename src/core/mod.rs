//=========================================================================
// Core Systems
//=========================================================================
//
// Everything the application drives, leaf modules first:
//
//   math, identity, alarm          value types and small containers
//   object                         runtime objects and their registry
//   resource                       discovery and progressive loading
//   scene                          scene list, slots and transitions
//   globals                        shared runtime context
//   platform_bridge                frame driver channel
//   config, error, render, storage ambient support
//
//=========================================================================

//=== Module Declarations =================================================

pub mod alarm;
pub mod config;
pub mod error;
pub mod globals;
pub mod identity;
pub mod math;
pub mod object;
pub mod platform_bridge;
pub mod render;
pub mod resource;
pub mod scene;
pub mod storage;
