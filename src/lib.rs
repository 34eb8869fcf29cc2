//! Verse engine library.
//!
//! Simulation core of an in-browser 3D world editor: entity registry,
//! combat, mob AI, spawners, drivable vehicles, races and world save/load.
//! Rendering, picking and GUI stay on the host side; the core talks to
//! them through [`events::host`] and [`events::visual`].
//!
//! - [`components`] – ECS components of logical entities
//! - [`engine`] – world setup, frame schedule and host command dispatch
//! - [`events`] – host commands/callbacks, presentation commands, damage
//! - [`math`] – small angle and heading helpers
//! - [`metadata`] – selection metadata and metadata patches
//! - [`registry`] – entity creation, editing and destruction
//! - [`resources`] – ECS resources (config, physics, recipes, directors, ...)
//! - [`serializer`] – world document export and import
//! - [`systems`] – per-frame directors

pub mod components;
pub mod engine;
pub mod events;
pub mod math;
pub mod metadata;
pub mod registry;
pub mod resources;
pub mod serializer;
pub mod systems;
