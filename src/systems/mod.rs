//! Engine systems.
//!
//! Every director of the simulation is a system here. The orchestrator
//! ([`Engine::frame`](crate::engine::Engine::frame)) runs them in a fixed
//! order; exclusive helpers (`fn(&mut World, ..)`) serve host commands.
//!
//! Submodules overview
//! - [`ai`] – mob roam/chase state machine, melee, player attack
//! - [`animation`] – walker leg swing
//! - [`combat`] – damage observer, hit effects, death and health bars
//! - [`drive`] – possession, drive control laws, chase camera
//! - [`physics`] – physics stepping and transform sync
//! - [`race`] – finish zone detection and race timer
//! - [`spawner`] – timed spawning with capacity caps
//! - [`spawns`] – materialize spawner requests queued last frame
//! - [`telemetry`] – periodic stats and race timer callbacks
//! - [`time`] – advance the simulated clock

pub mod ai;
pub mod animation;
pub mod combat;
pub mod drive;
pub mod physics;
pub mod race;
pub mod spawner;
pub mod spawns;
pub mod telemetry;
pub mod time;
