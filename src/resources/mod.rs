//! ECS resources shared by the simulation systems.
//!
//! Submodules overview:
//! - [`camera`] – active camera mode and position
//! - [`config`] – INI-backed engine configuration
//! - [`dashboard`] – dashboard data loading and layout
//! - [`directors`] – on/off switches for AI, combat and spawners
//! - [`drive`] – drive controller state and tuning constants
//! - [`driveinput`] – held directional keys
//! - [`entityindex`] – id -> entity lookup and id issuing
//! - [`environment`] – sky, fog and ground settings
//! - [`hostbridge`] – channel carrying callbacks to the host
//! - [`kinematic`] – built-in physics backend
//! - [`physics`] – physics facade contract and resource
//! - [`placement`] – ring placement of toolbar spawns
//! - [`possession`] – the single player-controlled entity
//! - [`race`] – race state machine
//! - [`recipes`] – recipe templates and the ordered resolver
//! - [`rng`] – seedable simulation randomness
//! - [`spawnqueue`] – spawner recipe loads awaiting materialization
//! - [`telemetry`] – periodic stats loop state and renderer figures
//! - [`worldtime`] – simulated clock

pub mod camera;
pub mod config;
pub mod dashboard;
pub mod directors;
pub mod drive;
pub mod driveinput;
pub mod entityindex;
pub mod environment;
pub mod hostbridge;
pub mod kinematic;
pub mod physics;
pub mod placement;
pub mod possession;
pub mod race;
pub mod recipes;
pub mod rng;
pub mod spawnqueue;
pub mod telemetry;
pub mod worldtime;
