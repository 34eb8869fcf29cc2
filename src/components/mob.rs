//! Per-mob AI scratch state.
//!
//! These components are owned by the AI director and live on the mob
//! entity, so they disappear with it.

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Marks an entity driven by the AI director.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Mob;

/// Current AI state, re-evaluated every frame from the distance to the
/// possessed entity.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AiMode {
    #[default]
    Roaming,
    Chasing,
}

/// Wander heading. `None` until the first roll.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct RoamState {
    pub heading: Option<Vec3>,
    pub target_yaw: f32,
}

/// Milliseconds accumulated towards the next melee attack.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct AttackTimer {
    pub accumulated_ms: f32,
}
