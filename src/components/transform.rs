//! Last known world transform of an entity.
//!
//! Physics owns motion. [`Transform`] is a per-frame snapshot written by
//! [`sync_transforms`](crate::systems::physics::sync_transforms) so that
//! systems and the serializer can read positions without touching the
//! physics facade.

use bevy_ecs::prelude::Component;
use glam::Vec3;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians. Only `y` (yaw) is driven by physics.
    pub rotation: Vec3,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn yaw(&self) -> f32 {
        self.rotation.y
    }
}
