//! Physics stepping and transform sync.
//!
//! The physics backend owns motion. Once per frame it is stepped with the
//! scaled frame delta, then [`sync_transforms`] copies body positions and
//! yaw into each entity's [`Transform`] so every director reads positions
//! already advanced for this frame.

use bevy_ecs::prelude::*;

use crate::components::physicsbody::PhysicsBody;
use crate::components::transform::Transform;
use crate::resources::physics::Physics;
use crate::resources::worldtime::WorldTime;

/// Step the physics backend by the current frame delta.
pub fn step_physics(world: &mut World) {
    let dt = world.resource::<WorldTime>().delta;
    if dt <= 0.0 {
        return;
    }
    world.resource_mut::<Physics>().step(dt);
}

/// Copy body state into `Transform`. Entities whose body is gone keep their
/// last known transform.
pub fn sync_transforms(physics: Res<Physics>, mut query: Query<(&PhysicsBody, &mut Transform)>) {
    for (body, mut transform) in query.iter_mut() {
        if let Some(position) = physics.position(body.0) {
            transform.position = position;
        }
        if let Some(yaw) = physics.yaw(body.0) {
            transform.rotation.y = yaw;
        }
    }
}
