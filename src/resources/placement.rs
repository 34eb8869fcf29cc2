use bevy_ecs::prelude::Resource;
use glam::Vec3;

use crate::components::entitykind::DirectKind;
use crate::resources::rng::SimRng;

pub const RING_MIN_RADIUS: f32 = 8.0;
pub const RING_RADIUS_SPREAD: f32 = 7.0;
pub const RING_MIN_STEP: f32 = 0.8;
pub const RING_STEP_JITTER: f32 = 0.4;

/// Ring placement for toolbar spawns.
///
/// Each call advances the angle by at least [`RING_MIN_STEP`] radians so
/// consecutive spawns land apart, at a distance of 8 to 15 units from the
/// centre.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct SpawnPlacement {
    pub angle: f32,
}

impl SpawnPlacement {
    pub fn next(&mut self, center: Vec3, lift: f32, rng: &mut SimRng) -> Vec3 {
        let distance = RING_MIN_RADIUS + rng.unit() * RING_RADIUS_SPREAD;
        self.angle += RING_MIN_STEP + rng.unit() * RING_STEP_JITTER;
        Vec3::new(
            center.x + self.angle.cos() * distance,
            center.y + lift,
            center.z + self.angle.sin() * distance,
        )
    }
}

/// Height above the ring centre at which a toolbar spawn appears.
pub fn spawn_lift(kind: Option<DirectKind>) -> f32 {
    match kind {
        Some(DirectKind::Car) => 0.6,
        Some(DirectKind::Walker) => 1.25,
        _ => 1.0,
    }
}
