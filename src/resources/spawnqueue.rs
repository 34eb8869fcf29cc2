use bevy_ecs::prelude::{Entity, Resource};
use glam::Vec3;

/// A mob a spawner asked for, waiting for its recipe to load.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRequest {
    pub recipe_id: String,
    pub position: Vec3,
    pub spawner: Entity,
}

/// Recipe loads requested by spawners during a frame.
///
/// Requests are materialized at the start of the next frame. Until then the
/// new mob does not exist and no director can see it; the spawner counts it
/// as pending against its capacity.
#[derive(Resource, Debug, Default)]
pub struct SpawnQueue {
    pub pending: Vec<SpawnRequest>,
}

impl SpawnQueue {
    pub fn push(&mut self, request: SpawnRequest) {
        self.pending.push(request);
    }

    pub fn take(&mut self) -> Vec<SpawnRequest> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
