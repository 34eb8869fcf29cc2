//! Materialization of spawner requests.
//!
//! Spawners only queue requests (see
//! [`SpawnQueue`](crate::resources::spawnqueue::SpawnQueue)). At the start
//! of the next frame this system resolves each recipe and creates the mob,
//! so a mob is never half-built while a director looks at it.

use bevy_ecs::prelude::*;
use log::{debug, error};

use crate::components::entityid::EntityId;
use crate::components::spawner::{SpawnedBy, SpawnerState};
use crate::registry;
use crate::resources::spawnqueue::SpawnQueue;

/// Create the mobs requested last frame and hand them to their spawners.
///
/// The spawner's `pending` slot is released whatever the outcome. A mob
/// whose spawner died in the meantime is still created, untracked.
pub fn materialize_spawns(world: &mut World) {
    let requests = world.resource_mut::<SpawnQueue>().take();
    for request in requests {
        let result =
            registry::spawn_from_recipe(world, &request.recipe_id, request.position, None, None);
        if let Some(mut state) = world.get_mut::<SpawnerState>(request.spawner) {
            state.pending = state.pending.saturating_sub(1);
        }
        let child = match result {
            Ok(child) => child,
            Err(e) => {
                error!("spawner failed to create '{}': {}", request.recipe_id, e);
                continue;
            }
        };
        let Some(id) = world.get::<EntityId>(child).map(|id| id.0.clone()) else {
            continue;
        };
        let Some(mut state) = world.get_mut::<SpawnerState>(request.spawner) else {
            debug!("spawner of {} is gone, child left untracked", id);
            continue;
        };
        state.active_children.insert(id.clone());
        world.entity_mut(child).insert(SpawnedBy(request.spawner));
        debug!("spawner {:?} now tracks {}", request.spawner, id);
    }
}
