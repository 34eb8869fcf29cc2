//! Spawner director.
//!
//! Each spawner spawns once as soon as it is first seen, then again every
//! `frequency_seconds`, as long as fewer than `max_concurrent` of its
//! children are alive or on their way. A cycle that finds the spawner full
//! is skipped, not postponed: the timer still restarts.
//!
//! Spawning only queues a recipe load; the mob appears at the start of the
//! next frame (see [`materialize_spawns`](crate::systems::spawns::materialize_spawns)).

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, info, warn};

use crate::components::behavior::Behavior;
use crate::components::effects::Dying;
use crate::components::entityid::EntityId;
use crate::components::spawner::SpawnerState;
use crate::components::transform::Transform;
use crate::resources::directors::DirectorSwitches;
use crate::resources::rng::SimRng;
use crate::resources::spawnqueue::{SpawnQueue, SpawnRequest};
use crate::resources::worldtime::WorldTime;

/// Children land within this many units of the spawner on X and Z.
pub const SPAWN_JITTER: f32 = 1.5;
pub const SPAWN_LIFT: f32 = 1.0;

pub fn spawner_director(
    switches: Res<DirectorSwitches>,
    time: Res<WorldTime>,
    mut rng: ResMut<SimRng>,
    mut queue: ResMut<SpawnQueue>,
    mut spawners: Query<
        (Entity, &EntityId, &Transform, &Behavior, &mut SpawnerState),
        Without<Dying>,
    >,
) {
    if !switches.spawners {
        return;
    }
    let now = time.elapsed;
    for (entity, id, transform, behavior, mut state) in spawners.iter_mut() {
        let Behavior::Spawner(role) = behavior else {
            continue;
        };
        if role.spawn_type.is_empty() || role.frequency_seconds <= 0.0 {
            continue;
        }
        let full = state.occupancy() >= role.max_concurrent;
        if !full {
            state.cap_logged = false;
        }
        let due = match state.last_spawn {
            None => true,
            Some(last) => now - last >= role.frequency_seconds,
        };
        if !due {
            continue;
        }
        state.last_spawn = Some(now);

        if full {
            if !state.cap_logged {
                warn!(
                    "spawner {} at capacity ({}), skipping",
                    id.as_str(),
                    role.max_concurrent
                );
                state.cap_logged = true;
            }
            continue;
        }

        let position = transform.position
            + Vec3::new(
                rng.jitter(SPAWN_JITTER),
                SPAWN_LIFT,
                rng.jitter(SPAWN_JITTER),
            );
        state.pending += 1;
        queue.push(SpawnRequest {
            recipe_id: role.spawn_type.clone(),
            position,
            spawner: entity,
        });
        debug!(
            "spawner {} requested '{}' ({} alive)",
            id.as_str(),
            role.spawn_type,
            state.active_children.len()
        );
    }
}

pub fn set_spawners_enabled(world: &mut World, enabled: bool) {
    world.resource_mut::<DirectorSwitches>().spawners = enabled;
    info!("spawners {}", if enabled { "enabled" } else { "disabled" });
}
