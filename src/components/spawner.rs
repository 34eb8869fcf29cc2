//! Spawner bookkeeping.

use bevy_ecs::prelude::{Component, Entity};
use rustc_hash::FxHashSet;

/// Runtime state of a spawner, owned by the spawner director.
#[derive(Component, Clone, Debug, Default)]
pub struct SpawnerState {
    /// World time (seconds) of the last spawn attempt. `None` until the
    /// spawner has been observed once.
    pub last_spawn: Option<f32>,
    /// Ids of spawned children that are still alive.
    pub active_children: FxHashSet<String>,
    /// Spawn requests queued but not yet materialized.
    pub pending: usize,
    /// Set once the "at capacity" message was logged, cleared when a spawn
    /// goes through again.
    pub cap_logged: bool,
}

impl SpawnerState {
    /// Children alive plus children on their way.
    pub fn occupancy(&self) -> usize {
        self.active_children.len() + self.pending
    }
}

/// Back-reference from a spawned mob to its spawner.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnedBy(pub Entity);
