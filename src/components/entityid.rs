//! Identity components for logical entities.
//!
//! Every simulated entity carries an [`EntityId`], the stable string handle
//! used by the host, the serializer and spawner bookkeeping. The
//! [`EntityIndex`](crate::resources::entityindex::EntityIndex) resource maps
//! these ids back to ECS entities.

use bevy_ecs::prelude::Component;

/// Stable, session-unique identifier of a logical entity.
#[derive(Component, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Human readable name shown in the host's property panel.
///
/// For recipe instances this is the owner name (`"Ye Ole Shop"`,
/// `"New Spawner"`, ...); for everything else it starts out equal to the id.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct DisplayName(pub String);

/// Creation order, used to keep world exports deterministic.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpawnSeq(pub u64);
