use bevy_ecs::prelude::Component;

use crate::resources::physics::BodyHandle;

/// Weak reference to the rigid body backing this entity.
///
/// The physics world owns the body. The registry removes it when the entity
/// is destroyed; until then systems treat a handle that no longer resolves
/// as "skip this entity for the frame".
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicsBody(pub BodyHandle);
