use bevy_ecs::prelude::{Entity, Resource};

/// The single possessed (player-controlled) entity.
///
/// Drive, AI targeting, mob attacks and the race tracker all resolve "the
/// player" through this resource; no system keeps its own copy.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct Possession {
    pub entity: Option<Entity>,
    /// `PlayerDied` was already reported for the current possession.
    pub dead_reported: bool,
}

impl Possession {
    pub fn possess(&mut self, entity: Entity) {
        self.entity = Some(entity);
        self.dead_reported = false;
    }

    pub fn release(&mut self) -> Option<Entity> {
        self.dead_reported = false;
        self.entity.take()
    }

    pub fn is(&self, entity: Entity) -> bool {
        self.entity == Some(entity)
    }
}
