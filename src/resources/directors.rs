use bevy_ecs::prelude::Resource;

/// Global on/off switches of the per-frame directors.
///
/// Toggling a switch only changes the behavior of future frames.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectorSwitches {
    /// Mobs move and attack. When off, mobs are frozen as static bodies.
    pub ai: bool,
    /// Health bars are refreshed and visible.
    pub combat: bool,
    /// Spawners tick.
    pub spawners: bool,
}

impl Default for DirectorSwitches {
    fn default() -> Self {
        Self {
            ai: false,
            combat: true,
            spawners: true,
        }
    }
}
