use bevy_ecs::prelude::Resource;

pub const DEFAULT_POWER: f32 = 5.0;
/// Fraction of `power` applied per frame as a wheeled impulse.
pub const WHEELED_IMPULSE_SCALE: f32 = 0.25;
/// Yaw rate (rad/s) of wheeled vehicles. Legged ones turn twice as fast.
pub const WHEELED_TURN_RATE: f32 = 2.0;
pub const LEGGED_TURN_RATE: f32 = 4.0;
/// Share of sideways velocity cancelled every frame on wheeled vehicles.
pub const LATERAL_GRIP: f32 = 0.8;

/// Drive controller state. The driven entity is the
/// [`Possession`](crate::resources::possession::Possession).
#[derive(Resource, Clone, Copy, Debug)]
pub struct DriveState {
    pub active: bool,
    pub power: f32,
}

impl Default for DriveState {
    fn default() -> Self {
        Self {
            active: false,
            power: DEFAULT_POWER,
        }
    }
}
