use bevy_ecs::prelude::Resource;

/// Simulated clock shared by every director.
///
/// `delta` is the scaled duration of the current frame in seconds;
/// `elapsed` accumulates it. All director timestamps (spawner cycles, race
/// start/end, attack cooldowns) are measured against this clock, never the
/// wall clock, so a run is reproducible from its sequence of frame deltas.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn delta_ms(&self) -> f32 {
        self.delta * 1000.0
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed * 1000.0
    }
}
