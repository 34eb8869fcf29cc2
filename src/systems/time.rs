//! Time update system.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per frame, applying `time_scale` to the provided delta.
use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Advance the simulated clock by one frame.
///
/// `dt` is the unscaled frame delta in seconds. Directors read the scaled
/// `delta` and the accumulated `elapsed`, never the wall clock.
pub fn update_world_time(world: &mut World, dt: f32) {
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = dt.max(0.0) * wt.time_scale;
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
    wt.frame_count += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_and_counts_frames() {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            time_scale: 0.5,
            ..Default::default()
        });
        update_world_time(&mut world, 0.25);
        update_world_time(&mut world, 0.25);
        let wt = world.resource::<WorldTime>();
        assert_eq!(wt.delta, 0.125);
        assert_eq!(wt.elapsed, 0.25);
        assert_eq!(wt.frame_count, 2);
    }

    #[test]
    fn negative_delta_does_not_rewind() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        update_world_time(&mut world, -1.0);
        assert_eq!(world.resource::<WorldTime>().elapsed, 0.0);
    }
}
