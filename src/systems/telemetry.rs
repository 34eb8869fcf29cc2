//! Periodic host telemetry.
//!
//! Every `telemetry_interval_ms` of simulated time the host receives a
//! `StatsTick` followed by a `RaceTimerTick`. When the stats tick cannot be
//! delivered the host is considered gone and the loop halts until a new host
//! connects; the simulation itself keeps running. Ticks that fall before any
//! host is attached are skipped.

use bevy_ecs::prelude::*;
use log::warn;

use crate::events::host::{HostEvent, StatsTick};
use crate::resources::camera::CameraRig;
use crate::resources::entityindex::EntityIndex;
use crate::resources::hostbridge::HostBridge;
use crate::resources::race::RaceTracker;
use crate::resources::telemetry::{RenderStats, Telemetry};
use crate::resources::worldtime::WorldTime;

pub fn telemetry_tick(
    time: Res<WorldTime>,
    mut telemetry: ResMut<Telemetry>,
    render: Res<RenderStats>,
    rig: Res<CameraRig>,
    index: Res<EntityIndex>,
    race: Res<RaceTracker>,
    bridge: Res<HostBridge>,
) {
    let Some(measured_fps) = telemetry.advance(time.delta) else {
        return;
    };
    if !bridge.is_connected() {
        return;
    }
    let stats = StatsTick {
        fps: render.fps.unwrap_or(measured_fps),
        cam_x: rig.position.x,
        cam_y: rig.position.y,
        cam_z: rig.position.z,
        entity_count: index.len(),
        camera_type: rig.mode.type_name().to_string(),
        light_summary: render.light_summary.clone(),
        resolution: render.resolution.clone(),
        vertex_count: render.vertex_count,
    };
    if !bridge.notify(HostEvent::StatsTick(stats)) {
        telemetry.halted = true;
        warn!("host is not listening, telemetry stopped");
        return;
    }
    bridge.notify(HostEvent::RaceTimerTick {
        elapsed: race.current_elapsed(time.elapsed),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::hostbridge::connect_host;

    fn make_world() -> World {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            delta: 0.05,
            ..Default::default()
        });
        world.insert_resource(Telemetry::new(100));
        world.init_resource::<RenderStats>();
        world.init_resource::<CameraRig>();
        world.init_resource::<EntityIndex>();
        world.init_resource::<RaceTracker>();
        world.init_resource::<HostBridge>();
        world
    }

    fn tick(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(telemetry_tick);
        schedule.run(world);
    }

    #[test]
    fn sends_stats_then_timer_each_interval() {
        let mut world = make_world();
        let rx = connect_host(&mut world);
        for _ in 0..4 {
            tick(&mut world);
        }
        let events: Vec<HostEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], HostEvent::StatsTick(_)));
        assert_eq!(events[1], HostEvent::RaceTimerTick { elapsed: 0.0 });
    }

    #[test]
    fn dropped_host_halts_the_loop() {
        let mut world = make_world();
        let rx = connect_host(&mut world);
        drop(rx);
        tick(&mut world);
        tick(&mut world);
        assert!(world.resource::<Telemetry>().halted);

        let rx = connect_host(&mut world);
        assert!(!world.resource::<Telemetry>().halted);
        tick(&mut world);
        tick(&mut world);
        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn ticks_before_any_host_are_skipped() {
        let mut world = make_world();
        for _ in 0..6 {
            tick(&mut world);
        }
        assert!(!world.resource::<Telemetry>().halted);
        let rx = connect_host(&mut world);
        tick(&mut world);
        tick(&mut world);
        let events: Vec<HostEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], HostEvent::StatsTick(_)));
    }
}
