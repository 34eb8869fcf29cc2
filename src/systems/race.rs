//! Race tracker.
//!
//! A race runs from [`start_race`] until the possessed entity's body first
//! intersects the finish zone's body. The duration is measured on the
//! simulated clock and reported once through `RaceFinished`.

use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::components::entitykind::EntityKind;
use crate::components::physicsbody::PhysicsBody;
use crate::events::host::HostEvent;
use crate::resources::hostbridge::HostBridge;
use crate::resources::physics::Physics;
use crate::resources::possession::Possession;
use crate::resources::race::{RaceState, RaceTracker};
use crate::resources::worldtime::WorldTime;

/// Start timing `racer`. Without a finish zone in the world the tracker
/// stays idle.
pub fn start_race(world: &mut World, racer: Entity) -> bool {
    let zone = world
        .query::<(Entity, &EntityKind)>()
        .iter(world)
        .find(|(_, kind)| **kind == EntityKind::FinishZone)
        .map(|(e, _)| e);
    let now = world.resource::<WorldTime>().elapsed;
    let started = world.resource_mut::<RaceTracker>().start(racer, zone, now);
    if started {
        info!("race started");
    } else {
        warn!("no finish zone in the world, race timing disabled");
    }
    started
}

pub fn reset_race(world: &mut World) {
    world.resource_mut::<RaceTracker>().reset();
}

/// Finish the race on the first frame the racer touches the finish zone.
pub fn race_tracker(
    mut race: ResMut<RaceTracker>,
    possession: Res<Possession>,
    physics: Res<Physics>,
    time: Res<WorldTime>,
    bridge: Res<HostBridge>,
    bodies: Query<&PhysicsBody>,
) {
    if race.state != RaceState::Racing {
        return;
    }
    let (Some(racer), Some(zone)) = (possession.entity, race.finish_zone) else {
        return;
    };
    let (Ok(racer_body), Ok(zone_body)) = (bodies.get(racer), bodies.get(zone)) else {
        return;
    };
    if !physics.intersects(racer_body.0, zone_body.0) {
        return;
    }
    if let Some(duration) = race.finish(time.elapsed) {
        info!("race finished in {:.2}s", duration);
        bridge.notify(HostEvent::RaceFinished { duration });
    }
}
