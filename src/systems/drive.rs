//! Drive controller.
//!
//! One entity at a time can be possessed and driven with held w/a/s/d keys.
//! [`enter_drive`] and [`exit_drive`] switch possession, camera and race
//! state; [`drive_controller`] applies the control law of the possessed
//! entity each frame:
//!
//! - legged (walker): horizontal velocity is set directly from
//!   forward/backward input, vertical velocity is preserved, turning sets
//!   angular velocity at twice the wheeled rate;
//! - wheeled (everything else): forward/backward push impulses along the
//!   heading, turning sets angular velocity, and a lateral traction impulse
//!   cancels most of the sideways slide.
//!
//! Turning with no turn key held zeroes angular velocity.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, info, warn};

use crate::components::entityid::EntityId;
use crate::components::entitykind::EntityKind;
use crate::components::physicsbody::PhysicsBody;
use crate::components::transform::Transform;
use crate::events::visual::{VisualCmd, emit};
use crate::math::{forward_from_yaw, right_from_yaw};
use crate::resources::camera::{CameraMode, CameraRig};
use crate::resources::drive::{
    DriveState, LATERAL_GRIP, LEGGED_TURN_RATE, WHEELED_IMPULSE_SCALE, WHEELED_TURN_RATE,
};
use crate::resources::driveinput::{DriveInput, DriveKey};
use crate::resources::physics::Physics;
use crate::resources::possession::Possession;
use crate::systems::race::{reset_race, start_race};

/// -1 for left, +1 for right, 0 when neither or both are held.
fn turn_axis(input: &DriveInput) -> f32 {
    input.right.active as i8 as f32 - input.left.active as i8 as f32
}

/// +1 forward, -1 backward, 0 when neither or both are held.
fn throttle_axis(input: &DriveInput) -> f32 {
    input.forward.active as i8 as f32 - input.backward.active as i8 as f32
}

/// Apply the drive control law to the possessed entity.
pub fn drive_controller(
    drive: Res<DriveState>,
    input: Res<DriveInput>,
    possession: Res<Possession>,
    mut physics: ResMut<Physics>,
    query: Query<(&PhysicsBody, &EntityKind, &Transform)>,
) {
    if !drive.active {
        return;
    }
    let Some(entity) = possession.entity else {
        return;
    };
    let Ok((body, kind, transform)) = query.get(entity) else {
        return;
    };
    let body = body.0;
    let yaw = physics.yaw(body).unwrap_or(transform.yaw());
    let forward = forward_from_yaw(yaw);
    let turn = turn_axis(&input);
    let throttle = throttle_axis(&input);

    if kind.is_walker() {
        let velocity = physics.linear_velocity(body).unwrap_or(Vec3::ZERO);
        let next = Vec3::new(0.0, velocity.y, 0.0) + forward * (drive.power * throttle);
        physics.set_linear_velocity(body, next);
        physics.set_angular_velocity(body, Vec3::new(0.0, turn * LEGGED_TURN_RATE, 0.0));
        return;
    }

    let push = drive.power * WHEELED_IMPULSE_SCALE;
    if throttle != 0.0 {
        physics.apply_impulse(body, forward * (push * throttle));
    }
    physics.set_angular_velocity(body, Vec3::new(0.0, turn * WHEELED_TURN_RATE, 0.0));

    // Tyre grip
    let velocity = physics.linear_velocity(body).unwrap_or(Vec3::ZERO);
    let right = right_from_yaw(yaw);
    let lateral = right * velocity.dot(right);
    physics.apply_impulse(body, lateral * -LATERAL_GRIP);
}

/// Keep the chase camera on the possessed entity.
pub fn follow_camera(mut rig: ResMut<CameraRig>, query: Query<&Transform>) {
    let CameraMode::Chase { target, .. } = rig.mode else {
        return;
    };
    if let Ok(transform) = query.get(target) {
        rig.follow(transform.position);
    }
}

fn activate_camera(world: &mut World) {
    let rig = *world.resource::<CameraRig>();
    emit(
        world,
        VisualCmd::ActivateCamera {
            kind: rig.mode.type_name(),
            position: rig.position,
            target: rig.target,
        },
    );
}

/// Possess `entity` and start driving it.
///
/// Requires a physics body. Driving another entity first releases the
/// current one. Also starts the race tracker.
pub fn enter_drive(world: &mut World, entity: Entity) -> bool {
    let Some(transform) = world
        .get::<Transform>(entity)
        .copied()
        .filter(|_| world.get::<PhysicsBody>(entity).is_some())
    else {
        warn!("enter_drive: {:?} has no physics body", entity);
        return false;
    };
    if world.resource::<DriveState>().active {
        exit_drive(world);
    }

    world.resource_mut::<Possession>().possess(entity);
    world.resource_mut::<DriveState>().active = true;
    world.resource_mut::<DriveInput>().clear();
    world
        .resource_mut::<CameraRig>()
        .chase(entity, transform.position);
    activate_camera(world);

    let name = world
        .get::<EntityId>(entity)
        .map(|id| id.0.clone())
        .unwrap_or_default();
    info!("drive mode entered on {}", name);
    start_race(world, entity);
    true
}

/// Leave drive mode. A no-op when not driving.
pub fn exit_drive(world: &mut World) -> bool {
    {
        let mut drive = world.resource_mut::<DriveState>();
        if !drive.active {
            return false;
        }
        drive.active = false;
    }
    world.resource_mut::<Possession>().release();
    world.resource_mut::<DriveInput>().clear();
    world.resource_mut::<CameraRig>().restore();
    activate_camera(world);
    reset_race(world);
    info!("drive mode exited");
    true
}

/// Feed a host key event. Keys only matter while driving; Escape exits.
pub fn handle_key(world: &mut World, key: &str, down: bool) -> bool {
    if !world.resource::<DriveState>().active {
        return false;
    }
    let Some(key) = DriveKey::from_key_name(key) else {
        return false;
    };
    if key == DriveKey::Exit {
        return down && exit_drive(world);
    }
    world.resource_mut::<DriveInput>().apply(key, down);
    true
}

pub fn set_drive_power(world: &mut World, value: f32) {
    if !value.is_finite() {
        warn!("ignoring non-finite drive power {}", value);
        return;
    }
    world.resource_mut::<DriveState>().power = value;
    debug!("drive power set to {}", value);
}

/// Mouse wheel zoom of the chase camera.
pub fn zoom(world: &mut World, delta: f32) {
    if world.resource::<DriveState>().active {
        world.resource_mut::<CameraRig>().zoom(delta);
    }
}
