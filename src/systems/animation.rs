//! Walker leg swing.
//!
//! Legs swing opposite each other at a rate driven by elapsed time. The
//! amplitude depends on the body's current speed: a full stride
//! when walking, a shuffle when barely moving, and an eased return to rest
//! when standing still.

use bevy_ecs::prelude::*;
use std::f32::consts::PI;

use crate::components::entityid::EntityId;
use crate::components::legs::Legs;
use crate::components::physicsbody::PhysicsBody;
use crate::events::visual::VisualCmd;
use crate::math::lerp;
use crate::resources::physics::Physics;
use crate::resources::worldtime::WorldTime;

pub const WALK_SPEED: f32 = 0.5;
pub const SHUFFLE_SPEED: f32 = 0.1;
pub const WALK_AMPLITUDE: f32 = 0.8;
pub const SHUFFLE_AMPLITUDE: f32 = 0.3;
/// Per-frame easing towards rest.
pub const REST_EASE: f32 = 0.1;

/// Leg angles for a given time (ms) and speed, starting from `legs`.
pub fn swing(legs: Legs, elapsed_ms: f32, speed: f32) -> Legs {
    let t = elapsed_ms * 0.01;
    let amplitude = if speed > WALK_SPEED {
        WALK_AMPLITUDE
    } else if speed > SHUFFLE_SPEED {
        SHUFFLE_AMPLITUDE
    } else {
        return Legs {
            left: lerp(legs.left, 0.0, REST_EASE),
            right: lerp(legs.right, 0.0, REST_EASE),
        };
    };
    Legs {
        left: t.sin() * amplitude,
        right: (t + PI).sin() * amplitude,
    }
}

pub fn leg_animation(
    time: Res<WorldTime>,
    physics: Res<Physics>,
    mut query: Query<(&EntityId, &PhysicsBody, &mut Legs)>,
    mut visuals: MessageWriter<VisualCmd>,
) {
    let elapsed_ms = time.elapsed_ms();
    for (id, body, mut legs) in query.iter_mut() {
        let Some(velocity) = physics.linear_velocity(body.0) else {
            continue;
        };
        let next = swing(*legs, elapsed_ms, velocity.length());
        if next == *legs {
            continue;
        }
        *legs = next;
        visuals.write(VisualCmd::LegSwing {
            id: id.0.clone(),
            left: next.left,
            right: next.right,
        });
    }
}
