//! AI director.
//!
//! Every frame each mob picks a mode from its distance to the possessed
//! entity: hostile mobs closer than their aggro range chase, everything else
//! roams. The comparison is a strict `<` with no hysteresis, so a target
//! hovering exactly at the boundary can flip a mob every frame.
//!
//! Chasing mobs turn towards the target, run at it (stopping short in
//! melee) and hit it on cooldown while in attack range. Roaming mobs wander
//! along a heading that is occasionally re-rolled, with the odd hop.
//!
//! While AI is disabled, every mob body is held static with zero velocity.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, info};
use std::f32::consts::TAU;

use crate::components::behavior::Behavior;
use crate::components::combatstats::CombatStats;
use crate::components::effects::Dying;
use crate::components::mob::{AiMode, AttackTimer, Mob, RoamState};
use crate::components::physicsbody::PhysicsBody;
use crate::components::transform::Transform;
use crate::events::combat::DamageEvent;
use crate::math::{horizontal, lerp_angle, yaw_towards};
use crate::resources::config::EngineConfig;
use crate::resources::directors::DirectorSwitches;
use crate::resources::physics::{MotionType, Physics};
use crate::resources::possession::Possession;
use crate::resources::rng::SimRng;
use crate::resources::worldtime::WorldTime;

pub const ATTACK_RANGE: f32 = 2.5;
/// Chasers stop pushing once this close.
pub const MELEE_STOP: f32 = 2.2;
pub const CHASE_SPEED_SCALE: f32 = 120.0;
pub const ROAM_SPEED_SCALE: f32 = 60.0;
pub const CHASE_TURN_GAIN: f32 = 0.1;
pub const ROAM_TURN_GAIN: f32 = 0.05;
pub const ROAM_REROLL_CHANCE: f32 = 0.02;
pub const BOB_CHANCE: f32 = 0.05;
pub const BOB_IMPULSE: Vec3 = Vec3::new(0.0, 0.5, 0.0);
/// Distance used when nobody is possessed.
pub const NO_TARGET_DISTANCE: f32 = 999.0;

type MobQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static PhysicsBody,
        &'static Transform,
        &'static Behavior,
        &'static CombatStats,
        &'static mut AiMode,
        &'static mut RoamState,
        &'static mut AttackTimer,
    ),
    (With<Mob>, Without<Dying>),
>;

/// Mode a mob should be in for a given distance to its target.
pub fn choose_mode(behavior: &Behavior, distance: f32) -> AiMode {
    match behavior.hostile() {
        Some(role) if distance < role.aggro_range => AiMode::Chasing,
        _ => AiMode::Roaming,
    }
}

pub fn ai_director(
    switches: Res<DirectorSwitches>,
    time: Res<WorldTime>,
    possession: Res<Possession>,
    mut physics: ResMut<Physics>,
    mut rng: ResMut<SimRng>,
    targets: Query<&Transform>,
    mut mobs: MobQuery,
    mut commands: Commands,
) {
    if !switches.ai {
        for (_, body, ..) in mobs.iter() {
            hold_still(&mut physics, body);
        }
        return;
    }

    let player = possession
        .entity
        .and_then(|e| targets.get(e).ok().map(|t| (e, t.position)));

    for (entity, body, transform, behavior, stats, mut mode, mut roam, mut timer) in
        mobs.iter_mut()
    {
        if possession.is(entity) {
            continue;
        }
        let body = body.0;
        let position = physics.position(body).unwrap_or(transform.position);
        let yaw = physics.yaw(body).unwrap_or(transform.yaw());
        let velocity = physics.linear_velocity(body).unwrap_or(Vec3::ZERO);

        let (distance, to_target) = match player {
            Some((_, target)) => (position.distance(target), target - position),
            None => (NO_TARGET_DISTANCE, Vec3::ZERO),
        };
        *mode = choose_mode(behavior, distance);

        match (*mode, player, behavior.hostile()) {
            (AiMode::Chasing, Some((target, _)), Some(role)) => {
                let dir = horizontal(to_target).normalize_or_zero();
                physics.set_transform(
                    body,
                    position,
                    lerp_angle(yaw, yaw_towards(dir), CHASE_TURN_GAIN),
                );
                let planar = if distance < MELEE_STOP {
                    Vec3::ZERO
                } else {
                    dir * stats.move_speed * CHASE_SPEED_SCALE
                };
                physics.set_linear_velocity(body, Vec3::new(planar.x, velocity.y, planar.z));

                if distance < ATTACK_RANGE {
                    timer.accumulated_ms += time.delta_ms();
                    if timer.accumulated_ms >= role.attack_cooldown_ms {
                        timer.accumulated_ms = 0.0;
                        debug!("{:?} hits {:?} for {}", entity, target, stats.attack_power);
                        commands.trigger(DamageEvent {
                            target,
                            amount: stats.attack_power,
                        });
                    }
                }
            }
            _ => {
                let reroll = roam.heading.is_none() || rng.chance(ROAM_REROLL_CHANCE);
                if reroll {
                    let angle = rng.unit() * TAU;
                    let heading = Vec3::new(angle.sin(), 0.0, angle.cos());
                    roam.heading = Some(heading);
                    roam.target_yaw = yaw_towards(heading);
                }
                let heading = roam.heading.unwrap_or(Vec3::Z);
                physics.set_transform(
                    body,
                    position,
                    lerp_angle(yaw, roam.target_yaw, ROAM_TURN_GAIN),
                );
                let planar = heading * stats.move_speed * ROAM_SPEED_SCALE;
                physics.set_linear_velocity(body, Vec3::new(planar.x, velocity.y, planar.z));
                if rng.chance(BOB_CHANCE) {
                    physics.apply_impulse(body, BOB_IMPULSE);
                }
            }
        }
    }
}

fn hold_still(physics: &mut Physics, body: &PhysicsBody) {
    physics.set_linear_velocity(body.0, Vec3::ZERO);
    physics.set_angular_velocity(body.0, Vec3::ZERO);
    physics.set_motion_type(body.0, MotionType::Static);
}

/// Turn the AI director on or off.
///
/// Disabling freezes every mob body (static, zero velocity). Enabling makes
/// them dynamic again; they resume from rest.
pub fn set_ai_enabled(world: &mut World, enabled: bool) {
    world.resource_mut::<DirectorSwitches>().ai = enabled;
    let bodies: Vec<PhysicsBody> = world
        .query_filtered::<&PhysicsBody, With<Mob>>()
        .iter(world)
        .copied()
        .collect();
    let mut physics = world.resource_mut::<Physics>();
    for body in &bodies {
        if enabled {
            physics.set_motion_type(body.0, MotionType::Dynamic);
        } else {
            hold_still(&mut physics, body);
        }
    }
    info!("AI {}", if enabled { "enabled" } else { "disabled" });
}

/// Hit every mob near the possessed entity. Returns how many were hit.
pub fn player_attack(world: &mut World) -> usize {
    let Some(player) = world.resource::<Possession>().entity else {
        debug!("player attack with nobody possessed");
        return 0;
    };
    let Some(center) = world.get::<Transform>(player).map(|t| t.position) else {
        return 0;
    };
    let (radius, damage) = {
        let config = world.resource::<EngineConfig>();
        (config.player_attack_radius, config.player_attack_damage)
    };
    let victims: Vec<Entity> = world
        .query_filtered::<(Entity, &Transform), (With<Mob>, With<CombatStats>, Without<Dying>)>()
        .iter(world)
        .filter(|(e, t)| *e != player && t.position.distance(center) < radius)
        .map(|(e, _)| e)
        .collect();
    for &target in &victims {
        world.trigger(DamageEvent {
            target,
            amount: damage,
        });
    }
    debug!("player attack hit {} mobs", victims.len());
    victims.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::behavior::HostileRole;

    #[test]
    fn hostile_chases_only_inside_aggro_range() {
        let hostile = Behavior::Hostile(HostileRole::default());
        assert_eq!(choose_mode(&hostile, 5.0), AiMode::Chasing);
        assert_eq!(choose_mode(&hostile, 15.0), AiMode::Roaming);
        assert_eq!(choose_mode(&hostile, 10.0), AiMode::Roaming);
    }

    #[test]
    fn passive_mobs_never_chase() {
        assert_eq!(choose_mode(&Behavior::None, 0.5), AiMode::Roaming);
    }

    #[test]
    fn nobody_possessed_means_roaming() {
        let hostile = Behavior::Hostile(HostileRole::default());
        assert_eq!(choose_mode(&hostile, NO_TARGET_DISTANCE), AiMode::Roaming);
    }
}
