//! Combat resolver.
//!
//! Damage arrives as a [`DamageEvent`] and is applied immediately by the
//! [`on_damage`] observer: hp is reduced, the target flashes and a damage
//! number pops up. An entity reaching `hp <= 0` starts dying: its health
//! bar goes, it shrinks, and [`combat_upkeep`] removes it once the shrink
//! has played.
//!
//! Damage on the possessed entity is clamped at zero and reported to the
//! host (`PlayerHealthChanged` on every hit, `PlayerDied` once).
//!
//! All effect timers are components on the entity they affect, so they go
//! away with it.

use bevy_ecs::prelude::*;
use log::{debug, info};

use crate::components::appearance::Color;
use crate::components::combatstats::CombatStats;
use crate::components::effects::{DEATH_SCALE, DamagePopups, Dying, HealthBar, HitFlash};
use crate::components::entityid::EntityId;
use crate::events::combat::DamageEvent;
use crate::events::host::HostEvent;
use crate::events::visual::{VisualCmd, emit};
use crate::registry;
use crate::resources::directors::DirectorSwitches;
use crate::resources::hostbridge::HostBridge;
use crate::resources::possession::Possession;
use crate::resources::worldtime::WorldTime;

const BAR_EPSILON: f32 = 1e-4;

fn begin_death(
    commands: &mut Commands,
    visuals: &mut MessageWriter<VisualCmd>,
    entity: Entity,
    id: &EntityId,
) {
    debug!("{} is dying", id.as_str());
    commands
        .entity(entity)
        .insert(Dying::default())
        .remove::<HealthBar>();
    visuals.write(VisualCmd::RemoveHealthBar { id: id.0.clone() });
    visuals.write(VisualCmd::Shrink {
        id: id.0.clone(),
        scale: DEATH_SCALE,
    });
}

/// Apply one hit.
///
/// Targets without stats, already dying targets and non-positive amounts
/// are ignored.
pub fn on_damage(
    trigger: On<DamageEvent>,
    mut commands: Commands,
    mut possession: ResMut<Possession>,
    bridge: Res<HostBridge>,
    mut targets: Query<(&EntityId, &mut CombatStats, Option<&mut DamagePopups>), Without<Dying>>,
    mut visuals: MessageWriter<VisualCmd>,
) {
    let DamageEvent { target, amount } = *trigger.event();
    if amount.is_nan() || amount <= 0.0 {
        return;
    }
    let Ok((id, mut stats, popups)) = targets.get_mut(target) else {
        return;
    };

    let is_player = possession.is(target);
    stats.hp -= amount;
    if is_player {
        stats.hp = stats.hp.max(0.0);
        bridge.notify(HostEvent::PlayerHealthChanged { hp: stats.hp });
    }
    debug!("{} takes {} damage, hp now {}", id.as_str(), amount, stats.hp);

    commands.entity(target).insert(HitFlash::default());
    visuals.write(VisualCmd::Flash {
        id: id.0.clone(),
        color: Color::RED,
    });

    let popup = match popups {
        Some(mut popups) => popups.push(amount).clone(),
        None => {
            let mut popups = DamagePopups::default();
            let popup = popups.push(amount).clone();
            commands.entity(target).insert(popups);
            popup
        }
    };
    visuals.write(VisualCmd::DamagePopup {
        id: id.0.clone(),
        serial: popup.serial,
        text: popup.text,
        offset_y: popup.offset_y,
        alpha: popup.alpha,
    });

    if stats.is_dead() {
        if is_player && !possession.dead_reported {
            possession.dead_reported = true;
            info!("possessed entity {} died", id.as_str());
            bridge.notify(HostEvent::PlayerDied);
        }
        begin_death(&mut commands, &mut visuals, target, id);
    }
}

/// Per-frame combat upkeep: effect timers, death removal, health bars.
///
/// Effects and removals always run; health bar refresh only while combat
/// is enabled.
#[allow(clippy::too_many_arguments)]
pub fn combat_upkeep(
    time: Res<WorldTime>,
    switches: Res<DirectorSwitches>,
    mut commands: Commands,
    mut flashes: Query<(Entity, &EntityId, &mut HitFlash)>,
    mut popups: Query<(&EntityId, &mut DamagePopups)>,
    mut dying: Query<(Entity, &mut Dying)>,
    fallen: Query<(Entity, &EntityId, &CombatStats), Without<Dying>>,
    mut bars: Query<(&EntityId, &CombatStats, &mut HealthBar), Without<Dying>>,
    mut visuals: MessageWriter<VisualCmd>,
) {
    let dt = time.delta;

    for (entity, id, mut flash) in flashes.iter_mut() {
        flash.remaining -= dt;
        if flash.remaining <= 0.0 {
            commands.entity(entity).remove::<HitFlash>();
            visuals.write(VisualCmd::RestoreColor { id: id.0.clone() });
        }
    }

    for (id, mut popups) in popups.iter_mut() {
        let popups = &mut *popups;
        popups.active.retain(|popup| {
            if popup.advance() {
                visuals.write(VisualCmd::DamagePopup {
                    id: id.0.clone(),
                    serial: popup.serial,
                    text: popup.text.clone(),
                    offset_y: popup.offset_y,
                    alpha: popup.alpha,
                });
                true
            } else {
                visuals.write(VisualCmd::RemovePopup {
                    id: id.0.clone(),
                    serial: popup.serial,
                });
                false
            }
        });
    }

    for (entity, mut death) in dying.iter_mut() {
        death.remaining -= dt;
        if death.remaining <= 0.0 {
            commands.queue(move |world: &mut World| {
                registry::destroy_entity(world, entity);
            });
        }
    }

    // hp edited to zero outside of combat (metadata patches)
    for (entity, id, stats) in fallen.iter() {
        if stats.is_dead() {
            begin_death(&mut commands, &mut visuals, entity, id);
        }
    }

    if !switches.combat {
        return;
    }
    for (id, stats, mut bar) in bars.iter_mut() {
        let fraction = stats.fraction();
        if (fraction - bar.shown).abs() > BAR_EPSILON {
            bar.shown = fraction;
            visuals.write(VisualCmd::HealthBar {
                id: id.0.clone(),
                fraction,
            });
        }
    }
}

/// Show or hide health bars and suspend their refresh. Stored hp is
/// untouched.
pub fn set_combat_enabled(world: &mut World, enabled: bool) {
    world.resource_mut::<DirectorSwitches>().combat = enabled;
    emit(world, VisualCmd::SetHealthBarsVisible(enabled));
    info!("combat {}", if enabled { "enabled" } else { "disabled" });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::entitykind::DirectKind;
    use crate::engine::init_world;
    use crate::resources::config::EngineConfig;
    use crate::resources::hostbridge::connect_host;
    use crate::resources::kinematic::KinematicWorld;
    use crate::resources::recipes::RecipeResolver;
    use crate::systems::time::update_world_time;
    use glam::Vec3;

    fn make_world() -> World {
        let mut world = World::new();
        init_world(
            &mut world,
            EngineConfig::new(),
            KinematicWorld::weightless(),
            RecipeResolver::new(),
        );
        world.flush();
        world
    }

    fn tick_upkeep(world: &mut World, dt: f32) {
        update_world_time(world, dt);
        let mut schedule = Schedule::default();
        schedule.add_systems(combat_upkeep);
        schedule.run(world);
    }

    fn damageable(world: &mut World) -> Entity {
        let e = registry::spawn(world, DirectKind::Walker, Vec3::ZERO, None, None, None).unwrap();
        world.get_mut::<CombatStats>(e).unwrap().hp = 30.0;
        e
    }

    #[test]
    fn damage_without_stats_is_ignored() {
        let mut world = make_world();
        let b = registry::spawn(&mut world, DirectKind::Box, Vec3::ZERO, None, None, None).unwrap();
        world.trigger(DamageEvent {
            target: b,
            amount: 10.0,
        });
        assert!(world.get::<HitFlash>(b).is_none());
    }

    #[test]
    fn damage_is_raw_subtraction() {
        let mut world = make_world();
        let e = damageable(&mut world);
        world.trigger(DamageEvent {
            target: e,
            amount: 50.0,
        });
        assert_eq!(world.get::<CombatStats>(e).unwrap().hp, -20.0);
        assert!(world.get::<Dying>(e).is_some());
        assert!(world.get::<HealthBar>(e).is_none());
    }

    #[test]
    fn flash_expires() {
        let mut world = make_world();
        let e = damageable(&mut world);
        world.trigger(DamageEvent {
            target: e,
            amount: 1.0,
        });
        assert!(world.get::<HitFlash>(e).is_some());
        tick_upkeep(&mut world, 0.05);
        assert!(world.get::<HitFlash>(e).is_some());
        tick_upkeep(&mut world, 0.06);
        assert!(world.get::<HitFlash>(e).is_none());
    }

    #[test]
    fn dead_entity_removed_after_shrink() {
        let mut world = make_world();
        let e = damageable(&mut world);
        world.trigger(DamageEvent {
            target: e,
            amount: 100.0,
        });
        tick_upkeep(&mut world, 0.1);
        assert!(world.get_entity(e).is_ok());
        tick_upkeep(&mut world, 0.1);
        assert!(world.get_entity(e).is_err());
    }

    #[test]
    fn possessed_hp_is_clamped_and_death_reported_once() {
        let mut world = make_world();
        let rx = connect_host(&mut world);
        let e = damageable(&mut world);
        world.resource_mut::<Possession>().possess(e);
        for _ in 0..3 {
            world.trigger(DamageEvent {
                target: e,
                amount: 20.0,
            });
        }
        assert_eq!(world.get::<CombatStats>(e).unwrap().hp, 0.0);
        let events: Vec<HostEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                HostEvent::PlayerHealthChanged { hp: 10.0 },
                HostEvent::PlayerHealthChanged { hp: 0.0 },
                HostEvent::PlayerDied,
            ]
        );
    }

    #[test]
    fn health_bar_refresh_pauses_when_disabled() {
        let mut world = make_world();
        let e = damageable(&mut world);
        set_combat_enabled(&mut world, false);
        world.get_mut::<CombatStats>(e).unwrap().hp = 50.0;
        tick_upkeep(&mut world, 0.016);
        assert_eq!(world.get::<HealthBar>(e).unwrap().shown, 1.0);
        set_combat_enabled(&mut world, true);
        tick_upkeep(&mut world, 0.016);
        assert_eq!(world.get::<HealthBar>(e).unwrap().shown, 0.5);
        assert_eq!(world.resource::<WorldTime>().frame_count, 2);
    }
}
