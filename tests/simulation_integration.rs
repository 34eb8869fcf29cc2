//! Integration tests for the per-frame directors.
//!
//! Every test drives a full [`Engine`] on a weightless kinematic world with
//! exact frame deltas, so positions and timers are reproducible.

use bevy_ecs::prelude::*;
use crossbeam_channel::Receiver;
use glam::Vec3;

use verseengine::components::combatstats::CombatStats;
use verseengine::components::entitykind::DirectKind;
use verseengine::components::mob::AiMode;
use verseengine::components::physicsbody::PhysicsBody;
use verseengine::components::spawner::{SpawnedBy, SpawnerState};
use verseengine::engine::Engine;
use verseengine::events::combat::DamageEvent;
use verseengine::events::host::{CommandReply, HostCommand, HostEvent};
use verseengine::registry;
use verseengine::resources::config::EngineConfig;
use verseengine::resources::kinematic::KinematicWorld;
use verseengine::resources::physics::{MotionType, Physics};
use verseengine::resources::recipes::{MemorySource, RecipeResolver};

const GOBLIN: &str = r#"{"id": "goblin",
    "visuals": [{"type": "box", "name": "body", "size": [1, 2, 1], "pos": [0, 1, 0]}],
    "stats": {"hp": 30, "atk": 5, "speed": 0.05},
    "behavior": {"type": "hostile", "aggroRange": 10, "attackCooldown": 500}}"#;

const NEST: &str = r#"{"id": "nest",
    "visuals": [{"type": "box", "name": "mound", "size": [2, 2, 2], "pos": [0, 1, 0]}],
    "behavior": {"type": "spawner", "spawnType": "goblin", "frequency": 1, "maxSpawned": 1}}"#;

const SWARM: &str = r#"{"id": "swarm",
    "visuals": [{"type": "box", "name": "mound", "size": [2, 2, 2], "pos": [0, 1, 0]}],
    "behavior": {"type": "spawner", "spawnType": "goblin", "frequency": 0.5, "maxSpawned": 3}}"#;

const DT: f32 = 0.25;

fn make_engine() -> Engine {
    let resolver = RecipeResolver::new().with_source(
        MemorySource::new("memory")
            .with("goblin", GOBLIN)
            .with("nest", NEST)
            .with("swarm", SWARM),
    );
    let mut engine = Engine::new(EngineConfig::new(), KinematicWorld::weightless(), resolver);
    engine.seed(42);
    engine
}

fn spawn_direct(engine: &mut Engine, kind: DirectKind, at: Vec3) -> Entity {
    registry::spawn(engine.world_mut(), kind, at, None, None, None).unwrap()
}

fn spawn_recipe(engine: &mut Engine, recipe: &str, at: Vec3) -> Entity {
    registry::spawn_from_recipe(engine.world_mut(), recipe, at, None, None).unwrap()
}

fn id_of(engine: &Engine, entity: Entity) -> String {
    engine
        .world()
        .get::<verseengine::components::entityid::EntityId>(entity)
        .unwrap()
        .0
        .clone()
}

fn drive(engine: &mut Engine, entity: Entity) {
    let id = id_of(engine, entity);
    assert_eq!(
        engine.execute(HostCommand::EnterDriveMode { id }),
        CommandReply::Ok
    );
}

fn frames(engine: &mut Engine, n: usize, dt: f32) {
    for _ in 0..n {
        engine.frame(dt);
    }
}

fn velocity_of(engine: &Engine, entity: Entity) -> Vec3 {
    let body = engine.world().get::<PhysicsBody>(entity).unwrap().0;
    engine
        .world()
        .resource::<Physics>()
        .linear_velocity(body)
        .unwrap()
}

fn set_velocity(engine: &mut Engine, entity: Entity, v: Vec3) {
    let body = engine.world().get::<PhysicsBody>(entity).unwrap().0;
    engine
        .world_mut()
        .resource_mut::<Physics>()
        .set_linear_velocity(body, v);
}

fn children_of(engine: &mut Engine, spawner: Entity) -> usize {
    let world = engine.world_mut();
    world
        .query::<&SpawnedBy>()
        .iter(world)
        .filter(|s| s.0 == spawner)
        .count()
}

fn active_of(engine: &Engine, spawner: Entity) -> usize {
    engine
        .world()
        .get::<SpawnerState>(spawner)
        .unwrap()
        .active_children
        .len()
}

fn host_events(rx: &Receiver<HostEvent>) -> Vec<HostEvent> {
    rx.try_iter()
        .filter(|e| !matches!(e, HostEvent::StatsTick(_) | HostEvent::RaceTimerTick { .. }))
        .collect()
}

#[test]
fn capacity_gating_scenario() {
    let mut engine = make_engine();
    let nest = spawn_recipe(&mut engine, "nest", Vec3::ZERO);

    // First observation spawns right away; the mob shows up a frame later.
    frames(&mut engine, 1, DT);
    assert_eq!(engine.world().get::<SpawnerState>(nest).unwrap().pending, 1);
    frames(&mut engine, 1, DT);
    assert_eq!(active_of(&engine, nest), 1);

    // The tick one second after the first is suppressed.
    frames(&mut engine, 3, DT);
    let state = engine.world().get::<SpawnerState>(nest).unwrap();
    assert_eq!(state.active_children.len(), 1);
    assert_eq!(state.pending, 0);
    assert_eq!(state.last_spawn, Some(1.25));

    let child = state.active_children.iter().next().unwrap().clone();
    assert_eq!(
        engine.execute(HostCommand::DeleteEntity { id: child }),
        CommandReply::Ok
    );
    assert_eq!(active_of(&engine, nest), 0);

    // Next threshold is at 2.25s.
    frames(&mut engine, 3, DT);
    assert_eq!(active_of(&engine, nest), 0);
    frames(&mut engine, 2, DT);
    assert_eq!(active_of(&engine, nest), 1);
    assert_eq!(children_of(&mut engine, nest), 1);
}

#[test]
fn spawner_accounting_matches_live_children() {
    let mut engine = make_engine();
    let swarm = spawn_recipe(&mut engine, "swarm", Vec3::new(20.0, 0.0, 20.0));

    for frame in 0..80 {
        engine.frame(DT);
        if frame % 7 == 6 {
            let victim = engine
                .world()
                .get::<SpawnerState>(swarm)
                .unwrap()
                .active_children
                .iter()
                .next()
                .cloned();
            if let Some(victim) = victim {
                registry::destroy(engine.world_mut(), &victim);
            }
        }
        let active = active_of(&engine, swarm);
        assert!(active <= 3, "frame {}: {} active", frame, active);
        assert_eq!(active, children_of(&mut engine, swarm));
    }
}

#[test]
fn children_outlive_their_spawner_untracked() {
    let mut engine = make_engine();
    let nest = spawn_recipe(&mut engine, "nest", Vec3::ZERO);
    frames(&mut engine, 2, DT);
    let nest_id = id_of(&engine, nest);
    engine.execute(HostCommand::DeleteEntity { id: nest_id });
    let world = engine.world_mut();
    let mobs = world
        .query_filtered::<Entity, With<verseengine::components::mob::Mob>>()
        .iter(world)
        .count();
    assert_eq!(mobs, 1);
}

#[test]
fn disabled_spawners_stay_quiet() {
    let mut engine = make_engine();
    let nest = spawn_recipe(&mut engine, "nest", Vec3::ZERO);
    engine.execute(HostCommand::SetSpawnersEnabled(false));
    frames(&mut engine, 10, DT);
    assert_eq!(active_of(&engine, nest), 0);
    assert!(engine.world().get::<SpawnerState>(nest).unwrap().last_spawn.is_none());
}

#[test]
fn hostile_mob_chases_inside_aggro_range() {
    let mut engine = make_engine();
    let goblin = spawn_recipe(&mut engine, "goblin", Vec3::new(0.0, 1.0, 0.0));
    let car = spawn_direct(&mut engine, DirectKind::Car, Vec3::new(0.0, 1.0, 5.0));
    drive(&mut engine, car);

    engine.frame(DT);
    assert_eq!(*engine.world().get::<AiMode>(goblin).unwrap(), AiMode::Chasing);
    let v = velocity_of(&engine, goblin);
    assert!(v.z > 0.0);
    assert!(Vec3::new(v.x, 0.0, v.z).length() > 0.0);
    assert!(v.x.abs() < 1e-5);
}

#[test]
fn hostile_mob_roams_outside_aggro_range() {
    let mut engine = make_engine();
    let goblin = spawn_recipe(&mut engine, "goblin", Vec3::new(0.0, 1.0, 0.0));
    let car = spawn_direct(&mut engine, DirectKind::Car, Vec3::new(0.0, 1.0, 15.0));
    drive(&mut engine, car);

    engine.frame(DT);
    assert_eq!(*engine.world().get::<AiMode>(goblin).unwrap(), AiMode::Roaming);
}

#[test]
fn melee_hits_on_cooldown() {
    let mut engine = make_engine();
    let rx = engine.connect_host();
    let walker = spawn_direct(&mut engine, DirectKind::Walker, Vec3::new(0.0, 1.0, 0.0));
    spawn_recipe(&mut engine, "goblin", Vec3::new(0.0, 1.0, 2.0));
    drive(&mut engine, walker);

    engine.frame(DT);
    assert!(host_events(&rx).is_empty());
    engine.frame(DT);
    assert_eq!(
        host_events(&rx),
        vec![HostEvent::PlayerHealthChanged { hp: 95.0 }]
    );
    assert_eq!(engine.world().get::<CombatStats>(walker).unwrap().hp, 95.0);
}

#[test]
fn possessed_hp_never_rises_or_goes_negative() {
    let mut engine = make_engine();
    let rx = engine.connect_host();
    let walker = spawn_direct(&mut engine, DirectKind::Walker, Vec3::ZERO);
    drive(&mut engine, walker);

    for amount in [7.5, 0.0, 33.0, -4.0, 12.0, f32::NAN, 40.0, 25.0, 9.0] {
        engine.world_mut().trigger(DamageEvent {
            target: walker,
            amount,
        });
    }
    let events = host_events(&rx);
    let hps: Vec<f32> = events
        .iter()
        .filter_map(|e| match e {
            HostEvent::PlayerHealthChanged { hp } => Some(*hp),
            _ => None,
        })
        .collect();
    assert_eq!(hps, vec![92.5, 59.5, 47.5, 7.5, 0.0]);
    assert!(hps.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(
        events.iter().filter(|e| **e == HostEvent::PlayerDied).count(),
        1
    );
}

#[test]
fn dead_possessed_entity_leaves_drive_mode() {
    let mut engine = make_engine();
    let walker = spawn_direct(&mut engine, DirectKind::Walker, Vec3::ZERO);
    drive(&mut engine, walker);
    engine.world_mut().trigger(DamageEvent {
        target: walker,
        amount: 500.0,
    });
    frames(&mut engine, 2, DT);
    assert!(engine.entity("walker_1").is_none());
    assert!(
        engine
            .world()
            .resource::<verseengine::resources::possession::Possession>()
            .entity
            .is_none()
    );
}

#[test]
fn race_finishes_once_on_touching_the_zone() {
    let mut engine = make_engine();
    let rx = engine.connect_host();
    spawn_direct(&mut engine, DirectKind::Finish, Vec3::new(0.0, 0.0, 20.0));
    let car = spawn_direct(&mut engine, DirectKind::Car, Vec3::new(0.0, 1.0, 0.0));
    drive(&mut engine, car);

    // 10 units/s, 1.25 units per frame: the car's nose crosses z = 19.5 on
    // frame 14.
    set_velocity(&mut engine, car, Vec3::new(0.0, 0.0, 10.0));
    frames(&mut engine, 40, 0.125);

    let finished: Vec<f32> = host_events(&rx)
        .into_iter()
        .filter_map(|e| match e {
            HostEvent::RaceFinished { duration } => Some(duration),
            _ => None,
        })
        .collect();
    assert_eq!(finished.len(), 1);
    assert!((finished[0] - 1.75).abs() <= 0.125);
}

#[test]
fn race_needs_a_finish_zone() {
    let mut engine = make_engine();
    let rx = engine.connect_host();
    let car = spawn_direct(&mut engine, DirectKind::Car, Vec3::new(0.0, 1.0, 0.0));
    drive(&mut engine, car);
    set_velocity(&mut engine, car, Vec3::new(0.0, 0.0, 10.0));
    frames(&mut engine, 40, 0.125);
    assert!(host_events(&rx).is_empty());
}

#[test]
fn telemetry_reports_race_clock() {
    let mut engine = make_engine();
    let rx = engine.connect_host();
    spawn_direct(&mut engine, DirectKind::Finish, Vec3::new(0.0, 0.0, 100.0));
    let car = spawn_direct(&mut engine, DirectKind::Car, Vec3::new(0.0, 1.0, 0.0));
    drive(&mut engine, car);
    frames(&mut engine, 4, 0.125);
    let ticks: Vec<f32> = rx
        .try_iter()
        .filter_map(|e| match e {
            HostEvent::RaceTimerTick { elapsed } => Some(elapsed),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![0.125, 0.25, 0.375, 0.5]);
}

#[test]
fn host_attached_after_some_frames_gets_stats() {
    let mut engine = make_engine();
    frames(&mut engine, 10, 0.125);
    let rx = engine.connect_host();
    frames(&mut engine, 8, 0.125);
    let stats = rx
        .try_iter()
        .filter(|e| matches!(e, HostEvent::StatsTick(_)))
        .count();
    assert_eq!(stats, 8);
}

#[test]
fn exit_twice_matches_exit_once() {
    let mut engine = make_engine();
    let car = spawn_direct(&mut engine, DirectKind::Car, Vec3::ZERO);
    drive(&mut engine, car);
    engine.execute(HostCommand::ExitDriveMode);
    engine.drain_visuals();
    let rig = *engine
        .world()
        .resource::<verseengine::resources::camera::CameraRig>();
    engine.execute(HostCommand::ExitDriveMode);
    assert!(engine.drain_visuals().is_empty());
    let again = *engine
        .world()
        .resource::<verseengine::resources::camera::CameraRig>();
    assert_eq!(rig.mode, again.mode);
    assert_eq!(rig.position, again.position);
}

#[test]
fn disabling_ai_twice_matches_once() {
    let mut engine = make_engine();
    let goblin = spawn_recipe(&mut engine, "goblin", Vec3::new(3.0, 1.0, 0.0));
    set_velocity(&mut engine, goblin, Vec3::new(1.0, 0.0, 1.0));
    let body = engine.world().get::<PhysicsBody>(goblin).unwrap().0;

    engine.execute(HostCommand::SetAiEnabled(false));
    let once = {
        let physics = engine.world().resource::<Physics>();
        (physics.motion_type(body), physics.linear_velocity(body))
    };
    engine.execute(HostCommand::SetAiEnabled(false));
    let twice = {
        let physics = engine.world().resource::<Physics>();
        (physics.motion_type(body), physics.linear_velocity(body))
    };
    assert_eq!(once, twice);
    assert_eq!(once, (Some(MotionType::Static), Some(Vec3::ZERO)));

    frames(&mut engine, 5, DT);
    let position = engine.world().resource::<Physics>().position(body).unwrap();
    assert_eq!(position, Vec3::new(3.0, 1.0, 0.0));

    engine.execute(HostCommand::SetAiEnabled(true));
    assert_eq!(
        engine.world().resource::<Physics>().motion_type(body),
        Some(MotionType::Dynamic)
    );
}

#[test]
fn player_attack_hits_mobs_in_radius() {
    let mut engine = make_engine();
    engine.execute(HostCommand::SetAiEnabled(false));
    let car = spawn_direct(&mut engine, DirectKind::Car, Vec3::ZERO);
    let near = spawn_recipe(&mut engine, "goblin", Vec3::new(3.0, 0.0, 0.0));
    let far = spawn_recipe(&mut engine, "goblin", Vec3::new(0.0, 0.0, 5.0));

    assert_eq!(engine.execute(HostCommand::PlayerAttack), CommandReply::Ok);
    assert_eq!(engine.world().get::<CombatStats>(near).unwrap().hp, 30.0);

    drive(&mut engine, car);
    engine.execute(HostCommand::PlayerAttack);
    assert_eq!(engine.world().get::<CombatStats>(near).unwrap().hp, 20.0);
    assert_eq!(engine.world().get::<CombatStats>(far).unwrap().hp, 30.0);
    assert_eq!(engine.world().get::<CombatStats>(car).unwrap().hp, 200.0);
}

#[test]
fn drive_keys_move_the_car() {
    let mut engine = make_engine();
    let car = spawn_direct(&mut engine, DirectKind::Car, Vec3::new(0.0, 1.0, 0.0));
    drive(&mut engine, car);
    engine.execute(HostCommand::SetDrivePower { value: 8.0 });
    engine.execute(HostCommand::KeyDown { key: "w".into() });
    engine.frame(DT);
    assert!((velocity_of(&engine, car).z - 2.0).abs() < 1e-5);
    engine.execute(HostCommand::KeyUp { key: "w".into() });
    engine.frame(DT);
    assert!((velocity_of(&engine, car).z - 2.0).abs() < 1e-5);
}

#[test]
fn hp_patched_to_zero_kills() {
    let mut engine = make_engine();
    let goblin = spawn_recipe(&mut engine, "goblin", Vec3::new(30.0, 1.0, 0.0));
    let id = id_of(&engine, goblin);
    assert_eq!(
        engine.execute(HostCommand::UpdateEntityMetadata {
            id: id.clone(),
            patch: r#"{"stats": {"hp": 0}}"#.into(),
        }),
        CommandReply::Ok
    );
    frames(&mut engine, 2, DT);
    assert!(engine.entity(&id).is_none());
}

#[test]
fn spawner_patch_takes_effect_next_cycle() {
    let mut engine = make_engine();
    let nest = spawn_recipe(&mut engine, "nest", Vec3::ZERO);
    let id = id_of(&engine, nest);
    engine.execute(HostCommand::UpdateEntityMetadata {
        id,
        patch: r#"{"spawner": {"maxSpawned": 2, "frequency": 0.5}}"#.into(),
    });
    frames(&mut engine, 4, DT);
    assert_eq!(active_of(&engine, nest), 2);
}

#[test]
fn malformed_patch_is_ignored() {
    let mut engine = make_engine();
    let goblin = spawn_recipe(&mut engine, "goblin", Vec3::ZERO);
    let id = id_of(&engine, goblin);
    assert_eq!(
        engine.execute(HostCommand::UpdateEntityMetadata {
            id,
            patch: "{oops".into(),
        }),
        CommandReply::Ignored
    );
    assert_eq!(engine.world().get::<CombatStats>(goblin).unwrap().hp, 30.0);
}

#[test]
fn selection_carries_metadata() {
    let mut engine = make_engine();
    let rx = engine.connect_host();
    let nest = spawn_recipe(&mut engine, "nest", Vec3::new(1.0, 0.0, 2.0));
    let id = id_of(&engine, nest);
    engine.execute(HostCommand::SelectEntity { id: id.clone() });
    let Some(HostEvent::EntitySelected {
        name, x, z, metadata, ..
    }) = host_events(&rx).into_iter().next()
    else {
        panic!("no selection event");
    };
    assert_eq!(name, "New Spawner");
    assert_eq!((x, z), (1.0, 2.0));
    let meta: serde_json::Value = serde_json::from_str(&metadata).unwrap();
    assert_eq!(meta["type"], "recipe");
    assert_eq!(meta["recipeId"], "nest");
    assert_eq!(meta["spawner"]["maxSpawned"], 1);
}

#[test]
fn toolbar_spawns_land_on_the_ring() {
    let mut engine = make_engine();
    let CommandReply::Spawned { id } = engine.execute(HostCommand::SpawnPrimitive {
        kind: "car".into(),
    }) else {
        panic!("car did not spawn");
    };
    let entity = engine.entity(&id).unwrap();
    let at = engine
        .world()
        .get::<verseengine::components::transform::Transform>(entity)
        .unwrap()
        .position;
    let r = (at.x * at.x + at.z * at.z).sqrt();
    assert!((7.999..=15.001).contains(&r));
    assert!((at.y - 0.6).abs() < 1e-6);
}
