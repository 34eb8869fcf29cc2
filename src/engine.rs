//! Engine orchestrator.
//!
//! [`Engine`] owns the ECS world and the per-frame schedule. The host calls
//! [`Engine::frame`] once per rendered frame, feeds UI actions through
//! [`Engine::execute`] and drains presentation work with
//! [`Engine::drain_visuals`]. Callbacks arrive on the receiver returned by
//! [`Engine::connect_host`].
//!
//! Frame order:
//!
//! 1. advance the simulated clock
//! 2. step physics
//! 3. sync transforms, materialize queued spawns
//! 4. drive controller, chase camera, leg animation
//! 5. AI, spawners, combat upkeep, race tracker
//! 6. telemetry

use bevy_ecs::prelude::*;
use crossbeam_channel::Receiver;
use glam::Vec3;
use log::{debug, error, info, warn};

use crate::components::appearance::Color;
use crate::components::entityid::EntityId;
use crate::components::entitykind::DirectKind;
use crate::events::host::{CommandReply, HostCommand, HostEvent};
use crate::events::visual::{VisualCmd, emit};
use crate::metadata;
use crate::registry;
use crate::resources::camera::{CameraRig, EditorCamera};
use crate::resources::config::EngineConfig;
use crate::resources::dashboard::DashboardData;
use crate::resources::directors::DirectorSwitches;
use crate::resources::drive::DriveState;
use crate::resources::driveinput::DriveInput;
use crate::resources::entityindex::EntityIndex;
use crate::resources::environment::Environment;
use crate::resources::hostbridge::{HostBridge, connect_host};
use crate::resources::kinematic::KinematicWorld;
use crate::resources::physics::{Physics, PhysicsWorld};
use crate::resources::placement::{SpawnPlacement, spawn_lift};
use crate::resources::possession::Possession;
use crate::resources::race::RaceTracker;
use crate::resources::recipes::RecipeResolver;
use crate::resources::rng::SimRng;
use crate::resources::spawnqueue::SpawnQueue;
use crate::resources::telemetry::{RenderStats, Telemetry};
use crate::resources::worldtime::WorldTime;
use crate::serializer::{self, WorldDocument};
use crate::systems::ai::{ai_director, player_attack, set_ai_enabled};
use crate::systems::animation::leg_animation;
use crate::systems::combat::{combat_upkeep, on_damage, set_combat_enabled};
use crate::systems::drive::{
    drive_controller, enter_drive, exit_drive, follow_camera, handle_key, set_drive_power, zoom,
};
use crate::systems::physics::{step_physics, sync_transforms};
use crate::systems::race::race_tracker;
use crate::systems::spawner::{set_spawners_enabled, spawner_director};
use crate::systems::spawns::materialize_spawns;
use crate::systems::telemetry::telemetry_tick;
use crate::systems::time::update_world_time;

/// Insert every resource and observer the simulation needs.
///
/// The host bridge starts disconnected; see [`connect_host`].
pub fn init_world(
    world: &mut World,
    config: EngineConfig,
    physics: impl PhysicsWorld + 'static,
    resolver: RecipeResolver,
) {
    world.insert_resource(WorldTime::default());
    world.insert_resource(Physics::new(physics));
    world.insert_resource(resolver);
    world.insert_resource(EntityIndex::default());
    world.insert_resource(SimRng::default());
    world.insert_resource(DirectorSwitches {
        ai: config.ai_enabled,
        ..Default::default()
    });
    world.insert_resource(Possession::default());
    world.insert_resource(RaceTracker::default());
    world.insert_resource(DriveState {
        active: false,
        power: config.drive_power,
    });
    world.insert_resource(DriveInput::default());
    world.insert_resource(CameraRig::default());
    world.insert_resource(Environment::default());
    world.insert_resource(SpawnQueue::default());
    world.insert_resource(SpawnPlacement::default());
    world.insert_resource(DashboardData::from_dir(config.dashboard_data_dir()));
    world.insert_resource(HostBridge::disconnected());
    world.insert_resource(Telemetry::new(config.telemetry_interval_ms));
    world.insert_resource(RenderStats::default());
    world.init_resource::<Messages<VisualCmd>>();
    world.insert_resource(config);

    world.add_observer(on_damage);
    // Observers must be registered before anything can trigger damage.
    world.flush();
}

pub struct Engine {
    world: World,
    schedule: Schedule,
}

impl Engine {
    pub fn new(
        config: EngineConfig,
        physics: impl PhysicsWorld + 'static,
        resolver: RecipeResolver,
    ) -> Self {
        let mut world = World::new();
        init_world(&mut world, config, physics, resolver);

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                sync_transforms,
                materialize_spawns,
                drive_controller,
                follow_camera,
                leg_animation,
                ai_director,
                spawner_director,
                combat_upkeep,
                race_tracker,
                telemetry_tick,
            )
                .chain(),
        );

        Engine { world, schedule }
    }

    /// Built-in kinematic physics and recipes from the configured data root.
    pub fn from_config(config: EngineConfig) -> Self {
        let resolver = RecipeResolver::from_config(&config);
        Self::new(config, KinematicWorld::new(), resolver)
    }

    /// Make every random decision repeatable.
    pub fn seed(&mut self, seed: u64) {
        self.world.insert_resource(SimRng::seeded(seed));
    }

    /// Attach a host. Callbacks go to the returned receiver; a previous
    /// receiver stops getting anything.
    pub fn connect_host(&mut self) -> Receiver<HostEvent> {
        connect_host(&mut self.world)
    }

    /// Advance the simulation by `dt` seconds.
    pub fn frame(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        // Keeps the previous frame's commands around until drained
        self.world.resource_mut::<Messages<VisualCmd>>().update();
        step_physics(&mut self.world);
        self.schedule.run(&mut self.world);
        self.world.resource_mut::<DriveInput>().end_frame();
        self.world.clear_trackers();
    }

    /// Run `frames` frames of the configured fixed delta.
    pub fn run_frames(&mut self, frames: u32) {
        let dt = self.world.resource::<EngineConfig>().fixed_dt;
        for _ in 0..frames {
            self.frame(dt);
        }
    }

    /// Apply one host command.
    pub fn execute(&mut self, command: HostCommand) -> CommandReply {
        let world = &mut self.world;
        match command {
            HostCommand::SpawnPrimitive { kind } => toolbar_spawn(world, &kind),
            HostCommand::SpawnRecipe { recipe_id } => toolbar_spawn(world, &recipe_id),
            HostCommand::SetEntityColor { id } => {
                let color = world.resource_mut::<SimRng>().color();
                reply(registry::set_color(world, &id, color))
            }
            HostCommand::ResetEntityTransform { id } => {
                reply(registry::reset_transform(world, &id))
            }
            HostCommand::DeleteEntity { id } => reply(registry::destroy(world, &id)),
            HostCommand::SetDrivePower { value } => {
                set_drive_power(world, value);
                CommandReply::Ok
            }
            HostCommand::PlayerAttack => {
                player_attack(world);
                CommandReply::Ok
            }
            HostCommand::UpdateEntityMetadata { id, patch } => {
                reply(metadata::update_metadata(world, &id, &patch))
            }
            HostCommand::SetAiEnabled(enabled) => {
                set_ai_enabled(world, enabled);
                CommandReply::Ok
            }
            HostCommand::SetCombatEnabled(enabled) => {
                set_combat_enabled(world, enabled);
                CommandReply::Ok
            }
            HostCommand::SetSpawnersEnabled(enabled) => {
                set_spawners_enabled(world, enabled);
                CommandReply::Ok
            }
            HostCommand::EnterDriveMode { id } => match registry::lookup(world, &id) {
                Some(entity) => reply(enter_drive(world, entity)),
                None => {
                    warn!("cannot drive unknown entity '{}'", id);
                    CommandReply::Ignored
                }
            },
            HostCommand::ExitDriveMode => {
                exit_drive(world);
                CommandReply::Ok
            }
            HostCommand::SetGroundTexture { name } => {
                world.resource_mut::<Environment>().ground_texture = name;
                emit_environment(world);
                CommandReply::Ok
            }
            HostCommand::SetAtmosphere {
                r,
                g,
                b,
                fog_density,
            } => {
                world
                    .resource_mut::<Environment>()
                    .set_atmosphere(Color::new(r, g, b), fog_density);
                emit_environment(world);
                CommandReply::Ok
            }
            HostCommand::ToggleFog(enabled) => {
                world.resource_mut::<Environment>().fog_enabled = enabled;
                emit_environment(world);
                CommandReply::Ok
            }
            HostCommand::SetCameraMode { mode } => set_camera_mode(world, &mode),
            HostCommand::SelectEntity { id } => match metadata::select(world, &id) {
                Some(event) => {
                    world.resource::<HostBridge>().notify(event);
                    CommandReply::Ok
                }
                None => CommandReply::Ignored,
            },
            HostCommand::KeyDown { key } => reply(handle_key(world, &key, true)),
            HostCommand::KeyUp { key } => reply(handle_key(world, &key, false)),
            HostCommand::Zoom { delta } => {
                zoom(world, delta);
                CommandReply::Ok
            }
            HostCommand::ExportWorld => match serializer::export_world(world).to_json() {
                Ok(json) => CommandReply::World(json),
                Err(e) => {
                    error!("world export failed: {}", e);
                    CommandReply::Failed(e.to_string())
                }
            },
            HostCommand::ImportWorld { json } => match serializer::import_world(world, &json) {
                Ok(summary) => CommandReply::Imported(summary),
                Err(e) => {
                    error!("world import rejected: {}", e);
                    CommandReply::Failed(e.to_string())
                }
            },
        }
    }

    /// Presentation commands produced since the last drain.
    pub fn drain_visuals(&mut self) -> Vec<VisualCmd> {
        self.world
            .resource_mut::<Messages<VisualCmd>>()
            .drain()
            .collect()
    }

    pub fn export_world(&mut self) -> WorldDocument {
        serializer::export_world(&mut self.world)
    }

    pub fn import_world(
        &mut self,
        text: &str,
    ) -> Result<serializer::ImportSummary, serializer::WorldDocumentError> {
        serializer::import_world(&mut self.world, text)
    }

    /// Renderer figures reported by telemetry.
    pub fn set_render_stats(&mut self, stats: RenderStats) {
        self.world.insert_resource(stats);
    }

    pub fn entity(&self, id: &str) -> Option<Entity> {
        registry::lookup(&self.world, id)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

fn reply(applied: bool) -> CommandReply {
    if applied {
        CommandReply::Ok
    } else {
        CommandReply::Ignored
    }
}

/// Spawn a direct kind or recipe on the placement ring around the origin.
fn toolbar_spawn(world: &mut World, kind: &str) -> CommandReply {
    let direct = DirectKind::parse(kind);
    let position = world.resource_scope(|world, mut placement: Mut<SpawnPlacement>| {
        let mut rng = world.resource_mut::<SimRng>();
        placement.next(Vec3::ZERO, spawn_lift(direct), &mut rng)
    });

    let spawned = match direct {
        Some(direct) => registry::spawn(world, direct, position, None, None, None)
            .map_err(|e| e.to_string()),
        None => registry::spawn_from_recipe(world, kind, position, None, None)
            .map_err(|e| e.to_string()),
    };
    match spawned {
        Ok(entity) => {
            let id = world
                .get::<EntityId>(entity)
                .map(|id| id.0.clone())
                .unwrap_or_default();
            info!("spawned {} from toolbar", id);
            CommandReply::Spawned { id }
        }
        Err(e) => {
            error!("failed to spawn '{}': {}", kind, e);
            CommandReply::Failed(e)
        }
    }
}

fn emit_environment(world: &mut World) {
    let env = world.resource::<Environment>().clone();
    emit(world, VisualCmd::Environment(env));
}

/// Switch editor cameras. While driving the choice is remembered and
/// applied when drive mode ends.
fn set_camera_mode(world: &mut World, mode: &str) -> CommandReply {
    let Some(camera) = EditorCamera::parse(mode) else {
        warn!("unknown camera mode '{}'", mode);
        return CommandReply::Ignored;
    };
    if world.resource::<DriveState>().active {
        world.resource_mut::<CameraRig>().before_drive = Some(camera);
        debug!("camera mode {} deferred until drive mode ends", mode);
        return CommandReply::Ok;
    }
    let rig = {
        let mut rig = world.resource_mut::<CameraRig>();
        rig.set_editor(camera);
        *rig
    };
    emit(
        world,
        VisualCmd::ActivateCamera {
            kind: rig.mode.type_name(),
            position: rig.position,
            target: rig.target,
        },
    );
    CommandReply::Ok
}
