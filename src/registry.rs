//! Entity registry: creating, editing and destroying logical entities.
//!
//! Everything here runs with exclusive world access, from host commands,
//! the serializer or the recipe materialization system. Creation attaches
//! a physics body with a kind-specific collision shape, registers the id in
//! the [`EntityIndex`] and asks the presentation layer to build visuals.
//! Destruction undoes all of that and prunes spawner bookkeeping, so no
//! spawner ever tracks a child that is gone.
//!
//! Per-id operations on unknown ids are silent no-ops that return `false`
//! or `None`: an entity may legitimately die between a UI action and its
//! execution.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, info, warn};
use smallvec::SmallVec;
use thiserror::Error;

use crate::components::appearance::{Appearance, BuildingStyle, Color, PartShape, PartVisual};
use crate::components::behavior::Behavior;
use crate::components::combatstats::CombatStats;
use crate::components::effects::HealthBar;
use crate::components::entityid::{DisplayName, EntityId, SpawnSeq};
use crate::components::entitykind::{DirectKind, EntityKind};
use crate::components::legs::Legs;
use crate::components::mob::{AiMode, AttackTimer, Mob, RoamState};
use crate::components::physicsbody::PhysicsBody;
use crate::components::spawner::{SpawnedBy, SpawnerState};
use crate::components::transform::Transform;
use crate::events::visual::{VisualCmd, emit};
use crate::resources::dashboard::{DashboardData, DashboardLayout};
use crate::resources::directors::DirectorSwitches;
use crate::resources::entityindex::EntityIndex;
use crate::resources::physics::{
    BodyDesc, CAT_ALL, CAT_MOB, CAT_PLAYER, CAT_STATIC, ColliderShape, MotionType, Physics,
    PhysicsError,
};
use crate::resources::possession::Possession;
use crate::resources::race::RaceTracker;
use crate::resources::recipes::{RecipeError, RecipeResolver, RecipeTemplate};
use crate::resources::rng::SimRng;

pub const CAR_HP: f32 = 200.0;
pub const DEFAULT_HP: f32 = 100.0;
pub const FINISH_ZONE_HEIGHT: f32 = 2.0;
pub const FINISH_ZONE_COLOR: Color = Color::GREEN;
/// Spawn height used by [`reset_transform`].
pub const VEHICLE_RESET_HEIGHT: f32 = 1.5;
pub const RESET_HEIGHT: f32 = 1.0;

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error(transparent)]
    Recipe(#[from] RecipeError),
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

/// Everything needed to insert a logical entity.
struct EntityParts {
    id: String,
    display_name: String,
    kind: EntityKind,
    transform: Transform,
    body: BodyDesc,
    appearance: Appearance,
    stats: Option<CombatStats>,
}

/// Resolve an id to a live entity.
pub fn lookup(world: &World, id: &str) -> Option<Entity> {
    world.resource::<EntityIndex>().get(id)
}

fn insert_entity(world: &mut World, parts: EntityParts) -> Result<Entity, PhysicsError> {
    let handle = world.resource_mut::<Physics>().create_body(parts.body)?;
    let seq = world.resource_mut::<EntityIndex>().next_seq();

    let mut entity = world.spawn((
        EntityId(parts.id.clone()),
        DisplayName(parts.display_name),
        SpawnSeq(seq),
        parts.kind.clone(),
        parts.transform,
        PhysicsBody(handle),
        parts.appearance.clone(),
    ));
    if let Some(stats) = parts.stats {
        entity.insert((stats, HealthBar::default()));
    }
    let entity = entity.id();

    world
        .resource_mut::<EntityIndex>()
        .insert(parts.id.clone(), entity);

    emit(
        world,
        VisualCmd::Materialize {
            id: parts.id.clone(),
            kind: parts.kind.tag(),
            position: parts.transform.position,
            rotation: parts.transform.rotation,
            color: parts.appearance.color,
            parts: parts.appearance.parts,
        },
    );
    if parts.stats.is_some() {
        emit(
            world,
            VisualCmd::HealthBar {
                id: parts.id,
                fraction: 1.0,
            },
        );
    }
    Ok(entity)
}

fn direct_body(kind: DirectKind, position: Vec3, yaw: f32) -> BodyDesc {
    match kind {
        DirectKind::Box => BodyDesc::new(position, ColliderShape::cuboid(Vec3::ONE)),
        DirectKind::Sphere => BodyDesc::new(position, ColliderShape::Sphere { radius: 0.5 }),
        DirectKind::Wall => {
            BodyDesc::new(position, ColliderShape::cuboid(Vec3::new(2.0, 2.0, 0.1)))
                .with_mass(0.0)
                .with_filter(CAT_STATIC, CAT_ALL)
        }
        // Silhouette boxes: wheels hang below the body, head sits above.
        DirectKind::Car => BodyDesc::new(
            position,
            ColliderShape::offset_box(Vec3::new(0.0, -0.35, 0.0), Vec3::new(2.5, 1.3, 4.2)),
        )
        .with_filter(CAT_PLAYER, CAT_ALL)
        .locked(),
        DirectKind::Walker => BodyDesc::new(
            position,
            ColliderShape::offset_box(Vec3::new(0.0, -0.2, 0.0), Vec3::new(1.2, 3.1, 0.7)),
        )
        .with_filter(CAT_PLAYER, CAT_ALL)
        .locked(),
        DirectKind::Finish => {
            BodyDesc::new(position, ColliderShape::cuboid(Vec3::new(8.0, 4.0, 1.0)))
                .with_mass(0.0)
                .with_filter(CAT_STATIC, 0)
        }
    }
    .with_yaw(yaw)
}

fn direct_parts(kind: DirectKind, color: Color) -> SmallVec<[PartVisual; 6]> {
    let mut parts = SmallVec::new();
    match kind {
        DirectKind::Car => {
            parts.push(
                PartVisual::new("body", PartShape::Box, Vec3::new(2.0, 0.6, 4.2), Vec3::ZERO)
                    .with_color(color),
            );
            for (name, x, z) in [
                ("w1", -1.2, 1.4),
                ("w2", 1.2, 1.4),
                ("w3", -1.2, -1.4),
                ("w4", 1.2, -1.4),
            ] {
                parts.push(
                    PartVisual::new(
                        name,
                        PartShape::Cylinder,
                        Vec3::new(1.1, 0.5, 1.1),
                        Vec3::new(x, -0.45, z),
                    )
                    .with_color(Color::TIRE),
                );
            }
        }
        DirectKind::Walker => {
            parts.push(
                PartVisual::new("body", PartShape::Box, Vec3::new(1.0, 1.5, 0.5), Vec3::ZERO)
                    .with_color(color),
            );
            parts.push(
                PartVisual::new(
                    "head",
                    PartShape::Sphere,
                    Vec3::splat(0.7),
                    Vec3::new(0.0, 1.0, 0.0),
                )
                .with_color(color),
            );
            for (name, x) in [("leftLeg", -0.3), ("rightLeg", 0.3)] {
                parts.push(
                    PartVisual::new(
                        name,
                        PartShape::Box,
                        Vec3::new(0.3, 1.0, 0.3),
                        Vec3::new(x, -1.25, 0.0),
                    )
                    .with_color(color),
                );
            }
        }
        DirectKind::Box | DirectKind::Sphere | DirectKind::Wall | DirectKind::Finish => {}
    }
    parts
}

/// Create a primitive, vehicle or finish zone synchronously.
///
/// `name` becomes the id when it was never used this session. Without a
/// colour a random one is picked (finish zones default to green).
pub fn spawn(
    world: &mut World,
    kind: DirectKind,
    position: Vec3,
    rotation: Option<Vec3>,
    color: Option<Color>,
    name: Option<&str>,
) -> Result<Entity, PhysicsError> {
    let mut position = position;
    if kind == DirectKind::Finish {
        position.y = FINISH_ZONE_HEIGHT;
    }
    let rotation = rotation.unwrap_or(Vec3::ZERO);
    let color = match (color, kind) {
        (Some(color), _) => color,
        (None, DirectKind::Finish) => FINISH_ZONE_COLOR,
        (None, _) => world.resource_mut::<SimRng>().color(),
    };
    let stats = match kind {
        DirectKind::Car => Some(CombatStats::with_hp(CAR_HP)),
        DirectKind::Walker => Some(CombatStats::with_hp(DEFAULT_HP)),
        _ => None,
    };

    let id = world
        .resource_mut::<EntityIndex>()
        .allocate(kind.tag(), name);
    let mut appearance = Appearance::with_color(color);
    appearance.parts = direct_parts(kind, color);

    let entity = insert_entity(
        world,
        EntityParts {
            id: id.clone(),
            display_name: id.clone(),
            kind: kind.entity_kind(),
            transform: Transform::new(position, rotation),
            body: direct_body(kind, position, rotation.y),
            appearance,
            stats,
        },
    )?;
    if kind == DirectKind::Walker {
        world.entity_mut(entity).insert(Legs::default());
    }
    debug!("spawned {} at {:?}", id, position);
    Ok(entity)
}

/// Resolve `recipe_id` and instantiate it.
///
/// On failure nothing is created.
pub fn spawn_from_recipe(
    world: &mut World,
    recipe_id: &str,
    position: Vec3,
    rotation: Option<Vec3>,
    explicit_id: Option<&str>,
) -> Result<Entity, SpawnError> {
    let template = world.resource::<RecipeResolver>().resolve(recipe_id)?;
    Ok(spawn_template(world, &template, position, rotation, explicit_id)?)
}

/// Instantiate an already resolved recipe.
///
/// Stats and behavior are copied out of the template. Building and spawner
/// roles become static scenery; other roles with stats become AI mobs.
pub fn spawn_template(
    world: &mut World,
    template: &RecipeTemplate,
    position: Vec3,
    rotation: Option<Vec3>,
    explicit_id: Option<&str>,
) -> Result<Entity, PhysicsError> {
    let rotation = rotation.unwrap_or(Vec3::ZERO);
    let behavior = template.behavior.to_behavior();

    let mut appearance = Appearance::default();
    appearance.parts = template.visuals.iter().filter_map(|v| v.to_part()).collect();
    if let Behavior::Building(role) = &behavior {
        if let Some(style) = BuildingStyle::parse(&role.style) {
            appearance.recolor_parts(style.color());
        }
    }

    let shape = match appearance.part_bounds() {
        Some((min, max)) if (max - min).min_element() > 0.0 => {
            ColliderShape::offset_box((min + max) * 0.5, max - min)
        }
        _ => ColliderShape::cuboid(Vec3::ONE),
    };
    let body = if behavior.is_static() {
        BodyDesc::new(position, shape)
            .with_mass(0.0)
            .with_filter(CAT_STATIC, CAT_ALL)
    } else {
        BodyDesc::new(position, shape).with_filter(CAT_MOB, CAT_PLAYER | CAT_STATIC)
    }
    .with_yaw(rotation.y)
    .locked();

    let stats = match template.stats {
        Some(stats) => Some(stats.to_stats()),
        None if behavior.is_mob() => Some(CombatStats::with_hp(DEFAULT_HP)),
        None => None,
    };

    let id = world
        .resource_mut::<EntityIndex>()
        .allocate(&template.id, explicit_id);
    let display_name = behavior
        .default_owner_name()
        .map(str::to_string)
        .unwrap_or_else(|| template.id.clone());

    let entity = insert_entity(
        world,
        EntityParts {
            id: id.clone(),
            display_name,
            kind: EntityKind::RecipeInstance {
                recipe_id: template.id.clone(),
            },
            transform: Transform::new(position, rotation),
            body,
            appearance,
            stats,
        },
    )?;

    let is_mob = behavior.is_mob() && stats.is_some();
    if is_mob {
        world.entity_mut(entity).insert((
            Mob,
            AiMode::default(),
            RoamState::default(),
            AttackTimer::default(),
        ));
        if !world.resource::<DirectorSwitches>().ai {
            freeze_body(world, entity);
        }
    }
    if let Behavior::Spawner(_) = behavior {
        world.entity_mut(entity).insert(SpawnerState::default());
    }
    let is_dashboard = matches!(behavior, Behavior::Dashboard(_));
    world.entity_mut(entity).insert(behavior);
    if is_dashboard {
        rebuild_dashboard(world, entity);
    }

    debug!("spawned recipe '{}' as {} at {:?}", template.id, id, position);
    Ok(entity)
}

/// Make a body static with zero velocity.
pub(crate) fn freeze_body(world: &mut World, entity: Entity) {
    let Some(body) = world.get::<PhysicsBody>(entity).copied() else {
        return;
    };
    let mut physics = world.resource_mut::<Physics>();
    physics.set_linear_velocity(body.0, Vec3::ZERO);
    physics.set_angular_velocity(body.0, Vec3::ZERO);
    physics.set_motion_type(body.0, MotionType::Static);
}

/// Draw a dashboard's data layout. Missing data draws an empty layout.
pub fn rebuild_dashboard(world: &mut World, entity: Entity) {
    let (Some(id), Some(Behavior::Dashboard(role))) =
        (world.get::<EntityId>(entity), world.get::<Behavior>(entity))
    else {
        return;
    };
    let id = id.0.clone();
    let Some(kind) = role.kind else {
        debug!("dashboard {} has no known layout, nothing to draw", id);
        return;
    };
    let rows = world.resource::<DashboardData>().rows(&role.data_file);
    let layout = DashboardLayout::build(kind, &rows);
    emit(world, VisualCmd::Dashboard { id, layout });
}

/// Destroy the entity with `id`. Unknown ids are a no-op.
pub fn destroy(world: &mut World, id: &str) -> bool {
    match lookup(world, id) {
        Some(entity) => destroy_entity(world, entity),
        None => {
            warn!("destroy: unknown entity id '{}'", id);
            false
        }
    }
}

/// Remove an entity, its physics body and every reference to it.
///
/// If it was possessed, drive mode ends and the race is reset. If it was
/// spawned, its spawner stops tracking it.
pub fn destroy_entity(world: &mut World, entity: Entity) -> bool {
    let Ok(entity_ref) = world.get_entity(entity) else {
        return false;
    };
    let id = entity_ref.get::<EntityId>().map(|id| id.0.clone());
    let body = entity_ref.get::<PhysicsBody>().copied();
    let spawned_by = entity_ref.get::<SpawnedBy>().copied();

    if let (Some(SpawnedBy(spawner)), Some(id)) = (spawned_by, &id) {
        if let Some(mut state) = world.get_mut::<SpawnerState>(spawner) {
            state.active_children.remove(id);
            debug!("{} no longer tracked by its spawner", id);
        }
    }

    if world.resource::<Possession>().is(entity) {
        crate::systems::drive::exit_drive(world);
    }
    {
        let mut race = world.resource_mut::<RaceTracker>();
        if race.racer == Some(entity) || race.finish_zone == Some(entity) {
            race.reset();
        }
    }

    if let Some(body) = body {
        world.resource_mut::<Physics>().remove_body(body.0);
    }
    if let Some(id) = id {
        world.resource_mut::<EntityIndex>().remove(&id);
        emit(world, VisualCmd::Remove { id });
    }
    world.despawn(entity)
}

/// Destroy every logical entity. Returns how many were removed.
pub fn destroy_all(world: &mut World) -> usize {
    let entities: Vec<Entity> = world
        .query_filtered::<Entity, With<EntityId>>()
        .iter(world)
        .collect();
    let count = entities
        .into_iter()
        .filter(|&e| destroy_entity(world, e))
        .count();
    info!("cleared {} entities", count);
    count
}

pub fn set_color(world: &mut World, id: &str, color: Color) -> bool {
    let Some(entity) = lookup(world, id) else {
        warn!("set_color: unknown entity id '{}'", id);
        return false;
    };
    if let Some(mut appearance) = world.get_mut::<Appearance>(entity) {
        appearance.color = Some(color);
    }
    emit(
        world,
        VisualCmd::SetColor {
            id: id.to_string(),
            color,
        },
    );
    true
}

/// Put an entity back near the origin at its kind's spawn height, at rest.
pub fn reset_transform(world: &mut World, id: &str) -> bool {
    let Some(entity) = lookup(world, id) else {
        warn!("reset_transform: unknown entity id '{}'", id);
        return false;
    };
    let height = match world.get::<EntityKind>(entity) {
        Some(kind) if kind.is_vehicle() => VEHICLE_RESET_HEIGHT,
        _ => RESET_HEIGHT,
    };
    let position = Vec3::new(0.0, height, 0.0);
    let yaw = world
        .get::<Transform>(entity)
        .map(Transform::yaw)
        .unwrap_or(0.0);
    if let Some(body) = world.get::<PhysicsBody>(entity).copied() {
        let mut physics = world.resource_mut::<Physics>();
        physics.set_transform(body.0, position, yaw);
        physics.set_linear_velocity(body.0, Vec3::ZERO);
        physics.set_angular_velocity(body.0, Vec3::ZERO);
    }
    if let Some(mut transform) = world.get_mut::<Transform>(entity) {
        transform.position = position;
    }
    true
}

/// Recolour an entity's parts with a building style. Unknown styles are a
/// no-op.
pub fn apply_style(world: &mut World, entity: Entity, style: &str) -> bool {
    let Some(style) = BuildingStyle::parse(style) else {
        debug!("ignoring unknown style '{}'", style);
        return false;
    };
    let color = style.color();
    let Some(mut appearance) = world.get_mut::<Appearance>(entity) else {
        return false;
    };
    appearance.recolor_parts(color);
    let Some(id) = world.get::<EntityId>(entity).map(|id| id.0.clone()) else {
        return false;
    };
    emit(world, VisualCmd::SetPartColors { id, color });
    true
}
