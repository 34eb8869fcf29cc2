//! Entity metadata as seen by the host.
//!
//! Selecting an entity sends its position and a JSON description of its
//! state (kind, recipe, owner name, stats and role fields). The host edits
//! that state by sending partial JSON patches back; see [`MetadataPatch`]
//! for the accepted keys. Unknown keys are ignored.

use bevy_ecs::prelude::*;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::components::behavior::{Behavior, DashboardKind};
use crate::components::combatstats::CombatStats;
use crate::components::entityid::{DisplayName, EntityId};
use crate::components::entitykind::EntityKind;
use crate::components::spawner::SpawnerState;
use crate::components::transform::Transform;
use crate::events::host::HostEvent;
use crate::registry;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorInfo {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggro_range: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attack_cooldown: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnerInfo {
    pub spawn_type: String,
    pub frequency: f32,
    pub max_spawned: usize,
    pub active: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardInfo {
    pub data_file: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
}

/// State reported when an entity is selected.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionMetadata {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CombatStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior: Option<BehaviorInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawner: Option<SpawnerInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<DashboardInfo>,
}

impl SelectionMetadata {
    pub fn collect(world: &World, entity: Entity) -> Option<Self> {
        let entity_ref = world.get_entity(entity).ok()?;
        let kind = entity_ref.get::<EntityKind>()?;
        let behavior = entity_ref.get::<Behavior>();
        let mut meta = SelectionMetadata {
            kind: kind.tag(),
            recipe_id: kind.recipe_id().map(str::to_string),
            owner_name: behavior.and(entity_ref.get::<DisplayName>().map(|n| n.0.clone())),
            stats: entity_ref.get::<CombatStats>().copied(),
            behavior: behavior.map(|b| BehaviorInfo {
                kind: b.type_name(),
                aggro_range: b.hostile().map(|h| h.aggro_range),
                attack_cooldown: b.hostile().map(|h| h.attack_cooldown_ms),
            }),
            spawner: None,
            style: None,
            inventory_id: None,
            dashboard: None,
        };
        match behavior {
            Some(Behavior::Spawner(role)) => {
                meta.spawner = Some(SpawnerInfo {
                    spawn_type: role.spawn_type.clone(),
                    frequency: role.frequency_seconds,
                    max_spawned: role.max_concurrent,
                    active: entity_ref
                        .get::<SpawnerState>()
                        .map(|s| s.active_children.len())
                        .unwrap_or(0),
                });
            }
            Some(Behavior::Building(role)) => {
                meta.style = Some(role.style.clone());
                meta.inventory_id = Some(role.inventory_id.clone());
            }
            Some(Behavior::Dashboard(role)) => {
                meta.dashboard = Some(DashboardInfo {
                    data_file: role.data_file.clone(),
                    kind: role.kind.map(DashboardKind::as_str),
                });
            }
            _ => {}
        }
        Some(meta)
    }

    /// Only the plain string fields, no nested objects.
    pub fn primitive_fields(&self) -> serde_json::Value {
        let mut value = json!({ "type": self.kind });
        let fields = [
            ("recipeId", &self.recipe_id),
            ("ownerName", &self.owner_name),
            ("style", &self.style),
            ("inventoryId", &self.inventory_id),
        ];
        for (key, field) in fields {
            if let Some(field) = field {
                value[key] = json!(field);
            }
        }
        value
    }

    /// Serialize for the host, falling back to the primitive fields.
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(text) => text,
            Err(e) => {
                warn!("metadata of a {} did not serialize: {}", self.kind, e);
                self.primitive_fields().to_string()
            }
        }
    }
}

/// Build the selection callback for `id`. Unknown ids yield `None`.
pub fn select(world: &World, id: &str) -> Option<HostEvent> {
    let entity = registry::lookup(world, id)?;
    let meta = SelectionMetadata::collect(world, entity)?;
    let position = world
        .get::<Transform>(entity)
        .map(|t| t.position)
        .unwrap_or_default();
    let name = world
        .get::<DisplayName>(entity)
        .map(|n| n.0.clone())
        .unwrap_or_else(|| id.to_string());
    Some(HostEvent::EntitySelected {
        name,
        id: world
            .get::<EntityId>(entity)
            .map(|i| i.0.clone())
            .unwrap_or_else(|| id.to_string()),
        x: position.x,
        y: position.y,
        z: position.z,
        metadata: meta.to_json(),
    })
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpawnerPatch {
    pub spawn_type: Option<String>,
    pub frequency: Option<f32>,
    pub max_spawned: Option<usize>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPatch {
    pub data_file: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsPatch {
    pub hp: Option<f32>,
    pub max_hp: Option<f32>,
    pub atk: Option<f32>,
    pub speed: Option<f32>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorPatch {
    pub aggro_range: Option<f32>,
    pub attack_cooldown: Option<f32>,
}

/// Partial state edit sent by the property panel.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPatch {
    pub owner_name: Option<String>,
    pub style: Option<String>,
    pub inventory_id: Option<String>,
    pub spawner: Option<SpawnerPatch>,
    pub dashboard: Option<DashboardPatch>,
    pub stats: Option<StatsPatch>,
    pub behavior: Option<BehaviorPatch>,
}

impl MetadataPatch {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Apply to `entity`. Fields that do not fit its role are skipped.
    pub fn apply(self, world: &mut World, entity: Entity) {
        if let Some(name) = self.owner_name {
            if let Some(mut display) = world.get_mut::<DisplayName>(entity) {
                display.0 = name;
            }
        }

        if let Some(patch) = self.stats {
            match world.get_mut::<CombatStats>(entity) {
                Some(mut stats) => {
                    if let Some(hp) = patch.hp {
                        stats.hp = hp;
                    }
                    if let Some(max_hp) = patch.max_hp {
                        stats.max_hp = max_hp;
                    }
                    if let Some(atk) = patch.atk {
                        stats.attack_power = atk;
                    }
                    if let Some(speed) = patch.speed {
                        stats.move_speed = speed;
                    }
                }
                None => debug!("stats patch on an entity without stats"),
            }
        }

        let mut restyle = None;
        let mut rebuild_dashboard = false;
        if let Some(mut behavior) = world.get_mut::<Behavior>(entity) {
            match &mut *behavior {
                Behavior::Hostile(role) => {
                    if let Some(patch) = self.behavior {
                        if let Some(range) = patch.aggro_range {
                            role.aggro_range = range;
                        }
                        if let Some(cooldown) = patch.attack_cooldown {
                            role.attack_cooldown_ms = cooldown;
                        }
                    }
                }
                Behavior::Spawner(role) => {
                    if let Some(patch) = self.spawner {
                        if let Some(spawn_type) = patch.spawn_type {
                            role.spawn_type = spawn_type;
                        }
                        if let Some(frequency) = patch.frequency {
                            role.frequency_seconds = frequency;
                        }
                        if let Some(max) = patch.max_spawned {
                            role.max_concurrent = max;
                        }
                    }
                }
                Behavior::Building(role) => {
                    if let Some(inventory_id) = self.inventory_id {
                        role.inventory_id = inventory_id;
                    }
                    if let Some(style) = self.style {
                        role.style = style.clone();
                        restyle = Some(style);
                    }
                }
                Behavior::Dashboard(role) => {
                    if let Some(patch) = self.dashboard {
                        if let Some(data_file) = patch.data_file {
                            role.data_file = data_file;
                            rebuild_dashboard = true;
                        }
                        if let Some(kind) = patch.kind {
                            role.kind = DashboardKind::parse(&kind);
                            rebuild_dashboard = true;
                        }
                    }
                }
                Behavior::None => {}
            }
        }

        if let Some(style) = restyle {
            registry::apply_style(world, entity, &style);
        }
        if rebuild_dashboard {
            registry::rebuild_dashboard(world, entity);
        }
    }
}

/// Apply a JSON patch to the entity with `id`.
///
/// Returns `false` for unknown ids and unparseable patches; both are
/// logged and otherwise ignored.
pub fn update_metadata(world: &mut World, id: &str, patch: &str) -> bool {
    let Some(entity) = registry::lookup(world, id) else {
        warn!("metadata update for unknown entity '{}'", id);
        return false;
    };
    match MetadataPatch::parse(patch) {
        Ok(patch) => {
            patch.apply(world, entity);
            debug!("metadata of {} updated", id);
            true
        }
        Err(e) => {
            warn!("ignoring malformed metadata patch for {}: {}", id, e);
            false
        }
    }
}
