//! World save and load.
//!
//! A world document holds the environment plus the minimal set needed to
//! rebuild every entity: kind, name, transform, colour and, for recipe
//! instances, the recipe id. Stats and behavior are not saved; they come
//! back from the recipe on load.
//!
//! ```json
//! { "version": "1.0",
//!   "environment": { "clearColor": {"r":0.8,"g":0.5,"b":0.2}, "fogDensity": 0.005, "groundTexture": "sand.jpg" },
//!   "entities": [ { "kind": "car", "name": "car_1",
//!                   "position": {"x":0,"y":1,"z":0}, "rotation": {"x":0,"y":0,"z":0},
//!                   "color": {"r":1,"g":0,"b":0} } ] }
//! ```
//!
//! Older documents using `env`, `type`, `pos` and `rot` are accepted too.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::appearance::{Appearance, Color};
use crate::components::effects::Dying;
use crate::components::entityid::{DisplayName, EntityId, SpawnSeq};
use crate::components::entitykind::{DirectKind, EntityKind};
use crate::components::transform::Transform;
use crate::events::visual::{VisualCmd, emit};
use crate::registry;
use crate::resources::entityindex::EntityIndex;
use crate::resources::environment::Environment;

pub const DOCUMENT_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum WorldDocumentError {
    #[error("malformed world document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported world document version '{0}'")]
    UnsupportedVersion(String),
}

/// What an import managed to rebuild.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub created: usize,
    pub failed: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3Doc {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for Vec3Doc {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vec3Doc> for Vec3 {
    fn from(v: Vec3Doc) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentDoc {
    pub clear_color: Color,
    pub fog_density: f32,
    pub ground_texture: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDoc {
    #[serde(alias = "type")]
    pub kind: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(alias = "pos")]
    pub position: Vec3Doc,
    #[serde(default, alias = "rot")]
    pub rotation: Vec3Doc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldDocument {
    pub version: String,
    #[serde(default, alias = "env")]
    pub environment: Option<EnvironmentDoc>,
    #[serde(default)]
    pub entities: Vec<EntityDoc>,
}

impl WorldDocument {
    pub fn parse(text: &str) -> Result<Self, WorldDocumentError> {
        let doc: WorldDocument = serde_json::from_str(text)?;
        if doc.version != DOCUMENT_VERSION {
            return Err(WorldDocumentError::UnsupportedVersion(doc.version));
        }
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, WorldDocumentError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Snapshot the world. Entities are listed in creation order; dying ones
/// are left out.
pub fn export_world(world: &mut World) -> WorldDocument {
    let env = world.resource::<Environment>().clone();
    let mut rows: Vec<(SpawnSeq, EntityDoc)> = world
        .query_filtered::<(
            &EntityId,
            &DisplayName,
            &SpawnSeq,
            &EntityKind,
            &Transform,
            Option<&Appearance>,
        ), Without<Dying>>()
        .iter(world)
        .map(|(id, display, seq, kind, transform, appearance)| {
            let doc = EntityDoc {
                kind: kind.tag().to_string(),
                name: id.0.clone(),
                display_name: (display.0 != id.0).then(|| display.0.clone()),
                position: transform.position.into(),
                rotation: transform.rotation.into(),
                color: appearance.and_then(|a| a.color),
                recipe_id: kind.recipe_id().map(str::to_string),
            };
            (*seq, doc)
        })
        .collect();
    rows.sort_by_key(|(seq, _)| *seq);

    WorldDocument {
        version: DOCUMENT_VERSION.to_string(),
        environment: Some(EnvironmentDoc {
            clear_color: env.clear_color,
            fog_density: env.fog_density,
            ground_texture: env.ground_texture,
        }),
        entities: rows.into_iter().map(|(_, doc)| doc).collect(),
    }
}

fn restore_entity(world: &mut World, doc: &EntityDoc) -> Option<Entity> {
    let position = Vec3::from(doc.position);
    let rotation = Some(Vec3::from(doc.rotation));
    let entity = if doc.kind == "recipe" {
        let Some(recipe_id) = doc.recipe_id.as_deref() else {
            warn!("recipe entity '{}' has no recipe id", doc.name);
            return None;
        };
        registry::spawn_from_recipe(world, recipe_id, position, rotation, Some(&doc.name))
            .map_err(|e| warn!("could not restore '{}': {}", doc.name, e))
            .ok()?
    } else {
        let Some(kind) = DirectKind::parse(&doc.kind) else {
            warn!("unknown entity kind '{}' for '{}'", doc.kind, doc.name);
            return None;
        };
        registry::spawn(world, kind, position, rotation, doc.color, Some(&doc.name))
            .map_err(|e| warn!("could not restore '{}': {}", doc.name, e))
            .ok()?
    };
    if let Some(display_name) = &doc.display_name {
        if let Some(mut name) = world.get_mut::<DisplayName>(entity) {
            name.0 = display_name.clone();
        }
    }
    Some(entity)
}

/// Replace the world with the contents of `doc`.
///
/// Every current entity is destroyed, the environment is restored, then
/// entities are recreated in document order under their saved ids. Entries
/// that cannot be rebuilt are logged and counted as failed.
pub fn import_document(world: &mut World, doc: &WorldDocument) -> ImportSummary {
    registry::destroy_all(world);
    {
        let mut index = world.resource_mut::<EntityIndex>();
        for entity in &doc.entities {
            index.reclaim(&entity.name);
        }
    }

    if let Some(env_doc) = &doc.environment {
        let env = {
            let mut env = world.resource_mut::<Environment>();
            env.set_atmosphere(env_doc.clear_color, env_doc.fog_density);
            env.ground_texture = env_doc.ground_texture.clone();
            env.clone()
        };
        emit(world, VisualCmd::Environment(env));
    }

    let mut summary = ImportSummary::default();
    for entity in &doc.entities {
        match restore_entity(world, entity) {
            Some(_) => summary.created += 1,
            None => summary.failed += 1,
        }
    }
    info!(
        "world loaded: {} entities created, {} failed",
        summary.created, summary.failed
    );
    summary
}

/// Parse and import a world document. A malformed document leaves the
/// current world untouched.
pub fn import_world(world: &mut World, text: &str) -> Result<ImportSummary, WorldDocumentError> {
    let doc = WorldDocument::parse(text)?;
    Ok(import_document(world, &doc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_legacy_field_names() {
        let doc = WorldDocument::parse(
            r#"{"version": "1.0",
                "env": {"clearColor": {"r": 0.1, "g": 0.2, "b": 0.3}, "fogDensity": 0.01, "groundTexture": "grass.jpg"},
                "entities": [{"type": "box", "name": "box_1",
                              "pos": {"x": 1, "y": 2, "z": 3}, "rot": {"x": 0, "y": 1, "z": 0},
                              "color": null}]}"#,
        )
        .unwrap();
        assert_eq!(doc.environment.unwrap().ground_texture, "grass.jpg");
        assert_eq!(doc.entities[0].kind, "box");
        assert_eq!(doc.entities[0].position, Vec3Doc { x: 1.0, y: 2.0, z: 3.0 });
        assert!(doc.entities[0].color.is_none());
    }

    #[test]
    fn rejects_other_versions() {
        assert!(matches!(
            WorldDocument::parse(r#"{"version": "2.0", "entities": []}"#),
            Err(WorldDocumentError::UnsupportedVersion(v)) if v == "2.0"
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            WorldDocument::parse("{not json"),
            Err(WorldDocumentError::Json(_))
        ));
    }

    #[test]
    fn optional_fields_are_omitted() {
        let doc = WorldDocument {
            version: DOCUMENT_VERSION.into(),
            environment: None,
            entities: vec![EntityDoc {
                kind: "sphere".into(),
                name: "sphere_1".into(),
                display_name: None,
                position: Vec3Doc::default(),
                rotation: Vec3Doc::default(),
                color: None,
                recipe_id: None,
            }],
        };
        let text = doc.to_json().unwrap();
        assert!(!text.contains("recipeId"));
        assert!(!text.contains("color"));
        assert!(!text.contains("displayName"));
    }
}
