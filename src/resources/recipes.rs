//! Recipe templates and their resolution.
//!
//! A recipe is an externally stored JSON template describing an entity's
//! visual parts, base stats and behavior role:
//!
//! ```json
//! {
//!   "id": "goblin",
//!   "visuals": [{ "type": "box", "name": "body", "size": [1, 1.2, 0.6],
//!                 "pos": [0, 0.6, 0], "color": { "r": 0.2, "g": 0.6, "b": 0.2 } }],
//!   "stats": { "hp": 50, "maxHp": 50, "atk": 5, "speed": 0.05 },
//!   "behavior": { "type": "hostile", "aggroRange": 10, "attackCooldown": 1000 }
//! }
//! ```
//!
//! [`RecipeResolver`] holds an ordered list of named [`RecipeSource`]s and
//! asks each in turn; the first hit wins. Templates are read-only: the
//! registry copies what it needs into each new instance.

use bevy_ecs::prelude::Resource;
use glam::Vec3;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

use crate::components::appearance::{Color, PartShape, PartVisual};
use crate::components::behavior::{
    Behavior, BuildingRole, DashboardKind, DashboardRole, HostileRole, SpawnerRole,
    DEFAULT_AGGRO_RANGE, DEFAULT_ATTACK_COOLDOWN_MS, DEFAULT_MAX_SPAWNED, DEFAULT_SPAWN_FREQUENCY,
    DEFAULT_SPAWN_TYPE,
};
use crate::components::combatstats::CombatStats;
use crate::resources::config::EngineConfig;

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("i/o error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed json in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("recipe '{recipe_id}' not found (tried: {})", tried.join(", "))]
    NotFound {
        recipe_id: String,
        tried: Vec<String>,
    },
    #[error("recipe '{recipe_id}' is malformed: {message}")]
    Parse { recipe_id: String, message: String },
}

/// One visual part as written in a recipe.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct VisualTemplate {
    #[serde(rename = "type")]
    pub shape: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: Vec<f32>,
    #[serde(default)]
    pub pos: [f32; 3],
    #[serde(default)]
    pub color: Color,
}

impl VisualTemplate {
    /// Convert to a part, or `None` for shapes the core does not know.
    pub fn to_part(&self) -> Option<PartVisual> {
        let dim = |i: usize| self.size.get(i).copied();
        let (shape, size) = match self.shape.as_str() {
            "box" => (
                PartShape::Box,
                Vec3::new(
                    dim(0).unwrap_or(1.0),
                    dim(1).unwrap_or(1.0),
                    dim(2).unwrap_or(1.0),
                ),
            ),
            "sphere" => (PartShape::Sphere, Vec3::splat(dim(0).unwrap_or(1.0))),
            _ => return None,
        };
        Some(
            PartVisual::new(self.name.clone(), shape, size, Vec3::from_array(self.pos))
                .with_color(self.color),
        )
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct DashboardTemplate {
    #[serde(rename = "dataFile", default)]
    pub data_file: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Behavior block of a recipe. Unknown fields are ignored.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorTemplate {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub aggro_range: Option<f32>,
    pub attack_cooldown: Option<f32>,
    pub spawn_type: Option<String>,
    pub frequency: Option<f32>,
    pub max_spawned: Option<usize>,
    pub style: Option<String>,
    pub inventory_id: Option<String>,
    pub dashboard: Option<DashboardTemplate>,
}

impl BehaviorTemplate {
    /// Build the instance role, filling role-specific defaults.
    pub fn to_behavior(&self) -> Behavior {
        match self.kind.as_deref() {
            Some("hostile") => Behavior::Hostile(HostileRole {
                aggro_range: self.aggro_range.unwrap_or(DEFAULT_AGGRO_RANGE),
                attack_cooldown_ms: self.attack_cooldown.unwrap_or(DEFAULT_ATTACK_COOLDOWN_MS),
            }),
            Some("spawner") => Behavior::Spawner(SpawnerRole {
                spawn_type: self
                    .spawn_type
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SPAWN_TYPE.to_string()),
                frequency_seconds: self.frequency.unwrap_or(DEFAULT_SPAWN_FREQUENCY),
                max_concurrent: self.max_spawned.unwrap_or(DEFAULT_MAX_SPAWNED),
            }),
            Some("building") => {
                let defaults = BuildingRole::default();
                Behavior::Building(BuildingRole {
                    style: self.style.clone().unwrap_or(defaults.style),
                    inventory_id: self.inventory_id.clone().unwrap_or(defaults.inventory_id),
                })
            }
            Some("dashboard") => {
                let db = self.dashboard.clone().unwrap_or_default();
                Behavior::Dashboard(DashboardRole {
                    data_file: db.data_file.unwrap_or_default(),
                    kind: db.kind.as_deref().and_then(DashboardKind::parse),
                })
            }
            _ => Behavior::None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RecipeTemplate {
    pub id: String,
    #[serde(default)]
    pub visuals: Vec<VisualTemplate>,
    #[serde(default)]
    pub stats: Option<StatsTemplate>,
    #[serde(default)]
    pub behavior: BehaviorTemplate,
}

/// Stats block of a recipe. `maxHp` defaults to `hp`.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsTemplate {
    pub hp: f32,
    pub max_hp: Option<f32>,
    #[serde(default)]
    pub atk: f32,
    #[serde(default)]
    pub speed: f32,
}

impl StatsTemplate {
    pub fn to_stats(self) -> CombatStats {
        CombatStats {
            hp: self.hp,
            max_hp: self.max_hp.unwrap_or(self.hp),
            attack_power: self.atk,
            move_speed: self.speed,
        }
    }
}

impl RecipeTemplate {
    pub fn from_json(recipe_id: &str, text: &str) -> Result<Self, RecipeError> {
        serde_json::from_str(text).map_err(|e| RecipeError::Parse {
            recipe_id: recipe_id.to_string(),
            message: e.to_string(),
        })
    }
}

/// A place recipes can be looked up in.
pub trait RecipeSource: Send + Sync {
    /// Short name used in logs and `NotFound` errors.
    fn name(&self) -> &str;
    /// `Ok(None)` when this source simply does not have the recipe.
    fn fetch(&self, recipe_id: &str) -> Result<Option<String>, DataLoadError>;
}

/// Recipes stored as `<dir>/<id>.json`.
pub struct DirectorySource {
    name: String,
    dir: PathBuf,
}

impl DirectorySource {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
        }
    }
}

impl RecipeSource for DirectorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, recipe_id: &str) -> Result<Option<String>, DataLoadError> {
        let path = self.dir.join(format!("{recipe_id}.json"));
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(DataLoadError::Io { path, source }),
        }
    }
}

/// Recipes held in memory, for tests and embedding hosts.
#[derive(Default)]
pub struct MemorySource {
    name: String,
    recipes: FxHashMap<String, String>,
}

impl MemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recipes: FxHashMap::default(),
        }
    }

    pub fn with(mut self, recipe_id: impl Into<String>, json: impl Into<String>) -> Self {
        self.insert(recipe_id, json);
        self
    }

    pub fn insert(&mut self, recipe_id: impl Into<String>, json: impl Into<String>) {
        self.recipes.insert(recipe_id.into(), json.into());
    }
}

impl RecipeSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, recipe_id: &str) -> Result<Option<String>, DataLoadError> {
        Ok(self.recipes.get(recipe_id).cloned())
    }
}

/// Ordered recipe search path.
#[derive(Resource, Default)]
pub struct RecipeResolver {
    sources: Vec<Box<dyn RecipeSource>>,
}

impl RecipeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard search path under the configured data root.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut resolver = Self::new();
        for (ns, dir) in config.recipe_dirs() {
            resolver.push(DirectorySource::new(ns, dir));
        }
        resolver
    }

    pub fn push(&mut self, source: impl RecipeSource + 'static) {
        self.sources.push(Box::new(source));
    }

    pub fn with_source(mut self, source: impl RecipeSource + 'static) -> Self {
        self.push(source);
        self
    }

    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    /// Try each source in order; the first that has the recipe wins.
    ///
    /// A source failing with an I/O error is logged and skipped. A recipe
    /// that is found but does not parse is an error; the search stops there.
    pub fn resolve(&self, recipe_id: &str) -> Result<RecipeTemplate, RecipeError> {
        let mut tried = Vec::with_capacity(self.sources.len());
        if !is_safe_id(recipe_id) {
            return Err(RecipeError::NotFound {
                recipe_id: recipe_id.to_string(),
                tried,
            });
        }
        for source in &self.sources {
            tried.push(source.name().to_string());
            match source.fetch(recipe_id) {
                Ok(Some(text)) => {
                    debug!("recipe '{}' resolved from {}", recipe_id, source.name());
                    let mut template = RecipeTemplate::from_json(recipe_id, &text)?;
                    if template.id.is_empty() {
                        template.id = recipe_id.to_string();
                    }
                    return Ok(template);
                }
                Ok(None) => debug!("recipe '{}' not in {}", recipe_id, source.name()),
                Err(e) => warn!("recipe source {} failed: {}", source.name(), e),
            }
        }
        Err(RecipeError::NotFound {
            recipe_id: recipe_id.to_string(),
            tried,
        })
    }
}

fn is_safe_id(recipe_id: &str) -> bool {
    !recipe_id.is_empty()
        && !recipe_id.contains(['/', '\\'])
        && !recipe_id.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOBLIN: &str = r#"{
        "id": "goblin",
        "visuals": [
            {"type": "box", "name": "body", "size": [1, 1.2, 0.6], "pos": [0, 0.6, 0],
             "color": {"r": 0.2, "g": 0.6, "b": 0.2}},
            {"type": "sphere", "name": "head", "size": [0.6], "pos": [0, 1.5, 0],
             "color": {"r": 0.3, "g": 0.7, "b": 0.3}}
        ],
        "stats": {"hp": 50, "maxHp": 50, "atk": 5, "speed": 0.05},
        "behavior": {"type": "hostile", "aggroRange": 12, "attackCooldown": 800}
    }"#;

    #[test]
    fn first_source_wins() {
        let resolver = RecipeResolver::new()
            .with_source(MemorySource::new("monsters").with("goblin", GOBLIN))
            .with_source(
                MemorySource::new("recipes").with("goblin", r#"{"id": "impostor"}"#),
            );
        let template = resolver.resolve("goblin").unwrap();
        assert_eq!(template.id, "goblin");
        assert_eq!(template.visuals.len(), 2);
    }

    #[test]
    fn falls_through_to_later_sources() {
        let resolver = RecipeResolver::new()
            .with_source(MemorySource::new("monsters"))
            .with_source(MemorySource::new("buildings").with("shop", r#"{"id": "shop"}"#));
        assert_eq!(resolver.resolve("shop").unwrap().id, "shop");
    }

    #[test]
    fn not_found_lists_tried_sources() {
        let resolver = RecipeResolver::new()
            .with_source(MemorySource::new("monsters"))
            .with_source(MemorySource::new("dashboard"));
        match resolver.resolve("dragon") {
            Err(RecipeError::NotFound { recipe_id, tried }) => {
                assert_eq!(recipe_id, "dragon");
                assert_eq!(tried, ["monsters", "dashboard"]);
            }
            other => panic!("unexpected {:?}", other.map(|t| t.id)),
        }
    }

    #[test]
    fn path_like_ids_are_rejected() {
        let resolver =
            RecipeResolver::new().with_source(MemorySource::new("m").with("../x", "{}"));
        assert!(resolver.resolve("../x").is_err());
        assert!(resolver.resolve("a/b").is_err());
    }

    #[test]
    fn malformed_recipe_is_a_parse_error() {
        let resolver =
            RecipeResolver::new().with_source(MemorySource::new("m").with("bad", "{ nope"));
        assert!(matches!(resolver.resolve("bad"), Err(RecipeError::Parse { .. })));
    }

    #[test]
    fn hostile_template_keeps_config() {
        let template = RecipeTemplate::from_json("goblin", GOBLIN).unwrap();
        match template.behavior.to_behavior() {
            Behavior::Hostile(role) => {
                assert_eq!(role.aggro_range, 12.0);
                assert_eq!(role.attack_cooldown_ms, 800.0);
            }
            other => panic!("expected hostile, got {:?}", other),
        }
        let stats = template.stats.unwrap().to_stats();
        assert_eq!(stats.max_hp, 50.0);
        assert_eq!(stats.attack_power, 5.0);
    }

    #[test]
    fn role_defaults_are_applied() {
        let spawner: BehaviorTemplate = serde_json::from_str(r#"{"type": "spawner"}"#).unwrap();
        assert_eq!(
            spawner.to_behavior(),
            Behavior::Spawner(SpawnerRole::default())
        );
        let building: BehaviorTemplate = serde_json::from_str(r#"{"type": "building"}"#).unwrap();
        assert_eq!(
            building.to_behavior(),
            Behavior::Building(BuildingRole::default())
        );
        let dashboard: BehaviorTemplate = serde_json::from_str(
            r#"{"type": "dashboard", "dashboard": {"dataFile": "sales", "type": "grid"}}"#,
        )
        .unwrap();
        assert_eq!(
            dashboard.to_behavior(),
            Behavior::Dashboard(DashboardRole {
                data_file: "sales".into(),
                kind: Some(DashboardKind::Grid),
            })
        );
        let missing: BehaviorTemplate = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.to_behavior(), Behavior::None);
    }

    #[test]
    fn unknown_visual_shapes_are_skipped() {
        let v: VisualTemplate =
            serde_json::from_str(r#"{"type": "torus", "name": "ring"}"#).unwrap();
        assert!(v.to_part().is_none());
        let sphere: VisualTemplate =
            serde_json::from_str(r#"{"type": "sphere", "size": [2], "pos": [0, 1, 0]}"#).unwrap();
        let part = sphere.to_part().unwrap();
        assert_eq!(part.size, Vec3::splat(2.0));
        assert_eq!(part.offset, Vec3::new(0.0, 1.0, 0.0));
    }
}
