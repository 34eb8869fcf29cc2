//! Behavior roles of recipe instances.
//!
//! The role decides how the directors treat an entity each frame: hostile
//! mobs are chased by the AI director, spawners are ticked by the spawner
//! director, buildings and dashboards are static props. Role data is copied
//! out of the recipe template at creation, so editing an instance never
//! touches the template.

use bevy_ecs::prelude::Component;

pub const DEFAULT_AGGRO_RANGE: f32 = 10.0;
pub const DEFAULT_ATTACK_COOLDOWN_MS: f32 = 1000.0;
pub const DEFAULT_SPAWN_TYPE: &str = "goblin";
pub const DEFAULT_SPAWN_FREQUENCY: f32 = 10.0;
pub const DEFAULT_MAX_SPAWNED: usize = 10;
pub const DEFAULT_STYLE: &str = "Rustic";
pub const DEFAULT_INVENTORY: &str = "armor";

#[derive(Clone, Debug, PartialEq)]
pub struct HostileRole {
    pub aggro_range: f32,
    pub attack_cooldown_ms: f32,
}

impl Default for HostileRole {
    fn default() -> Self {
        Self {
            aggro_range: DEFAULT_AGGRO_RANGE,
            attack_cooldown_ms: DEFAULT_ATTACK_COOLDOWN_MS,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnerRole {
    /// Recipe id of the mobs to spawn.
    pub spawn_type: String,
    pub frequency_seconds: f32,
    pub max_concurrent: usize,
}

impl Default for SpawnerRole {
    fn default() -> Self {
        Self {
            spawn_type: DEFAULT_SPAWN_TYPE.to_string(),
            frequency_seconds: DEFAULT_SPAWN_FREQUENCY,
            max_concurrent: DEFAULT_MAX_SPAWNED,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BuildingRole {
    pub style: String,
    pub inventory_id: String,
}

impl Default for BuildingRole {
    fn default() -> Self {
        Self {
            style: DEFAULT_STYLE.to_string(),
            inventory_id: DEFAULT_INVENTORY.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DashboardKind {
    Grid,
    Graph,
}

impl DashboardKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "grid" => Some(DashboardKind::Grid),
            "graph" => Some(DashboardKind::Graph),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DashboardKind::Grid => "grid",
            DashboardKind::Graph => "graph",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardRole {
    /// Name of the business data file, without extension.
    pub data_file: String,
    /// `None` when the recipe names a layout we do not know; nothing is drawn.
    pub kind: Option<DashboardKind>,
}

#[derive(Component, Clone, Debug, Default, PartialEq)]
pub enum Behavior {
    #[default]
    None,
    Hostile(HostileRole),
    Spawner(SpawnerRole),
    Building(BuildingRole),
    Dashboard(DashboardRole),
}

impl Behavior {
    /// Wire name of the role, as found in recipe templates.
    pub fn type_name(&self) -> &'static str {
        match self {
            Behavior::None => "none",
            Behavior::Hostile(_) => "hostile",
            Behavior::Spawner(_) => "spawner",
            Behavior::Building(_) => "building",
            Behavior::Dashboard(_) => "dashboard",
        }
    }

    /// Buildings and spawners are immovable scenery.
    pub fn is_static(&self) -> bool {
        matches!(self, Behavior::Building(_) | Behavior::Spawner(_))
    }

    /// Roles driven by the AI director.
    pub fn is_mob(&self) -> bool {
        matches!(self, Behavior::None | Behavior::Hostile(_))
    }

    pub fn hostile(&self) -> Option<&HostileRole> {
        match self {
            Behavior::Hostile(role) => Some(role),
            _ => None,
        }
    }

    /// Owner name given to fresh instances of this role, if the role has one.
    pub fn default_owner_name(&self) -> Option<&'static str> {
        match self {
            Behavior::Spawner(_) => Some("New Spawner"),
            Behavior::Building(_) => Some("Ye Ole Shop"),
            Behavior::Dashboard(DashboardRole {
                kind: Some(DashboardKind::Grid),
                ..
            }) => Some("Sales Data Grid"),
            Behavior::Dashboard(_) => Some("Inventory Graph"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_defaults() {
        let spawner = SpawnerRole::default();
        assert_eq!(spawner.spawn_type, "goblin");
        assert_eq!(spawner.frequency_seconds, 10.0);
        assert_eq!(spawner.max_concurrent, 10);
        let building = BuildingRole::default();
        assert_eq!(building.style, "Rustic");
        assert_eq!(building.inventory_id, "armor");
    }

    #[test]
    fn static_and_mob_roles() {
        assert!(Behavior::Spawner(SpawnerRole::default()).is_static());
        assert!(Behavior::Building(BuildingRole::default()).is_static());
        assert!(Behavior::Hostile(HostileRole::default()).is_mob());
        assert!(Behavior::None.is_mob());
        assert!(!Behavior::Dashboard(DashboardRole::default()).is_mob());
    }

    #[test]
    fn dashboard_owner_name_depends_on_layout() {
        let grid = Behavior::Dashboard(DashboardRole {
            data_file: "sales".into(),
            kind: Some(DashboardKind::Grid),
        });
        assert_eq!(grid.default_owner_name(), Some("Sales Data Grid"));
        let graph = Behavior::Dashboard(DashboardRole::default());
        assert_eq!(graph.default_owner_name(), Some("Inventory Graph"));
    }
}
