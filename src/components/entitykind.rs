//! Variant tag describing what a logical entity is.

use bevy_ecs::prelude::Component;

/// Basic shapes placed from the editor toolbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveShape {
    Box,
    Sphere,
    Wall,
}

/// Possessable vehicles. The controller picks its control law from this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VehicleKind {
    /// Wheeled: impulse driven with lateral grip.
    Car,
    /// Legged: velocity driven, turns twice as fast.
    Walker,
}

#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Primitive(PrimitiveShape),
    Vehicle(VehicleKind),
    FinishZone,
    RecipeInstance { recipe_id: String },
}

impl EntityKind {
    /// Short tag used for generated ids and in world documents.
    pub fn tag(&self) -> &'static str {
        match self {
            EntityKind::Primitive(PrimitiveShape::Box) => "box",
            EntityKind::Primitive(PrimitiveShape::Sphere) => "sphere",
            EntityKind::Primitive(PrimitiveShape::Wall) => "wall",
            EntityKind::Vehicle(VehicleKind::Car) => "car",
            EntityKind::Vehicle(VehicleKind::Walker) => "walker",
            EntityKind::FinishZone => "finish",
            EntityKind::RecipeInstance { .. } => "recipe",
        }
    }

    pub fn is_vehicle(&self) -> bool {
        matches!(self, EntityKind::Vehicle(_))
    }

    pub fn is_walker(&self) -> bool {
        matches!(self, EntityKind::Vehicle(VehicleKind::Walker))
    }

    pub fn recipe_id(&self) -> Option<&str> {
        match self {
            EntityKind::RecipeInstance { recipe_id } => Some(recipe_id),
            _ => None,
        }
    }
}

/// Kinds that the registry can build synchronously, without a recipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectKind {
    Box,
    Sphere,
    Wall,
    Car,
    Walker,
    Finish,
}

impl DirectKind {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "box" => Some(DirectKind::Box),
            "sphere" => Some(DirectKind::Sphere),
            "wall" => Some(DirectKind::Wall),
            "car" => Some(DirectKind::Car),
            "walker" => Some(DirectKind::Walker),
            "finish" => Some(DirectKind::Finish),
            _ => None,
        }
    }

    pub fn entity_kind(self) -> EntityKind {
        match self {
            DirectKind::Box => EntityKind::Primitive(PrimitiveShape::Box),
            DirectKind::Sphere => EntityKind::Primitive(PrimitiveShape::Sphere),
            DirectKind::Wall => EntityKind::Primitive(PrimitiveShape::Wall),
            DirectKind::Car => EntityKind::Vehicle(VehicleKind::Car),
            DirectKind::Walker => EntityKind::Vehicle(VehicleKind::Walker),
            DirectKind::Finish => EntityKind::FinishZone,
        }
    }

    pub fn tag(self) -> &'static str {
        self.entity_kind().tag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_kinds_round_trip_through_tags() {
        for tag in ["box", "sphere", "wall", "car", "walker", "finish"] {
            let kind = DirectKind::parse(tag).unwrap();
            assert_eq!(kind.tag(), tag);
        }
        assert!(DirectKind::parse("goblin").is_none());
        assert!(DirectKind::parse("recipe").is_none());
    }

    #[test]
    fn only_vehicles_are_vehicles() {
        assert!(DirectKind::Car.entity_kind().is_vehicle());
        assert!(DirectKind::Walker.entity_kind().is_walker());
        assert!(!DirectKind::Finish.entity_kind().is_vehicle());
        let recipe = EntityKind::RecipeInstance {
            recipe_id: "goblin".into(),
        };
        assert_eq!(recipe.recipe_id(), Some("goblin"));
        assert_eq!(recipe.tag(), "recipe");
    }
}
