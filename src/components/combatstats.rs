use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// Damageable, AI-drivable stats. Entities without it cannot be hurt.
///
/// Field names on the wire follow the recipe format (`hp`, `maxHp`, `atk`,
/// `speed`).
#[derive(Component, Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatStats {
    pub hp: f32,
    #[serde(rename = "maxHp")]
    pub max_hp: f32,
    #[serde(rename = "atk", default)]
    pub attack_power: f32,
    #[serde(rename = "speed", default)]
    pub move_speed: f32,
}

impl CombatStats {
    /// Full health, no attack, no movement.
    pub fn with_hp(hp: f32) -> Self {
        Self {
            hp,
            max_hp: hp,
            attack_power: 0.0,
            move_speed: 0.0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Remaining health as a fraction of max, clamped at zero.
    pub fn fraction(&self) -> f32 {
        if self.max_hp <= 0.0 {
            return 0.0;
        }
        (self.hp / self.max_hp).max(0.0)
    }
}
