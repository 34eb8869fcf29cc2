//! Damage events.
//!
//! Every source of damage (mob melee, player attacks) triggers a
//! [`DamageEvent`]; the combat resolver observes it (see
//! [`on_damage`](crate::systems::combat::on_damage)).

use bevy_ecs::prelude::*;

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageEvent {
    pub target: Entity,
    pub amount: f32,
}
