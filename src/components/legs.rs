use bevy_ecs::prelude::Component;

/// Swing angles (radians around X) of a walker's two legs.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Legs {
    pub left: f32,
    pub right: f32,
}
