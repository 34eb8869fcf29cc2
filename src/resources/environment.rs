use bevy_ecs::prelude::Resource;

use crate::components::appearance::Color;

const FOG_COLOR_FACTOR: f32 = 0.9;

/// Global scene settings that are saved with the world.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct Environment {
    pub clear_color: Color,
    pub fog_density: f32,
    pub fog_color: Color,
    pub fog_enabled: bool,
    pub ground_texture: String,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            clear_color: Color::new(0.8, 0.5, 0.2),
            fog_density: 0.005,
            fog_color: Color::new(0.7, 0.5, 0.3),
            fog_enabled: true,
            ground_texture: "sand.jpg".to_string(),
        }
    }
}

impl Environment {
    /// Sky colour and fog density. Fog takes a slightly darker sky colour.
    pub fn set_atmosphere(&mut self, color: Color, fog_density: f32) {
        self.clear_color = color;
        self.fog_density = fog_density;
        self.fog_color = color.scaled(FOG_COLOR_FACTOR);
    }
}
