//! Presentation-facing description of an entity.
//!
//! The core never builds meshes. It keeps just enough visual state to hand
//! to the presentation collaborator (see
//! [`VisualCmd`](crate::events::visual::VisualCmd)) and to serialize the
//! entity's colour.

use bevy_ecs::prelude::Component;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Linear RGB colour, each channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const RED: Color = Color::new(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0);
    pub const TIRE: Color = Color::new(0.05, 0.05, 0.05);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    /// Colour from hue/saturation/value, all in `[0, 1]`.
    pub fn from_hsv(hue: f32, saturation: f32, value: f32) -> Self {
        let h = hue.rem_euclid(1.0) * 6.0;
        let c = value * saturation;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let m = value - c;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Self::new(r + m, g + m, b + m)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartShape {
    Box,
    Sphere,
    Cylinder,
}

/// One child visual part, positioned relative to the entity origin.
#[derive(Clone, Debug, PartialEq)]
pub struct PartVisual {
    pub name: String,
    pub shape: PartShape,
    /// Full extents. Spheres use `x` as the diameter, cylinders `x` as the
    /// diameter and `y` as the height.
    pub size: Vec3,
    pub offset: Vec3,
    pub color: Color,
}

impl PartVisual {
    pub fn new(name: impl Into<String>, shape: PartShape, size: Vec3, offset: Vec3) -> Self {
        Self {
            name: name.into(),
            shape,
            size,
            offset,
            color: Color::WHITE,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Local (min, max) bounds used for physics shape inference.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        let half = match self.shape {
            PartShape::Sphere => Vec3::splat(self.size.x * 0.5),
            PartShape::Box | PartShape::Cylinder => self.size * 0.5,
        };
        (self.offset - half, self.offset + half)
    }
}

/// Colour and child parts of an entity.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct Appearance {
    /// Root material colour. Recipe roots have none; their parts carry colour.
    pub color: Option<Color>,
    pub parts: SmallVec<[PartVisual; 6]>,
}

impl Appearance {
    pub fn with_color(color: Color) -> Self {
        Self {
            color: Some(color),
            parts: SmallVec::new(),
        }
    }

    /// Aggregate bounds across every part, or `None` when there are no parts.
    pub fn part_bounds(&self) -> Option<(Vec3, Vec3)> {
        self.parts.iter().map(PartVisual::bounds).reduce(|(amin, amax), (bmin, bmax)| {
            (amin.min(bmin), amax.max(bmax))
        })
    }

    pub fn recolor_parts(&mut self, color: Color) {
        for part in self.parts.iter_mut() {
            part.color = color;
        }
    }
}

/// Building styles selectable from the property panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildingStyle {
    Rustic,
    Modern,
    Classic,
}

impl BuildingStyle {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Rustic" => Some(BuildingStyle::Rustic),
            "Modern" => Some(BuildingStyle::Modern),
            "Classic" => Some(BuildingStyle::Classic),
            _ => None,
        }
    }

    pub fn color(self) -> Color {
        match self {
            BuildingStyle::Rustic => Color::new(0.5, 0.3, 0.1),
            BuildingStyle::Modern => Color::new(0.2, 0.2, 0.25),
            BuildingStyle::Classic => Color::new(0.8, 0.8, 0.7),
        }
    }
}
