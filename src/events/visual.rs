//! Presentation side effects.
//!
//! The core never touches meshes, materials or GUI controls. Whatever the
//! renderer should show is written as a [`VisualCmd`] message; the host
//! drains them after each frame (see
//! [`Engine::drain_visuals`](crate::engine::Engine::drain_visuals)).

use bevy_ecs::message::Message;
use bevy_ecs::prelude::*;
use glam::Vec3;
use smallvec::SmallVec;

use crate::components::appearance::{Color, PartVisual};
use crate::resources::dashboard::DashboardLayout;
use crate::resources::environment::Environment;

#[derive(Message, Clone, Debug, PartialEq)]
pub enum VisualCmd {
    /// Build the visuals of a new entity.
    Materialize {
        id: String,
        kind: &'static str,
        position: Vec3,
        rotation: Vec3,
        color: Option<Color>,
        parts: SmallVec<[PartVisual; 6]>,
    },
    /// Dispose every visual of the entity.
    Remove { id: String },
    SetColor { id: String, color: Color },
    SetPartColors { id: String, color: Color },
    /// Tint red until the matching `RestoreColor`.
    Flash { id: String, color: Color },
    RestoreColor { id: String },
    DamagePopup {
        id: String,
        serial: u32,
        text: String,
        offset_y: f32,
        alpha: f32,
    },
    RemovePopup { id: String, serial: u32 },
    /// Uniform scale, used by the death shrink.
    Shrink { id: String, scale: f32 },
    LegSwing { id: String, left: f32, right: f32 },
    HealthBar { id: String, fraction: f32 },
    RemoveHealthBar { id: String },
    SetHealthBarsVisible(bool),
    Dashboard { id: String, layout: DashboardLayout },
    Environment(Environment),
    ActivateCamera {
        kind: &'static str,
        position: Vec3,
        target: Vec3,
    },
}

/// Queue a visual command from exclusive code.
pub fn emit(world: &mut World, cmd: VisualCmd) {
    world.resource_mut::<Messages<VisualCmd>>().write(cmd);
}
