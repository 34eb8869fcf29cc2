//! Camera rig bookkeeping.
//!
//! The renderer owns the real cameras. The core only tracks which one is
//! active and where it is, because drive mode swaps cameras and telemetry
//! reports the camera position.

use bevy_ecs::prelude::{Entity, Resource};
use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI};

pub const ORBIT_ALPHA: f32 = -FRAC_PI_2;
pub const ORBIT_BETA: f32 = PI / 2.5;
pub const ORBIT_RADIUS: f32 = 15.0;
pub const CHASE_ALPHA: f32 = -FRAC_PI_2;
pub const CHASE_BETA: f32 = PI / 3.0;
pub const CHASE_RADIUS: f32 = 10.0;
pub const CHASE_MIN_RADIUS: f32 = 5.0;
pub const CHASE_MAX_RADIUS: f32 = 50.0;
pub const WALK_EYE_HEIGHT: f32 = 2.0;

/// Editor camera modes the host can pick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorCamera {
    Orbit,
    Walk,
}

impl EditorCamera {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "orbit" => Some(EditorCamera::Orbit),
            "walk" => Some(EditorCamera::Walk),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraMode {
    Editor(EditorCamera),
    /// Orbiting follow camera bound to the driven entity.
    Chase { target: Entity, radius: f32 },
}

impl CameraMode {
    /// Class-style name reported in stats ticks.
    pub fn type_name(&self) -> &'static str {
        match self {
            CameraMode::Editor(EditorCamera::Orbit) => "ArcRotateCamera",
            CameraMode::Editor(EditorCamera::Walk) => "UniversalCamera",
            CameraMode::Chase { .. } => "ArcRotateCamera",
        }
    }
}

/// Position on an orbit of `radius` around `target`.
pub fn orbit_position(target: Vec3, alpha: f32, beta: f32, radius: f32) -> Vec3 {
    target
        + Vec3::new(
            radius * alpha.cos() * beta.sin(),
            radius * beta.cos(),
            radius * alpha.sin() * beta.sin(),
        )
}

#[derive(Resource, Clone, Copy, Debug)]
pub struct CameraRig {
    pub mode: CameraMode,
    /// Editor camera to return to when drive mode ends.
    pub before_drive: Option<EditorCamera>,
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        let target = Vec3::ZERO;
        Self {
            mode: CameraMode::Editor(EditorCamera::Orbit),
            before_drive: None,
            position: orbit_position(target, ORBIT_ALPHA, ORBIT_BETA, ORBIT_RADIUS),
            target,
        }
    }
}

impl CameraRig {
    pub fn set_editor(&mut self, camera: EditorCamera) {
        self.mode = CameraMode::Editor(camera);
        match camera {
            EditorCamera::Orbit => {
                self.position = orbit_position(self.target, ORBIT_ALPHA, ORBIT_BETA, ORBIT_RADIUS);
            }
            EditorCamera::Walk => {
                // Walk mode starts where the orbit camera was, at eye height.
                self.position.y = WALK_EYE_HEIGHT;
            }
        }
    }

    pub fn active_editor(&self) -> Option<EditorCamera> {
        match self.mode {
            CameraMode::Editor(camera) => Some(camera),
            CameraMode::Chase { .. } => None,
        }
    }

    /// Switch to the chase camera, remembering the editor camera.
    pub fn chase(&mut self, target: Entity, at: Vec3) {
        if let Some(editor) = self.active_editor() {
            self.before_drive = Some(editor);
        }
        self.mode = CameraMode::Chase {
            target,
            radius: CHASE_RADIUS,
        };
        self.follow(at);
    }

    /// Leave the chase camera for the editor camera used before it.
    pub fn restore(&mut self) {
        let editor = self.before_drive.take().unwrap_or(EditorCamera::Orbit);
        self.target = Vec3::ZERO;
        self.set_editor(editor);
    }

    /// Keep the chase camera on its target.
    pub fn follow(&mut self, at: Vec3) {
        if let CameraMode::Chase { radius, .. } = self.mode {
            self.target = at;
            self.position = orbit_position(at, CHASE_ALPHA, CHASE_BETA, radius);
        }
    }

    /// Zoom the chase camera, within its radius limits.
    pub fn zoom(&mut self, delta: f32) {
        if let CameraMode::Chase { target, radius } = self.mode {
            let radius = (radius + delta).clamp(CHASE_MIN_RADIUS, CHASE_MAX_RADIUS);
            self.mode = CameraMode::Chase { target, radius };
            let at = self.target;
            self.follow(at);
        }
    }
}
