//! Physics facade consumed by the simulation layer.
//!
//! The physics engine owns every rigid body. The core only holds opaque
//! [`BodyHandle`]s and talks to the engine through the narrow
//! [`PhysicsWorld`] contract: create/remove bodies, read and write
//! velocities, apply impulses, switch motion types and run intersection
//! tests. The active backend is stored in the [`Physics`] resource.
//!
//! [`KinematicWorld`](crate::resources::kinematic::KinematicWorld) is the
//! built-in backend used by the headless runner and the tests.

use bevy_ecs::prelude::Resource;
use glam::Vec3;
use std::ops::{Deref, DerefMut};
use thiserror::Error;

/// Collision category for static scenery (walls, buildings).
pub const CAT_STATIC: u32 = 1;
/// Collision category for player-controllable vehicles.
pub const CAT_PLAYER: u32 = 2;
/// Collision category for AI mobs.
pub const CAT_MOB: u32 = 4;
/// Mask that collides with every category.
pub const CAT_ALL: u32 = 0xFF;

/// Opaque reference to a body owned by the physics world.
///
/// Handles are never reused by a backend, so a stale handle simply stops
/// resolving after its body is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u64);

/// Whether the solver integrates a body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionType {
    Dynamic,
    Static,
}

/// Collision shape in body-local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColliderShape {
    /// Axis-aligned box with its centre offset from the body origin.
    Box { half_extents: Vec3, offset: Vec3 },
    Sphere { radius: f32 },
}

impl ColliderShape {
    /// Box of the given full size centred on the body origin.
    pub fn cuboid(size: Vec3) -> Self {
        ColliderShape::Box {
            half_extents: size * 0.5,
            offset: Vec3::ZERO,
        }
    }

    /// Box of the given full size whose centre sits at `offset`.
    pub fn offset_box(offset: Vec3, size: Vec3) -> Self {
        ColliderShape::Box {
            half_extents: size * 0.5,
            offset,
        }
    }

    /// Local (min, max) bounds of the shape, ignoring rotation.
    pub fn local_bounds(&self) -> (Vec3, Vec3) {
        match *self {
            ColliderShape::Box {
                half_extents,
                offset,
            } => (offset - half_extents, offset + half_extents),
            ColliderShape::Sphere { radius } => (Vec3::splat(-radius), Vec3::splat(radius)),
        }
    }
}

/// Everything a backend needs to create a body.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyDesc {
    pub position: Vec3,
    pub yaw: f32,
    pub shape: ColliderShape,
    /// Mass in kg. Zero creates a static body.
    pub mass: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Zero inertia: the body never tips over from contacts.
    pub lock_rotation: bool,
    pub membership: u32,
    pub mask: u32,
}

impl BodyDesc {
    /// Dynamic body with unit mass and default surface parameters.
    pub fn new(position: Vec3, shape: ColliderShape) -> Self {
        Self {
            position,
            yaw: 0.0,
            shape,
            mass: 1.0,
            friction: 0.5,
            restitution: 0.3,
            lock_rotation: false,
            membership: 0,
            mask: CAT_ALL,
        }
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_filter(mut self, membership: u32, mask: u32) -> Self {
        self.membership = membership;
        self.mask = mask;
        self
    }

    pub fn locked(mut self) -> Self {
        self.lock_rotation = true;
        self
    }

    pub fn motion_type(&self) -> MotionType {
        if self.mass > 0.0 {
            MotionType::Dynamic
        } else {
            MotionType::Static
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("physics world unavailable: {0}")]
    Unavailable(String),
}

/// Narrow contract between the simulation core and a physics engine.
///
/// Every per-body call tolerates unknown handles: getters return `None` and
/// setters do nothing.
pub trait PhysicsWorld: Send + Sync {
    fn create_body(&mut self, desc: BodyDesc) -> Result<BodyHandle, PhysicsError>;
    /// Returns `false` if the handle was unknown.
    fn remove_body(&mut self, body: BodyHandle) -> bool;
    /// Advance the simulation by `dt` seconds.
    fn step(&mut self, dt: f32);

    fn position(&self, body: BodyHandle) -> Option<Vec3>;
    fn yaw(&self, body: BodyHandle) -> Option<f32>;
    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec3>;
    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3);
    fn angular_velocity(&self, body: BodyHandle) -> Option<Vec3>;
    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: Vec3);
    /// Apply an impulse through the body's centre of mass.
    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3);
    fn motion_type(&self, body: BodyHandle) -> Option<MotionType>;
    fn set_motion_type(&mut self, body: BodyHandle, motion: MotionType);
    /// Teleport a body. Velocities are left untouched.
    fn set_transform(&mut self, body: BodyHandle, position: Vec3, yaw: f32);
    /// Volumetric overlap test between two bodies.
    fn intersects(&self, a: BodyHandle, b: BodyHandle) -> bool;
    fn body_count(&self) -> usize;
}

/// Resource holding the active physics backend.
#[derive(Resource)]
pub struct Physics(pub Box<dyn PhysicsWorld>);

impl Physics {
    pub fn new(world: impl PhysicsWorld + 'static) -> Self {
        Physics(Box::new(world))
    }
}

impl Deref for Physics {
    type Target = dyn PhysicsWorld;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl DerefMut for Physics {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_mass_is_static() {
        let desc = BodyDesc::new(Vec3::ZERO, ColliderShape::cuboid(Vec3::ONE)).with_mass(0.0);
        assert_eq!(desc.motion_type(), MotionType::Static);
        let desc = desc.with_mass(1.0);
        assert_eq!(desc.motion_type(), MotionType::Dynamic);
    }

    #[test]
    fn offset_box_bounds() {
        let shape = ColliderShape::offset_box(Vec3::new(0.0, -0.35, 0.0), Vec3::new(2.5, 1.3, 4.2));
        let (min, max) = shape.local_bounds();
        assert!((min.y - -1.0).abs() < 1e-6);
        assert!((max.y - 0.3).abs() < 1e-6);
        assert!((max.z - 2.1).abs() < 1e-6);
    }
}
