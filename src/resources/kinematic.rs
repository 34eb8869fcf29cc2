//! Built-in kinematic physics backend.
//!
//! [`KinematicWorld`] implements [`PhysicsWorld`] with just enough physics
//! for headless runs and tests:
//!
//! - gravity and optional linear damping on dynamic bodies
//! - a flat ground plane that stops bodies from falling through
//! - ground friction on horizontal velocity while a body rests on the plane
//! - yaw integration from the vertical component of angular velocity
//! - yaw-aware AABB overlap for intersection tests
//!
//! Bodies do not collide with each other. Static bodies never move unless
//! teleported with [`PhysicsWorld::set_transform`].

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::resources::physics::{
    BodyDesc, BodyHandle, ColliderShape, MotionType, PhysicsError, PhysicsWorld,
};

const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

#[derive(Clone, Debug)]
struct KinematicBody {
    position: Vec3,
    yaw: f32,
    linear_velocity: Vec3,
    angular_velocity: Vec3,
    shape: ColliderShape,
    mass: f32,
    friction: f32,
    motion: MotionType,
}

impl KinematicBody {
    fn from_desc(desc: &BodyDesc) -> Self {
        Self {
            position: desc.position,
            yaw: desc.yaw,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            shape: desc.shape,
            mass: desc.mass,
            friction: desc.friction,
            motion: desc.motion_type(),
        }
    }

    /// World-space AABB. Boxes are expanded to cover their yawed footprint.
    fn aabb(&self) -> (Vec3, Vec3) {
        match self.shape {
            ColliderShape::Sphere { radius } => {
                (self.position - Vec3::splat(radius), self.position + Vec3::splat(radius))
            }
            ColliderShape::Box {
                half_extents,
                offset,
            } => {
                let (s, c) = self.yaw.sin_cos();
                let rotated_offset = Vec3::new(
                    offset.x * c + offset.z * s,
                    offset.y,
                    -offset.x * s + offset.z * c,
                );
                let extent = Vec3::new(
                    half_extents.x * c.abs() + half_extents.z * s.abs(),
                    half_extents.y,
                    half_extents.x * s.abs() + half_extents.z * c.abs(),
                );
                let centre = self.position + rotated_offset;
                (centre - extent, centre + extent)
            }
        }
    }
}

/// Minimal physics world for headless simulation.
pub struct KinematicWorld {
    bodies: FxHashMap<BodyHandle, KinematicBody>,
    next_handle: u64,
    /// Acceleration applied to dynamic bodies, in units per second squared.
    pub gravity: Vec3,
    /// Height of the ground plane, or `None` for free fall.
    pub ground_height: Option<f32>,
    /// Velocity damping factor. Applied as `v *= 1 - damping * dt`.
    pub linear_damping: f32,
    available: bool,
}

impl Default for KinematicWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl KinematicWorld {
    pub fn new() -> Self {
        Self {
            bodies: FxHashMap::default(),
            next_handle: 0,
            gravity: DEFAULT_GRAVITY,
            ground_height: Some(0.0),
            linear_damping: 0.0,
            available: true,
        }
    }

    /// World without gravity or ground, handy for isolating control laws.
    pub fn weightless() -> Self {
        Self {
            gravity: Vec3::ZERO,
            ground_height: None,
            ..Self::new()
        }
    }

    /// Simulate a backend that refuses to create bodies.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    fn body_mut(&mut self, body: BodyHandle) -> Option<&mut KinematicBody> {
        self.bodies.get_mut(&body)
    }
}

impl PhysicsWorld for KinematicWorld {
    fn create_body(&mut self, desc: BodyDesc) -> Result<BodyHandle, PhysicsError> {
        if !self.available {
            return Err(PhysicsError::Unavailable(
                "kinematic world is not accepting bodies".into(),
            ));
        }
        self.next_handle += 1;
        let handle = BodyHandle(self.next_handle);
        self.bodies.insert(handle, KinematicBody::from_desc(&desc));
        Ok(handle)
    }

    fn remove_body(&mut self, body: BodyHandle) -> bool {
        self.bodies.remove(&body).is_some()
    }

    fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let gravity = self.gravity;
        let damping = (1.0 - self.linear_damping * dt).max(0.0);
        let ground = self.ground_height;

        for body in self.bodies.values_mut() {
            if body.motion != MotionType::Dynamic {
                continue;
            }
            body.linear_velocity += gravity * dt;
            body.linear_velocity *= damping;
            body.position += body.linear_velocity * dt;
            body.yaw += body.angular_velocity.y * dt;

            if let Some(ground) = ground {
                let (min, _) = body.aabb();
                if min.y <= ground {
                    body.position.y += ground - min.y;
                    if body.linear_velocity.y < 0.0 {
                        body.linear_velocity.y = 0.0;
                    }
                    let grip = (1.0 - body.friction * dt).max(0.0);
                    body.linear_velocity.x *= grip;
                    body.linear_velocity.z *= grip;
                }
            }
        }
    }

    fn position(&self, body: BodyHandle) -> Option<Vec3> {
        self.bodies.get(&body).map(|b| b.position)
    }

    fn yaw(&self, body: BodyHandle) -> Option<f32> {
        self.bodies.get(&body).map(|b| b.yaw)
    }

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec3> {
        self.bodies.get(&body).map(|b| b.linear_velocity)
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3) {
        if let Some(b) = self.body_mut(body) {
            b.linear_velocity = velocity;
        }
    }

    fn angular_velocity(&self, body: BodyHandle) -> Option<Vec3> {
        self.bodies.get(&body).map(|b| b.angular_velocity)
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: Vec3) {
        if let Some(b) = self.body_mut(body) {
            b.angular_velocity = velocity;
        }
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3) {
        if let Some(b) = self.body_mut(body) {
            if b.motion == MotionType::Dynamic && b.mass > 0.0 {
                b.linear_velocity += impulse / b.mass;
            }
        }
    }

    fn motion_type(&self, body: BodyHandle) -> Option<MotionType> {
        self.bodies.get(&body).map(|b| b.motion)
    }

    fn set_motion_type(&mut self, body: BodyHandle, motion: MotionType) {
        if let Some(b) = self.body_mut(body) {
            b.motion = motion;
        }
    }

    fn set_transform(&mut self, body: BodyHandle, position: Vec3, yaw: f32) {
        if let Some(b) = self.body_mut(body) {
            b.position = position;
            b.yaw = yaw;
        }
    }

    fn intersects(&self, a: BodyHandle, b: BodyHandle) -> bool {
        let (Some(a), Some(b)) = (self.bodies.get(&a), self.bodies.get(&b)) else {
            return false;
        };
        let (min_a, max_a) = a.aabb();
        let (min_b, max_b) = b.aabb();
        min_a.x < max_b.x
            && max_a.x > min_b.x
            && min_a.y < max_b.y
            && max_a.y > min_b.y
            && min_a.z < max_b.z
            && max_a.z > min_b.z
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn unit_box(position: Vec3) -> BodyDesc {
        BodyDesc::new(position, ColliderShape::cuboid(Vec3::ONE))
    }

    #[test]
    fn handles_are_not_reused() {
        let mut world = KinematicWorld::new();
        let a = world.create_body(unit_box(Vec3::ZERO)).unwrap();
        assert!(world.remove_body(a));
        let b = world.create_body(unit_box(Vec3::ZERO)).unwrap();
        assert_ne!(a, b);
        assert!(world.position(a).is_none());
    }

    #[test]
    fn unavailable_world_refuses_bodies() {
        let mut world = KinematicWorld::new();
        world.set_available(false);
        assert!(world.create_body(unit_box(Vec3::ZERO)).is_err());
    }

    #[test]
    fn step_integrates_velocity() {
        let mut world = KinematicWorld::weightless();
        let body = world.create_body(unit_box(Vec3::ZERO)).unwrap();
        world.set_linear_velocity(body, Vec3::new(2.0, 0.0, 0.0));
        world.step(0.5);
        assert!(approx_eq(world.position(body).unwrap().x, 1.0));
    }

    #[test]
    fn static_bodies_do_not_move() {
        let mut world = KinematicWorld::new();
        let body = world
            .create_body(unit_box(Vec3::new(0.0, 5.0, 0.0)).with_mass(0.0))
            .unwrap();
        world.set_linear_velocity(body, Vec3::new(1.0, 0.0, 0.0));
        world.step(1.0);
        let p = world.position(body).unwrap();
        assert!(approx_eq(p.x, 0.0));
        assert!(approx_eq(p.y, 5.0));
    }

    #[test]
    fn ground_stops_falling_body() {
        let mut world = KinematicWorld::new();
        let body = world.create_body(unit_box(Vec3::new(0.0, 2.0, 0.0))).unwrap();
        for _ in 0..240 {
            world.step(1.0 / 60.0);
        }
        let p = world.position(body).unwrap();
        assert!(approx_eq(p.y, 0.5));
        assert!(approx_eq(world.linear_velocity(body).unwrap().y, 0.0));
    }

    #[test]
    fn impulse_scales_with_mass() {
        let mut world = KinematicWorld::weightless();
        let body = world
            .create_body(unit_box(Vec3::ZERO).with_mass(2.0))
            .unwrap();
        world.apply_impulse(body, Vec3::new(4.0, 0.0, 0.0));
        assert!(approx_eq(world.linear_velocity(body).unwrap().x, 2.0));
    }

    #[test]
    fn impulse_ignored_on_static_body() {
        let mut world = KinematicWorld::weightless();
        let body = world.create_body(unit_box(Vec3::ZERO)).unwrap();
        world.set_motion_type(body, MotionType::Static);
        world.apply_impulse(body, Vec3::new(4.0, 0.0, 0.0));
        assert!(approx_eq(world.linear_velocity(body).unwrap().x, 0.0));
    }

    #[test]
    fn yaw_follows_angular_velocity() {
        let mut world = KinematicWorld::weightless();
        let body = world.create_body(unit_box(Vec3::ZERO)).unwrap();
        world.set_angular_velocity(body, Vec3::new(0.0, 2.0, 0.0));
        world.step(0.25);
        assert!(approx_eq(world.yaw(body).unwrap(), 0.5));
    }

    #[test]
    fn intersects_detects_overlap() {
        let mut world = KinematicWorld::weightless();
        let a = world.create_body(unit_box(Vec3::ZERO)).unwrap();
        let b = world.create_body(unit_box(Vec3::new(0.9, 0.0, 0.0))).unwrap();
        let c = world.create_body(unit_box(Vec3::new(3.0, 0.0, 0.0))).unwrap();
        assert!(world.intersects(a, b));
        assert!(!world.intersects(a, c));
        assert!(!world.intersects(a, BodyHandle(999)));
    }

    #[test]
    fn yawed_box_covers_rotated_footprint() {
        let mut world = KinematicWorld::weightless();
        let long = world
            .create_body(
                BodyDesc::new(Vec3::ZERO, ColliderShape::cuboid(Vec3::new(1.0, 1.0, 8.0)))
                    .with_yaw(std::f32::consts::FRAC_PI_2),
            )
            .unwrap();
        // Rotated a quarter turn, the long side now spans the X axis.
        let probe = world.create_body(unit_box(Vec3::new(3.5, 0.0, 0.0))).unwrap();
        assert!(world.intersects(long, probe));
    }
}
