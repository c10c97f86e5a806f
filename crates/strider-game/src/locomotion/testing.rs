//! Deterministic physics body for controller tests

use glam::{Quat, Vec3};
use strider_core::Transform;
use strider_physics::{GroundHit, PhysicsBody, SurfaceTag};

/// A flat (or tilted) infinite floor at `height`
#[derive(Debug, Clone)]
pub struct TestGround {
    pub height: f32,
    pub normal: Vec3,
    pub tilt_degrees: f32,
    pub tag: SurfaceTag,
}

impl TestGround {
    pub fn flat(height: f32) -> Self {
        Self {
            height,
            normal: Vec3::Y,
            tilt_degrees: 0.0,
            tag: SurfaceTag::Untagged,
        }
    }

    pub fn tilted(height: f32, tilt_degrees: f32) -> Self {
        Self {
            tilt_degrees,
            normal: Quat::from_rotation_x(tilt_degrees.to_radians()) * Vec3::Y,
            ..Self::flat(height)
        }
    }
}

/// Point-mass body with explicit integration
#[derive(Debug, Clone)]
pub struct TestBody {
    pub transform: Transform,
    pub velocity: Vec3,
    pub pending_force: Vec3,
    pub ground: Option<TestGround>,
}

impl TestBody {
    pub fn on_ground() -> Self {
        Self {
            transform: Transform::default(),
            velocity: Vec3::ZERO,
            pending_force: Vec3::ZERO,
            ground: Some(TestGround::flat(0.0)),
        }
    }

    pub fn in_air(height: f32, velocity: Vec3) -> Self {
        Self {
            transform: Transform::from_position(Vec3::new(0.0, height, 0.0)),
            velocity,
            ..Self::on_ground()
        }
    }

    /// Integrate gravity and pending forces, then move
    pub fn step(&mut self, dt: f32) {
        self.velocity += (self.gravity() + self.pending_force) * dt;
        self.transform.position += self.velocity * dt;
        self.pending_force = Vec3::ZERO;
    }
}

impl PhysicsBody for TestBody {
    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn add_force(&mut self, force: Vec3) {
        self.pending_force += force;
    }

    fn position(&self) -> Vec3 {
        self.transform.position
    }

    fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.transform.rotation = rotation;
    }

    fn raycast(&self, origin: Vec3, _direction: Vec3, max_distance: f32) -> Option<GroundHit> {
        let ground = self.ground.as_ref()?;
        let distance = origin.y - ground.height;
        if !(0.0..=max_distance).contains(&distance) {
            return None;
        }
        Some(GroundHit {
            normal: ground.normal,
            tilt_degrees: ground.tilt_degrees,
            tag: ground.tag.clone(),
            entity: None,
            distance,
        })
    }
}
