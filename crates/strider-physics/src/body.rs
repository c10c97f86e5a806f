//! The physics body seam driven by the locomotion controller, and its
//! rapier3d-backed implementation.

use std::sync::Arc;

use glam::{Quat, Vec3};
use nalgebra::{Quaternion, UnitQuaternion};
use parking_lot::Mutex;
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};
use strider_core::{EntityId, Transform};

use crate::{to_vec3, to_vector, PhysicsError, PhysicsWorld, SurfaceTag};

/// Physics world shared between the host loop and character bodies.
///
/// Each body query takes the lock for the duration of that query only.
pub type SharedPhysics = Arc<Mutex<PhysicsWorld>>;

/// Result of a ground probe
#[derive(Debug, Clone, PartialEq)]
pub struct GroundHit {
    /// Surface normal at the hit point
    pub normal: Vec3,
    /// Raw tilt of the hit surface about its lateral axis, in degrees
    pub tilt_degrees: f32,
    /// Category of the hit surface
    pub tag: SurfaceTag,
    /// Entity owning the hit surface, if known
    pub entity: Option<EntityId>,
    /// Distance along the probe
    pub distance: f32,
}

impl GroundHit {
    /// A hit on an untagged surface with the given normal and tilt
    pub fn new(normal: Vec3, tilt_degrees: f32) -> Self {
        Self {
            normal,
            tilt_degrees,
            tag: SurfaceTag::Untagged,
            entity: None,
            distance: 0.0,
        }
    }
}

/// Rigid body operations the locomotion controller needs.
///
/// Forces passed to `add_force` are mass-normalized: they act as an
/// acceleration for the next integration step only.
pub trait PhysicsBody {
    /// Current linear velocity
    fn velocity(&self) -> Vec3;
    /// Overwrite the linear velocity
    fn set_velocity(&mut self, velocity: Vec3);
    /// Add a force for the next integration step
    fn add_force(&mut self, force: Vec3);
    /// World position of the body origin (the character's feet)
    fn position(&self) -> Vec3;
    /// World rotation
    fn rotation(&self) -> Quat;
    /// Overwrite the world rotation
    fn set_rotation(&mut self, rotation: Quat);
    /// Position and rotation together
    fn transform(&self) -> Transform {
        Transform::from_position_rotation(self.position(), self.rotation())
    }
    /// Gravity acting on the body
    fn gravity(&self) -> Vec3 {
        Vec3::new(0.0, -9.81, 0.0)
    }
    /// Cast a ray that ignores the body itself
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<GroundHit>;
}

/// Character capsule dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterCapsule {
    /// Capsule height (default: 1.6m)
    pub height: f32,
    /// Capsule radius (default: 0.3m)
    pub radius: f32,
    /// Capsule center relative to the body origin
    pub center: Vec3,
}

impl Default for CharacterCapsule {
    fn default() -> Self {
        Self {
            height: 1.6,
            radius: 0.3,
            center: Vec3::new(0.0, 0.8, 0.0),
        }
    }
}

impl CharacterCapsule {
    /// Half-height of the cylindrical section
    pub fn half_segment(&self) -> f32 {
        (self.height - 2.0 * self.radius) / 2.0
    }

    /// Reject capsules too flat to have a cylindrical section
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if self.radius <= 0.0 || self.half_segment() <= 0.0 {
            return Err(PhysicsError::InvalidCapsule {
                height: self.height,
                radius: self.radius,
            });
        }
        Ok(())
    }
}

/// A character rigid body living in a shared rapier world
#[derive(Clone)]
pub struct RapierBody {
    world: SharedPhysics,
    body: RigidBodyHandle,
    collider: ColliderHandle,
}

impl RapierBody {
    /// Spawn a dynamic capsule body with locked rotations at `position`
    pub fn spawn(
        world: &SharedPhysics,
        position: Vec3,
        capsule: CharacterCapsule,
    ) -> Result<Self, PhysicsError> {
        capsule.validate()?;

        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(to_vector(position))
            .lock_rotations()
            .build();
        let collider = ColliderBuilder::capsule_y(capsule.half_segment(), capsule.radius)
            .translation(to_vector(capsule.center))
            .friction(0.0) // Smooth sliding against walls
            .restitution(0.0)
            .build();

        let (body, collider) = world.lock().add_dynamic_body(rigid_body, collider);
        Ok(Self {
            world: Arc::clone(world),
            body,
            collider,
        })
    }

    /// Handle of the rigid body in the shared world
    pub fn body_handle(&self) -> RigidBodyHandle {
        self.body
    }

    /// Handle of the capsule collider
    pub fn collider_handle(&self) -> ColliderHandle {
        self.collider
    }
}

impl PhysicsBody for RapierBody {
    fn velocity(&self) -> Vec3 {
        self.world
            .lock()
            .get_rigid_body(self.body)
            .map(|rb| to_vec3(rb.linvel()))
            .unwrap_or(Vec3::ZERO)
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        if let Some(rb) = self.world.lock().get_rigid_body_mut(self.body) {
            rb.set_linvel(to_vector(velocity), true);
        }
    }

    fn add_force(&mut self, force: Vec3) {
        if let Some(rb) = self.world.lock().get_rigid_body_mut(self.body) {
            let mass = rb.mass();
            rb.add_force(to_vector(force * mass), true);
        }
    }

    fn position(&self) -> Vec3 {
        self.world
            .lock()
            .body_translation(self.body)
            .unwrap_or(Vec3::ZERO)
    }

    fn rotation(&self) -> Quat {
        self.world
            .lock()
            .get_rigid_body(self.body)
            .map(|rb| {
                let q = rb.rotation();
                Quat::from_xyzw(q.i, q.j, q.k, q.w)
            })
            .unwrap_or(Quat::IDENTITY)
    }

    fn set_rotation(&mut self, rotation: Quat) {
        if let Some(rb) = self.world.lock().get_rigid_body_mut(self.body) {
            let q = UnitQuaternion::from_quaternion(Quaternion::new(
                rotation.w, rotation.x, rotation.y, rotation.z,
            ));
            rb.set_rotation(q, true);
        }
    }

    fn gravity(&self) -> Vec3 {
        self.world.lock().config.gravity
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<GroundHit> {
        let world = self.world.lock();
        let filter = QueryFilter::default().exclude_rigid_body(self.body);
        world
            .raycast_detailed(origin, direction, max_distance, filter)
            .map(|hit| {
                let (tag, entity) = match hit.surface {
                    Some(surface) => (surface.tag, Some(surface.entity)),
                    None => (SurfaceTag::Untagged, None),
                };
                GroundHit {
                    normal: hit.normal,
                    tilt_degrees: hit.tilt_degrees,
                    tag,
                    entity,
                    distance: hit.distance,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared_world() -> SharedPhysics {
        Arc::new(Mutex::new(PhysicsWorld::new()))
    }

    #[test]
    fn test_capsule_defaults() {
        let capsule = CharacterCapsule::default();
        assert_eq!(capsule.height, 1.6);
        assert_eq!(capsule.radius, 0.3);
        assert!((capsule.half_segment() - 0.5).abs() < 1e-6);
        assert!(capsule.validate().is_ok());
    }

    #[test]
    fn test_flat_capsule_is_rejected() {
        let capsule = CharacterCapsule {
            height: 0.5,
            radius: 0.3,
            ..Default::default()
        };
        assert!(matches!(
            capsule.validate(),
            Err(PhysicsError::InvalidCapsule { .. })
        ));
    }

    #[test]
    fn test_spawned_body_round_trips_state() {
        let world = shared_world();
        let mut body = RapierBody::spawn(&world, Vec3::new(0.0, 2.0, 0.0), CharacterCapsule::default())
            .expect("default capsule is valid");

        body.set_velocity(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(body.velocity(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(body.position(), Vec3::new(0.0, 2.0, 0.0));

        let yaw = Quat::from_rotation_y(1.0);
        body.set_rotation(yaw);
        assert!(body.rotation().angle_between(yaw) < 1e-4);
    }

    #[test]
    fn test_probe_ignores_own_capsule() {
        let world = shared_world();
        world.lock().create_ground(0.0);
        let body = RapierBody::spawn(&world, Vec3::new(0.0, 0.05, 0.0), CharacterCapsule::default())
            .expect("default capsule is valid");
        world.lock().refresh_queries();

        // Probe starts inside the capsule; the capsule must not be the hit.
        let hit = body
            .raycast(Vec3::new(0.0, 0.15, 0.0), Vec3::NEG_Y, 0.3)
            .expect("ground is within reach");
        assert!((hit.normal - Vec3::Y).length() < 1e-4);
        assert!((hit.distance - 0.15).abs() < 1e-3);
    }
}
