//! Strider Physics - Physics simulation using rapier3d
//!
//! Provides the simulated world, surface tagging, contact tracking, and the
//! `PhysicsBody` seam the locomotion controller drives.

mod body;
mod error;
mod surface;

pub use body::{CharacterCapsule, GroundHit, PhysicsBody, RapierBody, SharedPhysics};
pub use error::PhysicsError;
pub use surface::{ContactEvent, ContactPhase, ContactTracker, SurfaceInfo, SurfaceTag};

use std::collections::HashMap;

use glam::Vec3;
use nalgebra::Unit;
use rapier3d::prelude::*;
use strider_core::EntityId;

/// Physics world configuration
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 on Y axis)
    pub gravity: Vec3,
    /// Physics timestep (default: 1/60)
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 60.0,
        }
    }
}

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    pub config: PhysicsConfig,

    /// Rigid body storage
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    /// Impulse joint storage
    pub impulse_joint_set: ImpulseJointSet,
    /// Multi-body joint storage
    pub multibody_joint_set: MultibodyJointSet,

    /// Integration parameters
    integration_parameters: IntegrationParameters,
    /// Physics pipeline
    physics_pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,
    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,
    /// Continuous collision detection solver
    ccd_solver: CCDSolver,
    /// Query pipeline for raycasts
    query_pipeline: QueryPipeline,
    /// Entity and tag of every registered collider
    surfaces: HashMap<ColliderHandle, SurfaceInfo>,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.timestep;

        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            surfaces: HashMap::new(),
        }
    }

    /// Step the physics simulation
    pub fn step(&mut self) {
        let gravity = to_vector(self.config.gravity);

        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        // User forces apply for a single step
        for (_, body) in self.rigid_body_set.iter_mut() {
            body.reset_forces(false);
        }

        // Update query pipeline after physics step
        self.query_pipeline.update(&self.collider_set);
    }

    /// Refresh the query pipeline without stepping (after spawning colliders)
    pub fn refresh_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a static collider (ground, walls, slopes)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        self.collider_set.insert(collider)
    }

    /// Add a dynamic rigid body with a collider
    pub fn add_dynamic_body(
        &mut self,
        rigid_body: RigidBody,
        collider: Collider,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let rb_handle = self.rigid_body_set.insert(rigid_body);
        let col_handle =
            self.collider_set
                .insert_with_parent(collider, rb_handle, &mut self.rigid_body_set);
        (rb_handle, col_handle)
    }

    /// Add a kinematic rigid body with a collider
    pub fn add_kinematic_body(
        &mut self,
        rigid_body: RigidBody,
        collider: Collider,
    ) -> (RigidBodyHandle, ColliderHandle) {
        self.add_dynamic_body(rigid_body, collider)
    }

    /// Get a rigid body by handle
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a mutable rigid body by handle
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Register the owning entity and category of a collider
    pub fn tag_collider(&mut self, handle: ColliderHandle, entity: EntityId, tag: SurfaceTag) {
        self.surfaces.insert(handle, SurfaceInfo { entity, tag });
    }

    /// Entity and tag of a collider, if registered
    pub fn surface(&self, handle: ColliderHandle) -> Option<&SurfaceInfo> {
        self.surfaces.get(&handle)
    }

    /// Colliders currently in active contact with `collider`
    pub fn touching_colliders(&self, collider: ColliderHandle) -> Vec<ColliderHandle> {
        self.narrow_phase
            .contact_pairs_with(collider)
            .filter(|pair| pair.has_any_active_contact)
            .map(|pair| {
                if pair.collider1 == collider {
                    pair.collider2
                } else {
                    pair.collider1
                }
            })
            .collect()
    }

    /// Tilt of a collider about its lateral (X) axis, in degrees.
    ///
    /// This is the raw Euler angle of the collider's orientation; callers
    /// normalize it into (-180, 180].
    pub fn collider_tilt_degrees(&self, handle: ColliderHandle) -> f32 {
        self.collider_set
            .get(handle)
            .map(|collider| {
                let (roll, _pitch, _yaw) = collider.position().rotation.euler_angles();
                roll.to_degrees()
            })
            .unwrap_or(0.0)
    }

    /// Cast a ray and get detailed hit information
    pub fn raycast_detailed(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: QueryFilter,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(to_point(origin), to_vector(direction));

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(handle, intersection)| RaycastHit {
                collider: handle,
                distance: intersection.time_of_impact,
                point: origin + direction * intersection.time_of_impact,
                normal: to_vec3(&intersection.normal),
                tilt_degrees: self.collider_tilt_degrees(handle),
                surface: self.surfaces.get(&handle).cloned(),
            })
    }

    /// Create a ground plane collider
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .friction(0.7)
            .restitution(0.0)
            .build();
        self.add_static_collider(ground)
    }

    /// Create a static box tilted about the X axis by `tilt_degrees` (a ramp)
    pub fn create_slope(
        &mut self,
        half_extents: Vec3,
        position: Vec3,
        tilt_degrees: f32,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(to_vector(position))
            .rotation(vector![tilt_degrees.to_radians(), 0.0, 0.0])
            .friction(0.7)
            .build();
        self.add_static_collider(collider)
    }

    /// Create a kinematic box that can be moved each step (a moving platform)
    pub fn create_moving_platform(
        &mut self,
        half_extents: Vec3,
        position: Vec3,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body = RigidBodyBuilder::kinematic_position_based()
            .translation(to_vector(position))
            .build();
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .friction(0.7)
            .build();
        self.add_kinematic_body(body, collider)
    }

    /// Schedule a kinematic body's translation for the next step
    pub fn move_kinematic(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_next_kinematic_translation(to_vector(position));
        }
    }

    /// Teleport a body by an offset (used to carry riders with platforms)
    pub fn translate_body(&mut self, handle: RigidBodyHandle, offset: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            let next = to_vec3(body.translation()) + offset;
            body.set_translation(to_vector(next), true);
        }
    }

    /// World translation of a body
    pub fn body_translation(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set
            .get(handle)
            .map(|body| to_vec3(body.translation()))
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Detailed raycast hit information
#[derive(Debug, Clone)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
    /// Raw tilt of the hit collider about its X axis, in degrees
    pub tilt_degrees: f32,
    /// Entity and tag of the hit collider, if registered
    pub surface: Option<SurfaceInfo>,
}

pub(crate) fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

pub(crate) fn to_point(v: Vec3) -> Point<Real> {
    point![v.x, v.y, v.z]
}

pub(crate) fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physics_world_creation() {
        let world = PhysicsWorld::new();
        assert_eq!(world.config.gravity, Vec3::new(0.0, -9.81, 0.0));
    }

    #[test]
    fn test_ray_hits_ground_plane() {
        let mut world = PhysicsWorld::new();
        let ground = world.create_ground(0.0);
        world.refresh_queries();

        let hit = world
            .raycast_detailed(
                Vec3::new(0.0, 10.0, 0.0),
                Vec3::new(0.0, -1.0, 0.0),
                100.0,
                QueryFilter::default(),
            )
            .expect("ray should hit the ground");
        assert_eq!(hit.collider, ground);
        assert!((hit.distance - 10.0).abs() < 1e-4);
        assert!((hit.normal - Vec3::Y).length() < 1e-4);
        assert!(hit.surface.is_none());
    }

    #[test]
    fn test_raycast_reports_surface_tag_and_tilt() {
        let mut world = PhysicsWorld::new();
        let entity = EntityId::new();
        let slope = world.create_slope(Vec3::new(2.0, 0.1, 2.0), Vec3::ZERO, 30.0);
        world.tag_collider(slope, entity, SurfaceTag::from("Ramp"));
        world.refresh_queries();

        let hit = world
            .raycast_detailed(
                Vec3::new(0.0, 5.0, 0.0),
                Vec3::new(0.0, -1.0, 0.0),
                10.0,
                QueryFilter::default(),
            )
            .expect("ray should hit the ramp");

        assert!((hit.tilt_degrees - 30.0).abs() < 0.01);
        let surface = hit.surface.expect("ramp is tagged");
        assert_eq!(surface.entity, entity);
        assert_eq!(surface.tag, SurfaceTag::Named("Ramp".to_string()));
    }

    #[test]
    fn test_short_ray_misses_distant_ground() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        world.refresh_queries();

        let hit = world.raycast_detailed(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            0.1,
            QueryFilter::default(),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_moving_platform_translation() {
        let mut world = PhysicsWorld::new();
        let (body, _collider) =
            world.create_moving_platform(Vec3::new(1.0, 0.1, 1.0), Vec3::new(0.0, 1.0, 0.0));
        world.move_kinematic(body, Vec3::new(0.5, 1.0, 0.0));
        world.step();

        let position = world.body_translation(body).expect("platform exists");
        assert!((position.x - 0.5).abs() < 1e-4);
    }
}
