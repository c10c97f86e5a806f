//! Headless demo scene
//!
//! A character walks a waypoint route across a ground plane next to a steep
//! ramp, then chases a platform that slides back and forth and rides it.

use std::collections::HashMap;
use std::f32::consts::TAU;
use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec3;
use parking_lot::Mutex;
use rapier3d::prelude::RigidBodyHandle;
use strider_core::EntityId;
use strider_game::locomotion::params;
use strider_game::{
    DirectPlanner, GroundState, LocomotionController, NavTarget, NavigationDriver,
    ParameterAnimator,
};
use strider_physics::{
    ContactPhase, ContactTracker, PhysicsBody, PhysicsConfig, PhysicsWorld, RapierBody,
    SharedPhysics, SurfaceTag,
};
use tracing::info;

use crate::settings::SimSettings;

/// Kinematic platform oscillating along X
struct Platform {
    entity: EntityId,
    body: RigidBodyHandle,
    origin: Vec3,
    amplitude: f32,
    period: f32,
    elapsed: f32,
    position: Vec3,
}

impl Platform {
    /// Advance the platform's path and return its displacement
    fn advance(&mut self, dt: f32) -> Vec3 {
        self.elapsed += dt;
        let phase = if self.period > 0.0 {
            (self.elapsed / self.period) * TAU
        } else {
            0.0
        };
        let next = self.origin + Vec3::X * self.amplitude * phase.sin();
        let delta = next - self.position;
        self.position = next;
        delta
    }
}

/// The demo scene and everything ticking inside it
pub struct Simulation {
    world: SharedPhysics,
    controller: LocomotionController<RapierBody, ParameterAnimator>,
    driver: NavigationDriver<DirectPlanner>,
    contacts: ContactTracker,
    platform: Platform,
    landmarks: HashMap<EntityId, Vec3>,
    route: Vec<Vec3>,
    next_waypoint: usize,
    follow_platform: bool,
    root_motion_speed: f32,
    last_state: GroundState,
    last_platform: Option<EntityId>,
}

impl Simulation {
    /// Build the scene and spawn the character
    pub fn new(settings: &SimSettings) -> Result<Self> {
        let scene = &settings.scene;
        let mut world = PhysicsWorld::with_config(PhysicsConfig {
            timestep: settings.time.fixed_timestep,
            ..Default::default()
        });

        let ground = world.create_ground(0.0);
        world.tag_collider(ground, EntityId::new(), SurfaceTag::from("Ground"));

        let slope = world.create_slope(
            Vec3::new(2.0, 0.25, 4.0),
            scene.slope_position,
            scene.slope_tilt,
        );
        world.tag_collider(slope, EntityId::new(), SurfaceTag::from("Ramp"));

        let (platform_body, platform_collider) =
            world.create_moving_platform(Vec3::new(2.0, 0.05, 2.0), scene.platform_origin);
        let platform_entity = EntityId::new();
        world.tag_collider(platform_collider, platform_entity, SurfaceTag::MovingPlatform);
        world.refresh_queries();

        let world: SharedPhysics = Arc::new(Mutex::new(world));
        let body = RapierBody::spawn(&world, scene.spawn, settings.locomotion.capsule)
            .context("Failed to spawn character body")?;
        let controller = LocomotionController::new(
            settings.locomotion.clone(),
            body,
            ParameterAnimator::default(),
        )
        .context("Invalid locomotion configuration")?;

        let driver = NavigationDriver::new(DirectPlanner::new(settings.navigation.clone()));

        info!(
            "Scene ready: {} waypoints, ramp at {:.0} degrees",
            scene.waypoints.len(),
            scene.slope_tilt
        );

        let mut sim = Self {
            world,
            controller,
            driver,
            contacts: ContactTracker::new(),
            platform: Platform {
                entity: platform_entity,
                body: platform_body,
                origin: scene.platform_origin,
                amplitude: scene.platform_amplitude,
                period: scene.platform_period,
                elapsed: 0.0,
                position: scene.platform_origin,
            },
            landmarks: HashMap::from([(platform_entity, scene.platform_origin)]),
            route: scene.waypoints.clone(),
            next_waypoint: 0,
            follow_platform: scene.follow_platform,
            root_motion_speed: scene.root_motion_speed,
            last_state: GroundState::Airborne,
            last_platform: None,
        };
        sim.retarget();
        Ok(sim)
    }

    /// Point the driver at the next waypoint, or at the platform once done
    fn retarget(&mut self) {
        let target = match self.route.get(self.next_waypoint) {
            Some(point) => Some(NavTarget::Point(*point)),
            None if self.follow_platform => Some(NavTarget::Entity(self.platform.entity)),
            None => None,
        };
        self.driver.set_target(target);
    }

    /// Run one fixed tick
    pub fn tick(&mut self, dt: f32) {
        // Movement phase
        self.driver.update(&mut self.controller, &self.landmarks, dt);
        if self.driver.has_arrived() && self.next_waypoint < self.route.len() {
            info!("Reached waypoint {}", self.next_waypoint);
            self.next_waypoint += 1;
            self.retarget();
        }

        self.root_motion_phase(dt);

        // Platform, carrying the rider along
        let displacement = self.platform.advance(dt);
        self.landmarks.insert(self.platform.entity, self.platform.position);
        {
            let mut world = self.world.lock();
            world.move_kinematic(self.platform.body, self.platform.position);
            if self.controller.attached_platform() == Some(self.platform.entity) {
                world.translate_body(self.controller.body().body_handle(), displacement);
            }
            world.step();
        }

        self.dispatch_contacts();
        self.log_transitions();
    }

    /// Advance the animator and hand its displacement to the controller,
    /// unless the last move turned root motion off
    fn root_motion_phase(&mut self, dt: f32) {
        let animator = self.controller.animator_mut();
        animator.advance(dt);
        if !self.controller.apply_root_motion() {
            return;
        }

        let forward = self
            .controller
            .animator()
            .float(params::FORWARD)
            .unwrap_or(0.0);
        let heading = self.controller.body().transform().forward();
        let delta = heading * forward * self.root_motion_speed * dt;
        self.controller.on_animator_move(delta, dt);
    }

    fn dispatch_contacts(&mut self) {
        let collider = self.controller.body().collider_handle();
        let events = {
            let world = self.world.lock();
            self.contacts.update(&world, collider)
        };

        for (phase, contact) in events {
            match phase {
                ContactPhase::Began => self.controller.on_collision_enter(&contact),
                ContactPhase::Ended => self.controller.on_collision_exit(&contact),
            }
        }
    }

    fn log_transitions(&mut self) {
        let state = self.controller.ground_state();
        if state != self.last_state {
            info!(
                "Ground state {:?} -> {:?} at {:.2?}",
                self.last_state,
                state,
                self.position()
            );
            self.last_state = state;
        }

        let platform = self.controller.attached_platform();
        if platform != self.last_platform {
            match platform {
                Some(entity) => info!("Riding platform {}", entity),
                None => info!("Left platform"),
            }
            self.last_platform = platform;
        }
    }

    /// World position of the character
    pub fn position(&self) -> Vec3 {
        self.world
            .lock()
            .body_translation(self.controller.body().body_handle())
            .unwrap_or(Vec3::ZERO)
    }

    /// The character's locomotion controller
    pub fn controller(&self) -> &LocomotionController<RapierBody, ParameterAnimator> {
        &self.controller
    }

    /// Number of route waypoints reached so far
    pub fn waypoints_reached(&self) -> usize {
        self.next_waypoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn run(sim: &mut Simulation, seconds: f32) {
        let steps = (seconds / DT) as usize;
        for _ in 0..steps {
            sim.tick(DT);
        }
    }

    #[test]
    fn test_character_lands_on_ground() {
        let mut sim = Simulation::new(&SimSettings::default()).unwrap();
        let mut landed = false;
        for _ in 0..60 {
            sim.tick(DT);
            landed |= sim.controller().is_grounded();
        }

        assert!(landed);
        assert!(sim.position().y.abs() < 0.2);
    }

    #[test]
    fn test_character_walks_towards_first_waypoint() {
        let mut sim = Simulation::new(&SimSettings::default()).unwrap();
        let start = sim.position();
        run(&mut sim, 2.0);

        assert!(sim.position().z > start.z + 0.5);
    }

    #[test]
    fn test_root_motion_skipped_while_airborne() {
        let mut sim = Simulation::new(&SimSettings::default()).unwrap();
        assert!(!sim.controller().apply_root_motion());

        let velocity = Vec3::new(2.0, -1.0, 0.0);
        sim.controller.body_mut().set_velocity(velocity);
        sim.root_motion_phase(DT);

        assert!((sim.controller().body().velocity() - velocity).length() < 1e-5);
    }

    #[test]
    fn test_root_motion_drives_grounded_character() {
        let mut sim = Simulation::new(&SimSettings::default()).unwrap();
        let mut ticks = 0;
        while !(sim.controller().apply_root_motion()
            && sim.controller().animator().float(params::FORWARD).unwrap_or(0.0) > 0.1)
        {
            sim.tick(DT);
            ticks += 1;
            assert!(ticks < 600, "character never started walking on the ground");
        }

        sim.controller.body_mut().set_velocity(Vec3::ZERO);
        sim.root_motion_phase(DT);

        let velocity = sim.controller().body().velocity();
        assert!(Vec3::new(velocity.x, 0.0, velocity.z).length() > 0.1);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn test_character_rides_platform() {
        let mut sim = Simulation::new(&SimSettings::default()).unwrap();
        let platform = sim.platform.entity;

        let mut attached_ticks = 0;
        for _ in 0..(20.0 / DT) as usize {
            sim.tick(DT);
            if let Some(entity) = sim.controller().attached_platform() {
                assert_eq!(entity, platform);
                attached_ticks += 1;
            }
        }

        assert_eq!(sim.waypoints_reached(), 2);
        assert!(attached_ticks > 0);
    }

    #[test]
    fn test_platform_moves_along_its_path() {
        let mut platform = Platform {
            entity: EntityId::new(),
            body: RigidBodyHandle::invalid(),
            origin: Vec3::ZERO,
            amplitude: 2.0,
            period: 4.0,
            elapsed: 0.0,
            position: Vec3::ZERO,
        };

        let delta = platform.advance(1.0);
        assert!((delta - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-4);
        let delta = platform.advance(1.0);
        assert!((delta - Vec3::new(-2.0, 0.0, 0.0)).length() < 1e-4);
    }
}
