//! Rigid-body locomotion with ground classification, slope sliding and double jump

use glam::{Quat, Vec3};
use strider_core::{can_integrate, EntityId};
use strider_physics::{ContactEvent, PhysicsBody};
use tracing::debug;

use crate::error::ConfigError;

use super::animator::{params, AnimationSink, AnimatorSnapshot};
use super::ground::{classify_ground, GroundState};
use super::{
    LocomotionConfig, AIR_SPEED_CAP, PROBE_ORIGIN_LIFT, RUN_CYCLE_HALF, SHORT_PROBE_DISTANCE,
    SLIDE_FALL_FACTOR, SLIDE_SPEED,
};

/// Drives a physics body and an animator from movement intent.
///
/// Call [`move_character`](Self::move_character) once per simulation tick,
/// then [`on_animator_move`](Self::on_animator_move) once the animation
/// system has computed the frame's root-motion displacement.
pub struct LocomotionController<B: PhysicsBody, A: AnimationSink> {
    config: LocomotionConfig,
    body: B,
    animator: A,
    state: GroundState,
    turn_amount: f32,
    forward_amount: f32,
    ground_normal: Vec3,
    can_double_jump: bool,
    ground_check_distance: f32,
    apply_root_motion: bool,
    current_speed: f32,
    crouching: bool,
    attached_platform: Option<EntityId>,
    snapshot: AnimatorSnapshot,
}

impl<B: PhysicsBody, A: AnimationSink> LocomotionController<B, A> {
    /// Create a controller for `body`, validating the configuration
    pub fn new(config: LocomotionConfig, body: B, animator: A) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            ground_check_distance: config.ground_check_distance,
            config,
            body,
            animator,
            state: GroundState::Airborne,
            turn_amount: 0.0,
            forward_amount: 0.0,
            ground_normal: Vec3::Y,
            can_double_jump: true,
            apply_root_motion: false,
            current_speed: 0.0,
            crouching: false,
            attached_platform: None,
            snapshot: AnimatorSnapshot::default(),
        })
    }

    /// Advance one tick with a world-space movement direction.
    ///
    /// Directions longer than 1 are normalized. A non-positive `dt` skips the
    /// extra turn rotation but still classifies ground and updates velocity.
    pub fn move_character(&mut self, direction: Vec3, crouch: bool, jump: bool, dt: f32) {
        let direction = if direction.length() > 1.0 {
            direction.normalize()
        } else {
            direction
        };

        let local = self.body.transform().inverse_transform_direction(direction);
        self.check_ground_status(local);

        let projected = project_on_plane(local, self.ground_normal);
        self.turn_amount = projected.x.atan2(projected.z);
        self.forward_amount = projected.z;

        self.apply_extra_turn_rotation(dt);

        self.current_speed = self.body.velocity().length();
        self.crouching = crouch;

        match self.state {
            GroundState::Grounded => self.handle_grounded_movement(crouch, jump),
            GroundState::Airborne | GroundState::Sliding => {
                self.handle_airborne_movement(jump, local)
            }
        }

        self.update_animator(projected, dt);
    }

    /// Root-motion override, called after the animator computed `delta_position`.
    ///
    /// While grounded the horizontal velocity follows the animation; vertical
    /// velocity stays with physics.
    pub fn on_animator_move(&mut self, delta_position: Vec3, dt: f32) {
        if !self.state.is_grounded() || !can_integrate(dt) {
            return;
        }

        let mut velocity = (delta_position * self.config.move_speed_multiplier) / dt;
        velocity.y = self.body.velocity().y;
        self.body.set_velocity(velocity);
    }

    /// Contact began; moving platforms carry the character from now on
    pub fn on_collision_enter(&mut self, contact: &ContactEvent) {
        if contact.tag.is_moving_platform() {
            debug!("Attached to moving platform {}", contact.entity);
            self.attached_platform = Some(contact.entity);
        }
    }

    /// Contact ended; leaving any moving platform detaches the character
    pub fn on_collision_exit(&mut self, contact: &ContactEvent) {
        if contact.tag.is_moving_platform() {
            debug!("Detached from moving platform {}", contact.entity);
            self.attached_platform = None;
        }
    }

    fn check_ground_status(&mut self, local_move: Vec3) {
        let origin = self.body.position() + Vec3::Y * PROBE_ORIGIN_LIFT;
        let hit = self
            .body
            .raycast(origin, Vec3::NEG_Y, self.ground_check_distance);
        let next = classify_ground(hit.as_ref());

        if next != self.state {
            debug!("Ground state {:?} -> {:?}", self.state, next);
        }

        match (next, hit) {
            (GroundState::Grounded, Some(hit)) => {
                self.apply_root_motion = true;
                self.ground_normal = hit.normal;
                self.can_double_jump = true;
                self.state = GroundState::Grounded;
            }
            (GroundState::Sliding, Some(_)) => self.slide(local_move),
            _ => {
                self.state = GroundState::Airborne;
                self.ground_normal = Vec3::Y;
                self.apply_root_motion = false;
            }
        }
    }

    fn slide(&mut self, local_move: Vec3) {
        if self.body.velocity().length() > SLIDE_SPEED {
            self.body.set_velocity(Vec3::new(
                local_move.x * SLIDE_SPEED,
                -SLIDE_SPEED,
                local_move.z * SLIDE_SPEED,
            ));
        } else {
            self.handle_airborne_movement(false, local_move);
        }

        self.state = GroundState::Sliding;
        self.can_double_jump = false;
        self.apply_root_motion = false;
    }

    fn apply_extra_turn_rotation(&mut self, dt: f32) {
        if !can_integrate(dt) {
            return;
        }

        // Blend factor is clamped to [0, 1]
        let blend = self.forward_amount.clamp(0.0, 1.0);
        let turn_speed = self.config.stationary_turn_speed
            + (self.config.moving_turn_speed - self.config.stationary_turn_speed) * blend;
        let degrees = self.turn_amount * turn_speed * dt;

        let rotation = self.body.rotation() * Quat::from_rotation_y(degrees.to_radians());
        self.body.set_rotation(rotation.normalize());
    }

    fn handle_grounded_movement(&mut self, _crouch: bool, jump: bool) {
        if jump && self.animator.is_in_state(params::STATE_GROUNDED) {
            let velocity = self.body.velocity();
            self.body
                .set_velocity(Vec3::new(velocity.x, self.config.jump_power, velocity.z));
            self.state = GroundState::Airborne;
            self.apply_root_motion = false;
            self.ground_check_distance = SHORT_PROBE_DISTANCE;
            debug!("Jump with power {}", self.config.jump_power);
        }
    }

    fn handle_airborne_movement(&mut self, jump: bool, local_move: Vec3) {
        let gravity = self.body.gravity();
        self.body
            .add_force(gravity * self.config.gravity_multiplier - gravity);

        let velocity = self.body.velocity();
        self.ground_check_distance = if velocity.y < 0.0 {
            self.config.ground_check_distance
        } else {
            SHORT_PROBE_DISTANCE
        };

        let vertical = if self.state.is_sliding() {
            -SLIDE_FALL_FACTOR * AIR_SPEED_CAP
        } else {
            velocity.y
        };

        let horizontal_speed = if velocity.length() > AIR_SPEED_CAP {
            AIR_SPEED_CAP
        } else {
            self.current_speed
        };
        self.body.set_velocity(Vec3::new(
            local_move.x * horizontal_speed,
            vertical,
            local_move.z * horizontal_speed,
        ));

        if jump && self.can_double_jump {
            let velocity = self.body.velocity();
            let power = self.config.double_jump_power();
            self.body.set_velocity(Vec3::new(velocity.x, power, velocity.z));
            self.apply_root_motion = false;
            self.ground_check_distance = SHORT_PROBE_DISTANCE;
            self.can_double_jump = false;
            debug!("Double jump with power {}", power);
        }
    }

    fn update_animator(&mut self, projected: Vec3, dt: f32) {
        let on_ground = self.state.is_grounded();

        let run_cycle =
            (self.animator.normalized_time() + self.config.run_cycle_leg_offset).rem_euclid(1.0);
        let leg = if run_cycle < RUN_CYCLE_HALF { 1.0 } else { -1.0 };

        let speed = if on_ground && projected.length() > 0.0 {
            self.config.anim_speed_multiplier
        } else {
            1.0
        };

        let snapshot = AnimatorSnapshot {
            forward: self.forward_amount,
            turn: self.turn_amount,
            crouch: self.crouching,
            on_ground,
            jump: (!on_ground).then(|| self.body.velocity().y),
            jump_leg: on_ground.then_some(leg * self.forward_amount),
            speed,
        };
        snapshot.apply(&mut self.animator, dt);
        self.snapshot = snapshot;
    }

    /// Configuration the controller was built with
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// The driven physics body
    pub fn body(&self) -> &B {
        &self.body
    }

    /// Mutable access to the driven physics body
    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    /// The animation sink receiving parameters
    pub fn animator(&self) -> &A {
        &self.animator
    }

    /// Mutable access to the animation sink
    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }

    /// Ground state from the last ground check
    pub fn ground_state(&self) -> GroundState {
        self.state
    }

    /// Whether the last ground check found walkable ground
    pub fn is_grounded(&self) -> bool {
        self.state.is_grounded()
    }

    /// Whether the character is on a surface steeper than the slide limit
    pub fn is_sliding(&self) -> bool {
        self.state.is_sliding()
    }

    /// Whether a mid-air jump is still available
    pub fn can_double_jump(&self) -> bool {
        self.can_double_jump
    }

    /// Heading error in radians from the last move
    pub fn turn_amount(&self) -> f32 {
        self.turn_amount
    }

    /// Forward component of the last local-space move
    pub fn forward_amount(&self) -> f32 {
        self.forward_amount
    }

    /// Normal of the ground under the character, up when airborne
    pub fn ground_normal(&self) -> Vec3 {
        self.ground_normal
    }

    /// Probe length the next ground check will use
    pub fn ground_check_distance(&self) -> f32 {
        self.ground_check_distance
    }

    /// Whether the animator should apply root motion this frame
    pub fn apply_root_motion(&self) -> bool {
        self.apply_root_motion
    }

    /// Platform the character currently rides, resolved by the scene
    pub fn attached_platform(&self) -> Option<EntityId> {
        self.attached_platform
    }

    /// Animation parameters emitted by the last tick
    pub fn snapshot(&self) -> &AnimatorSnapshot {
        &self.snapshot
    }
}

/// Remove the component of `vector` along `normal`
fn project_on_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    let length_squared = normal.length_squared();
    if length_squared < f32::EPSILON {
        return vector;
    }
    vector - normal * (vector.dot(normal) / length_squared)
}
