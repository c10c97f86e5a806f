//! Third-person locomotion
//!
//! Turns a desired movement direction plus jump/crouch intent into rigid-body
//! velocity changes, classifies ground contact each tick, and keeps the
//! animator parameters in step with the resulting motion.

mod animator;
mod config;
mod controller;
mod ground;

#[cfg(test)]
pub(crate) mod testing;

pub use animator::{params, AnimationSink, AnimatorSnapshot, ParameterAnimator};
pub use config::LocomotionConfig;
pub use controller::LocomotionController;
pub use ground::{classify_ground, normalize_degrees, GroundState};

/// Surface tilt (degrees) above which the character slides
pub const SLIDE_ANGLE_LIMIT: f32 = 40.0;
/// Speed cap while sliding
pub const SLIDE_SPEED: f32 = 6.0;
/// Speed cap while airborne
pub const AIR_SPEED_CAP: f32 = 5.5;
/// Sliding falls this many times faster than the airborne speed cap
pub const SLIDE_FALL_FACTOR: f32 = 1.5;
/// Probe length while rising or right after a jump
pub const SHORT_PROBE_DISTANCE: f32 = 0.1;
/// Height above the body origin the ground probe starts from
pub const PROBE_ORIGIN_LIFT: f32 = 0.1;
/// Double jump power is the jump power divided by this
pub const DOUBLE_JUMP_DIVISOR: f32 = 1.5;
/// Damping applied to the Forward/Turn parameters (seconds)
pub const PARAM_DAMP_TIME: f32 = 0.1;
/// The run cycle's legs cross at normalized times 0.0 and 0.5
pub const RUN_CYCLE_HALF: f32 = 0.5;
