//! Strider Game - Character locomotion and navigation
//!
//! Provides the third-person locomotion controller, its animator seam, and a
//! navigation driver that steers the controller towards a target.

pub mod error;
pub mod locomotion;
pub mod navigation;

pub use error::ConfigError;
pub use locomotion::{
    AnimationSink, AnimatorSnapshot, GroundState, LocomotionConfig, LocomotionController,
    ParameterAnimator,
};
pub use navigation::{
    DirectPlanner, NavTarget, NavigationConfig, NavigationDriver, PathPlanner, TargetLookup,
};
