//! Locomotion tuning values

use serde::{Deserialize, Serialize};
use strider_physics::CharacterCapsule;

use crate::error::ConfigError;

use super::DOUBLE_JUMP_DIVISOR;

/// Locomotion configuration, fixed once the controller is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Extra turn speed while moving forward (degrees per second per radian of heading error)
    pub moving_turn_speed: f32,
    /// Extra turn speed while standing still
    pub stationary_turn_speed: f32,
    /// Vertical velocity of a regular jump
    pub jump_power: f32,
    /// Effective gravity while airborne is `gravity * gravity_multiplier` (1 to 4)
    pub gravity_multiplier: f32,
    /// Offset into the run cycle used to pick the trailing leg in jumps
    pub run_cycle_leg_offset: f32,
    /// Scale applied to root-motion displacement
    pub move_speed_multiplier: f32,
    /// Animation playback speed while grounded and moving
    pub anim_speed_multiplier: f32,
    /// Ground probe length used while falling
    pub ground_check_distance: f32,
    /// Character capsule
    pub capsule: CharacterCapsule,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            moving_turn_speed: 360.0,
            stationary_turn_speed: 360.0,
            jump_power: 9.0,
            gravity_multiplier: 2.0,
            run_cycle_leg_offset: 0.2,
            move_speed_multiplier: 1.1,
            anim_speed_multiplier: 1.1,
            ground_check_distance: 0.1,
            capsule: CharacterCapsule::default(),
        }
    }
}

impl LocomotionConfig {
    /// Parse a configuration from TOML, filling missing fields with defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Vertical velocity of the mid-air jump
    pub fn double_jump_power(&self) -> f32 {
        self.jump_power / DOUBLE_JUMP_DIVISOR
    }

    /// Check ranges the controller relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1.0..=4.0).contains(&self.gravity_multiplier) {
            return Err(ConfigError::GravityMultiplierOutOfRange(
                self.gravity_multiplier,
            ));
        }
        if self.ground_check_distance <= 0.0 {
            return Err(ConfigError::NonPositiveGroundCheck(
                self.ground_check_distance,
            ));
        }

        let non_negative = [
            ("moving_turn_speed", self.moving_turn_speed),
            ("stationary_turn_speed", self.stationary_turn_speed),
            ("jump_power", self.jump_power),
            ("move_speed_multiplier", self.move_speed_multiplier),
            ("anim_speed_multiplier", self.anim_speed_multiplier),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        self.capsule.validate()?;
        Ok(())
    }
}
