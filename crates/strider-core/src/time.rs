//! Simulation clock for Strider
//!
//! Turns raw frame deltas into clamped, scaled deltas and a fixed-step count
//! for the locomotion tick.

use serde::{Deserialize, Serialize};

/// Whether a frame delta is usable for integration.
///
/// Zero and negative deltas (frozen time scale, first frame, host glitches) mean
/// "do not integrate this tick".
pub fn can_integrate(delta: f32) -> bool {
    delta > 0.0
}

/// Errors that can occur when validating a time configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimeConfigError {
    #[error("fixed timestep must be positive, got {0}")]
    NonPositiveTimestep(f32),

    #[error("maximum delta time must be positive, got {0}")]
    NonPositiveMaxDelta(f32),

    #[error("time scale must not be negative, got {0}")]
    NegativeTimeScale(f32),
}

/// Configuration for game time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// How many simulated seconds pass per real second
    pub time_scale: f32,
    /// Fixed timestep for the locomotion/physics tick (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 60.0,
            max_delta_time: 0.25,
        }
    }
}

impl TimeConfig {
    /// Check that the clock can produce fixed steps with this configuration
    pub fn validate(&self) -> Result<(), TimeConfigError> {
        if self.fixed_timestep <= 0.0 {
            return Err(TimeConfigError::NonPositiveTimestep(self.fixed_timestep));
        }
        if self.max_delta_time <= 0.0 {
            return Err(TimeConfigError::NonPositiveMaxDelta(self.max_delta_time));
        }
        if self.time_scale < 0.0 {
            return Err(TimeConfigError::NegativeTimeScale(self.time_scale));
        }
        Ok(())
    }
}

/// Game time tracking
#[derive(Debug, Clone)]
pub struct GameTime {
    /// Configuration
    pub config: TimeConfig,
    /// Time since simulation start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped and scaled)
    pub delta_time: f32,
    /// Unscaled delta time
    pub unscaled_delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Accumulated time for fixed timestep
    fixed_accumulator: f32,
}

impl Default for GameTime {
    fn default() -> Self {
        Self {
            config: TimeConfig::default(),
            total_time: 0.0,
            delta_time: 0.0,
            unscaled_delta_time: 0.0,
            frame_count: 0,
            fixed_accumulator: 0.0,
        }
    }
}

impl GameTime {
    /// Create a new game time with custom config
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Update the game time with the raw delta from the previous frame.
    ///
    /// Negative raw deltas are treated as zero.
    pub fn update(&mut self, raw_delta: f32) {
        self.unscaled_delta_time = raw_delta.clamp(0.0, self.config.max_delta_time);
        self.frame_count += 1;

        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
        self.fixed_accumulator += self.delta_time;
    }

    /// Get the number of fixed timesteps to process this frame
    pub fn fixed_steps(&mut self) -> u32 {
        if !can_integrate(self.config.fixed_timestep) {
            return 0;
        }
        let mut steps = 0;
        while self.fixed_accumulator >= self.config.fixed_timestep {
            self.fixed_accumulator -= self.config.fixed_timestep;
            steps += 1;
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_time() {
        let mut time = GameTime::default();
        time.update(0.016);

        assert!(time.delta_time > 0.0);
        assert_eq!(time.frame_count, 1);

        // Deltas above the cap are clamped
        time.update(5.0);
        assert_eq!(time.unscaled_delta_time, time.config.max_delta_time);
    }

    #[test]
    fn test_negative_delta_does_not_integrate() {
        let mut time = GameTime::default();
        time.update(-0.5);
        assert_eq!(time.delta_time, 0.0);
        assert!(!can_integrate(time.delta_time));
        assert_eq!(time.fixed_steps(), 0);
    }

    #[test]
    fn test_fixed_steps_accumulate() {
        let mut time = GameTime::new(TimeConfig {
            fixed_timestep: 0.01,
            ..Default::default()
        });
        time.update(0.035);
        assert_eq!(time.fixed_steps(), 3);
        // The remainder carries over to the next frame
        time.update(0.01);
        assert_eq!(time.fixed_steps(), 1);
    }

    #[test]
    fn test_time_scale_stretches_delta() {
        let mut time = GameTime::new(TimeConfig {
            time_scale: 0.5,
            ..Default::default()
        });
        time.update(0.02);
        assert!((time.delta_time - 0.01).abs() < 1e-6);
        assert!((time.total_time - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_validate_rejects_zero_timestep() {
        let config = TimeConfig {
            fixed_timestep: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(TimeConfigError::NonPositiveTimestep(0.0))
        );
        assert!(TimeConfig::default().validate().is_ok());
    }
}
