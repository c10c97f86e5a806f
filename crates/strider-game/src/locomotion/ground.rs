//! Ground classification from a single downward probe

use strider_physics::GroundHit;

use super::SLIDE_ANGLE_LIMIT;

/// Contact state of the character, recomputed every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroundState {
    /// Standing on walkable ground; root motion drives horizontal movement
    Grounded,
    /// No ground within the probe
    #[default]
    Airborne,
    /// On a surface too steep to stand on; moves like airborne with a forced fall
    Sliding,
}

impl GroundState {
    /// Standing on walkable ground
    pub fn is_grounded(self) -> bool {
        matches!(self, GroundState::Grounded)
    }

    /// On a surface steeper than the slide limit
    pub fn is_sliding(self) -> bool {
        matches!(self, GroundState::Sliding)
    }
}

/// Wrap an angle in degrees into (-180, 180]
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Next ground state for a probe result.
///
/// A tilt strictly greater than the slide limit (in either direction) slides.
pub fn classify_ground(hit: Option<&GroundHit>) -> GroundState {
    match hit {
        None => GroundState::Airborne,
        Some(hit) if normalize_degrees(hit.tilt_degrees).abs() > SLIDE_ANGLE_LIMIT => {
            GroundState::Sliding
        }
        Some(_) => GroundState::Grounded,
    }
}
