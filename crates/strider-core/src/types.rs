//! Core types used throughout Strider

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for scene entities (characters, platforms, targets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position and rotation of a character or scene object.
///
/// Local space follows the character convention: +Z is forward, +X is right,
/// +Y is up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Get the forward direction (positive Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Convert a world-space direction into local space (ignores position)
    pub fn inverse_transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation.inverse() * direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_space_after_quarter_turn() {
        let transform = Transform::from_position_rotation(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );

        // Facing +X after a quarter turn, so world +X is local forward.
        let local = transform.inverse_transform_direction(Vec3::X);
        assert!((local - Vec3::Z).length() < 1e-5);
        assert!((transform.forward() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_position_is_ignored_by_directions() {
        let transform = Transform::from_position(Vec3::new(10.0, 0.0, -4.0));
        assert_eq!(transform.forward(), Vec3::Z);
        assert_eq!(transform.inverse_transform_direction(Vec3::Y), Vec3::Y);
    }
}
