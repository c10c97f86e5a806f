//! Path planner seam and a straight-line planner

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Path-planning service consumed by the navigation driver
pub trait PathPlanner {
    /// Request a path to `position`
    fn set_destination(&mut self, position: Vec3);

    /// Distance left along the current path
    fn remaining_distance(&self) -> f32;

    /// Velocity the agent should move with to follow the path
    fn desired_velocity(&self) -> Vec3;

    fn stopping_distance(&self) -> f32;

    fn set_stopping_distance(&mut self, distance: f32);

    /// Keep the planner's agent at the character's position
    fn sync_agent_position(&mut self, _position: Vec3) {}
}

/// Planner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Agent speed used for the desired velocity
    pub speed: f32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self { speed: 3.5 }
    }
}

/// Walks straight at the destination across the horizontal plane
#[derive(Debug, Clone)]
pub struct DirectPlanner {
    config: NavigationConfig,
    stopping_distance: f32,
    agent_position: Vec3,
    destination: Option<Vec3>,
}

impl DirectPlanner {
    /// A planner with no destination yet
    pub fn new(config: NavigationConfig) -> Self {
        Self {
            config,
            stopping_distance: 0.0,
            agent_position: Vec3::ZERO,
            destination: None,
        }
    }

    /// Last requested destination
    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    fn horizontal_offset(&self) -> Option<Vec3> {
        self.destination.map(|destination| {
            let offset = destination - self.agent_position;
            Vec3::new(offset.x, 0.0, offset.z)
        })
    }
}

impl Default for DirectPlanner {
    fn default() -> Self {
        Self::new(NavigationConfig::default())
    }
}

impl PathPlanner for DirectPlanner {
    fn set_destination(&mut self, position: Vec3) {
        self.destination = Some(position);
    }

    fn remaining_distance(&self) -> f32 {
        self.horizontal_offset()
            .map(|offset| offset.length())
            .unwrap_or(0.0)
    }

    fn desired_velocity(&self) -> Vec3 {
        self.horizontal_offset()
            .and_then(|offset| offset.try_normalize())
            .map(|direction| direction * self.config.speed)
            .unwrap_or(Vec3::ZERO)
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn set_stopping_distance(&mut self, distance: f32) {
        self.stopping_distance = distance;
    }

    fn sync_agent_position(&mut self, position: Vec3) {
        self.agent_position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_destination_means_nothing_remaining() {
        let planner = DirectPlanner::default();
        assert_eq!(planner.remaining_distance(), 0.0);
        assert_eq!(planner.desired_velocity(), Vec3::ZERO);
    }

    #[test]
    fn test_distance_and_velocity_are_horizontal() {
        let mut planner = DirectPlanner::new(NavigationConfig { speed: 2.0 });
        planner.sync_agent_position(Vec3::new(0.0, 1.0, 0.0));
        planner.set_destination(Vec3::new(3.0, 10.0, 4.0));

        assert!((planner.remaining_distance() - 5.0).abs() < 1e-5);
        let velocity = planner.desired_velocity();
        assert!((velocity - Vec3::new(1.2, 0.0, 1.6)).length() < 1e-5);
    }

    #[test]
    fn test_at_destination_has_no_velocity() {
        let mut planner = DirectPlanner::default();
        planner.sync_agent_position(Vec3::new(1.0, 0.0, 1.0));
        planner.set_destination(Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(planner.desired_velocity(), Vec3::ZERO);
    }
}
