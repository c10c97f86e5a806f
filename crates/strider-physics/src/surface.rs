//! Surface categories and contact begin/end tracking

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rapier3d::prelude::ColliderHandle;
use serde::{Deserialize, Serialize};
use strider_core::EntityId;

/// Category tag attached to a collider.
///
/// The locomotion layer only cares about `MovingPlatform`; other names are
/// carried through so hosts can use them for their own purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SurfaceTag {
    #[default]
    Untagged,
    MovingPlatform,
    Named(String),
}

impl SurfaceTag {
    /// Whether this surface carries riders
    pub fn is_moving_platform(&self) -> bool {
        matches!(self, SurfaceTag::MovingPlatform)
    }
}

impl From<&str> for SurfaceTag {
    fn from(s: &str) -> Self {
        match s {
            "" | "Untagged" => SurfaceTag::Untagged,
            "MovingPlatform" => SurfaceTag::MovingPlatform,
            other => SurfaceTag::Named(other.to_string()),
        }
    }
}

impl FromStr for SurfaceTag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SurfaceTag::from(s))
    }
}

impl fmt::Display for SurfaceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceTag::Untagged => write!(f, "Untagged"),
            SurfaceTag::MovingPlatform => write!(f, "MovingPlatform"),
            SurfaceTag::Named(name) => write!(f, "{}", name),
        }
    }
}

/// Scene identity of a collider
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceInfo {
    /// Entity that owns the collider
    pub entity: EntityId,
    /// Category tag
    pub tag: SurfaceTag,
}

/// A contact notification delivered to the character
#[derive(Debug, Clone, PartialEq)]
pub struct ContactEvent {
    /// The other entity in the contact
    pub entity: EntityId,
    /// The other entity's category
    pub tag: SurfaceTag,
}

/// Whether a contact started or stopped this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Began,
    Ended,
}

/// Turns per-step "currently touching" sets into begin/end events.
#[derive(Debug, Default)]
pub struct ContactTracker {
    touching: HashSet<ColliderHandle>,
}

impl ContactTracker {
    /// A tracker that has seen no contacts yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare the colliders touching `collider` now against the previous step.
    ///
    /// Colliders without surface info are ignored.
    pub fn update(
        &mut self,
        world: &crate::PhysicsWorld,
        collider: ColliderHandle,
    ) -> Vec<(ContactPhase, ContactEvent)> {
        let now: HashSet<ColliderHandle> = world.touching_colliders(collider).into_iter().collect();
        let mut events = Vec::new();

        for began in now.difference(&self.touching) {
            if let Some(info) = world.surface(*began) {
                events.push((ContactPhase::Began, to_event(info)));
            }
        }
        for ended in self.touching.difference(&now) {
            if let Some(info) = world.surface(*ended) {
                events.push((ContactPhase::Ended, to_event(info)));
            }
        }

        self.touching = now;
        events
    }
}

fn to_event(info: &SurfaceInfo) -> ContactEvent {
    ContactEvent {
        entity: info.entity,
        tag: info.tag.clone(),
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rapier3d::prelude::{vector, ColliderBuilder, RigidBodyBuilder, RigidBodyHandle};

    use super::*;
    use crate::PhysicsWorld;

    /// Ground tagged as `tag`, with an upright capsule body hovering above it
    fn capsule_over_ground(
        tag: SurfaceTag,
    ) -> (PhysicsWorld, EntityId, RigidBodyHandle, ColliderHandle) {
        let mut world = PhysicsWorld::new();
        let ground_entity = EntityId::new();
        let ground = world.create_ground(0.0);
        world.tag_collider(ground, ground_entity, tag);

        let body = RigidBodyBuilder::dynamic()
            .translation(vector![0.0, 1.0, 0.0])
            .lock_rotations()
            .build();
        let collider = ColliderBuilder::capsule_y(0.5, 0.3).restitution(0.0).build();
        let (body, collider) = world.add_dynamic_body(body, collider);
        (world, ground_entity, body, collider)
    }

    fn step_and_collect(
        world: &mut PhysicsWorld,
        tracker: &mut ContactTracker,
        collider: ColliderHandle,
        steps: usize,
    ) -> Vec<(ContactPhase, ContactEvent)> {
        let mut events = Vec::new();
        for _ in 0..steps {
            world.step();
            events.extend(tracker.update(world, collider));
        }
        events
    }

    #[test]
    fn test_landing_and_leaving_emit_one_event_each() {
        let (mut world, ground_entity, body, collider) =
            capsule_over_ground(SurfaceTag::MovingPlatform);
        let mut tracker = ContactTracker::new();

        let landed = step_and_collect(&mut world, &mut tracker, collider, 120);
        let expected = ContactEvent {
            entity: ground_entity,
            tag: SurfaceTag::MovingPlatform,
        };
        assert_eq!(landed, vec![(ContactPhase::Began, expected.clone())]);

        // Lift the capsule well clear of the ground
        world.translate_body(body, Vec3::new(0.0, 10.0, 0.0));
        if let Some(rb) = world.get_rigid_body_mut(body) {
            rb.set_linvel(vector![0.0, 0.0, 0.0], true);
        }
        let left = step_and_collect(&mut world, &mut tracker, collider, 2);
        assert_eq!(left, vec![(ContactPhase::Ended, expected)]);
    }

    #[test]
    fn test_untagged_contacts_are_silent() {
        let mut world = PhysicsWorld::new();
        world.create_ground(0.0);
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![0.0, 1.0, 0.0])
            .lock_rotations()
            .build();
        let collider = ColliderBuilder::capsule_y(0.5, 0.3).build();
        let (_, collider) = world.add_dynamic_body(body, collider);
        let mut tracker = ContactTracker::new();

        let events = step_and_collect(&mut world, &mut tracker, collider, 120);
        assert!(events.is_empty());
        assert_eq!(world.touching_colliders(collider).len(), 1);
    }

    #[test]
    fn test_tag_parsing() {
        assert_eq!(SurfaceTag::from("MovingPlatform"), SurfaceTag::MovingPlatform);
        assert_eq!(SurfaceTag::from(""), SurfaceTag::Untagged);
        assert_eq!(
            SurfaceTag::from("Cloner"),
            SurfaceTag::Named("Cloner".to_string())
        );
        assert_eq!(SurfaceTag::MovingPlatform.to_string(), "MovingPlatform");
    }

    #[test]
    fn test_only_moving_platform_is_platform() {
        assert!(SurfaceTag::MovingPlatform.is_moving_platform());
        assert!(!SurfaceTag::Untagged.is_moving_platform());
        assert!(!SurfaceTag::from("Ground").is_moving_platform());
    }
}
