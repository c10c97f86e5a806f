//! Feeds a path planner's desired velocity into a locomotion controller

use std::collections::HashMap;

use glam::Vec3;
use strider_core::EntityId;
use strider_physics::PhysicsBody;
use tracing::debug;

use crate::locomotion::{AnimationSink, LocomotionController};

use super::PathPlanner;

/// Remaining distance under which the follower holds position.
///
/// Keeps a follower from constantly pushing into whatever it tracks.
pub const STOP_DISTANCE: f32 = 1.3;

/// What the driver is heading for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavTarget {
    /// A fixed world position
    Point(Vec3),
    /// A scene entity, looked up every tick; a missing entity counts as no target
    Entity(EntityId),
}

/// Resolves entity targets to positions without owning them
pub trait TargetLookup {
    fn position_of(&self, entity: EntityId) -> Option<Vec3>;
}

impl TargetLookup for HashMap<EntityId, Vec3> {
    fn position_of(&self, entity: EntityId) -> Option<Vec3> {
        self.get(&entity).copied()
    }
}

impl<F> TargetLookup for F
where
    F: Fn(EntityId) -> Option<Vec3>,
{
    fn position_of(&self, entity: EntityId) -> Option<Vec3> {
        self(entity)
    }
}

/// Follows a target by steering a locomotion controller each tick
pub struct NavigationDriver<P: PathPlanner> {
    planner: P,
    target: Option<NavTarget>,
    arrived: bool,
}

impl<P: PathPlanner> NavigationDriver<P> {
    /// Wrap `planner`, setting its stopping distance to [`STOP_DISTANCE`]
    pub fn new(mut planner: P) -> Self {
        planner.set_stopping_distance(STOP_DISTANCE);
        Self {
            planner,
            target: None,
            arrived: false,
        }
    }

    /// Replace the tracked target
    pub fn set_target(&mut self, target: Option<NavTarget>) {
        self.target = target;
    }

    /// The wrapped path planner
    pub fn planner(&self) -> &P {
        &self.planner
    }

    /// Whether the last update held position inside the stopping distance
    pub fn has_arrived(&self) -> bool {
        self.arrived
    }

    /// Run one tick: refresh the destination, then move or settle.
    ///
    /// The controller is always ticked, so an idle follower still falls,
    /// lands and slides.
    pub fn update<B, A>(
        &mut self,
        controller: &mut LocomotionController<B, A>,
        targets: &impl TargetLookup,
        dt: f32,
    ) where
        B: PhysicsBody,
        A: AnimationSink,
    {
        self.planner
            .sync_agent_position(controller.body().position());

        if let Some(destination) = self.resolve_target(targets) {
            self.planner.set_destination(destination);
        }

        if self.planner.remaining_distance() > self.planner.stopping_distance() {
            self.arrived = false;
            controller.move_character(self.planner.desired_velocity(), false, false, dt);
        } else {
            if !self.arrived {
                debug!(
                    "Arrived within {} of destination",
                    self.planner.stopping_distance()
                );
            }
            self.arrived = true;
            controller.move_character(Vec3::ZERO, false, false, dt);
        }
    }

    fn resolve_target(&self, targets: &impl TargetLookup) -> Option<Vec3> {
        match self.target? {
            NavTarget::Point(position) => Some(position),
            NavTarget::Entity(entity) => targets.position_of(entity),
        }
    }
}
