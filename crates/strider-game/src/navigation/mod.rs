//! Target following on top of the locomotion controller
//!
//! A [`PathPlanner`] turns a destination into a desired velocity; the
//! [`NavigationDriver`] feeds that velocity into the controller every tick
//! until the character is within the stopping distance.

mod driver;
mod planner;

pub use driver::{NavTarget, NavigationDriver, TargetLookup, STOP_DISTANCE};
pub use planner::{DirectPlanner, NavigationConfig, PathPlanner};
