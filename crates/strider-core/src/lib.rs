//! Strider Core - Core types and utilities for the Strider locomotion stack
//!
//! This crate provides the foundational types shared by the physics and game crates:
//! - Math primitives (re-exported from glam)
//! - Transform and entity identifiers
//! - Fixed-step game clock with frame-delta guards

pub mod time;
pub mod types;

pub use glam::{Quat, Vec3};
pub use time::{can_integrate, GameTime, TimeConfig, TimeConfigError};
pub use types::{EntityId, Transform};
