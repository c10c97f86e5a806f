/// Errors raised while building character bodies.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("invalid capsule: height {height} must exceed twice the radius {radius}")]
    InvalidCapsule { height: f32, radius: f32 },
}
