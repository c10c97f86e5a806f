use strider_physics::PhysicsError;

/// Errors raised while building locomotion or navigation configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("gravity multiplier must be within [1, 4], got {0}")]
    GravityMultiplierOutOfRange(f32),

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("ground check distance must be positive, got {0}")]
    NonPositiveGroundCheck(f32),

    #[error("invalid capsule: {0}")]
    Capsule(#[from] PhysicsError),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
