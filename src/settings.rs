//! Simulation settings with persistence
//!
//! Settings are saved to `~/.config/strider/settings.toml`

use std::fs;
use std::path::PathBuf;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use strider_core::TimeConfig;
use strider_game::{LocomotionConfig, NavigationConfig};
use tracing::{info, warn};

/// All simulation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    pub locomotion: LocomotionConfig,
    pub navigation: NavigationConfig,
    pub time: TimeConfig,
    pub scene: SceneSettings,
}

impl SimSettings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("strider"))
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.toml"))
    }

    /// Load settings from disk, or return defaults if not found or invalid
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory");
            return Self::default();
        };

        if !path.exists() {
            info!("No settings file found, using defaults");
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match Self::parse(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to load settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Parse and validate settings from TOML
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let settings: Self = toml::from_str(content)?;
        settings.locomotion.validate()?;
        settings.time.validate()?;
        if settings.navigation.speed < 0.0 {
            anyhow::bail!(
                "navigation speed must not be negative, got {}",
                settings.navigation.speed
            );
        }
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let Some(dir) = Self::config_dir() else {
            anyhow::bail!("Could not determine config directory");
        };

        let path = dir.join("settings.toml");

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

/// Layout and length of the headless demo scene
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Simulated seconds to run
    pub duration: f32,
    /// Raw frame delta fed to the clock each frame
    pub frame_delta: f32,
    /// Where the character is dropped in
    pub spawn: Vec3,
    /// Points visited in order before following the platform
    pub waypoints: Vec<Vec3>,
    /// Follow the moving platform once the waypoints are done
    pub follow_platform: bool,
    /// Ramp placement and tilt in degrees
    pub slope_position: Vec3,
    pub slope_tilt: f32,
    /// Centre of the platform's back-and-forth path along X
    pub platform_origin: Vec3,
    pub platform_amplitude: f32,
    /// Seconds for one full back-and-forth cycle
    pub platform_period: f32,
    /// Forward speed of the run clip, used for root-motion displacement
    pub root_motion_speed: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            duration: 20.0,
            frame_delta: 1.0 / 30.0,
            spawn: Vec3::new(0.0, 0.5, 0.0),
            waypoints: vec![Vec3::new(0.0, 0.0, 8.0), Vec3::new(-6.0, 0.0, 8.0)],
            follow_platform: true,
            slope_position: Vec3::new(-6.0, 0.0, 14.0),
            slope_tilt: 50.0,
            platform_origin: Vec3::new(6.0, 0.05, 8.0),
            platform_amplitude: 3.0,
            platform_period: 8.0,
            root_motion_speed: 4.0,
        }
    }
}
