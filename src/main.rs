//! Strider - headless third-person locomotion demo
//!
//! Loads settings, builds the demo scene, and runs it on a fixed-step clock.

mod settings;
mod sim;

use anyhow::{Context, Result};
use strider_core::GameTime;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use settings::SimSettings;
use sim::Simulation;

fn main() -> Result<()> {
    // Initialize logging, RUST_LOG overrides the default level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    info!("Starting Strider simulation...");

    let settings = SimSettings::load();
    if std::env::args().any(|arg| arg == "--write-settings") {
        settings.save().context("Failed to write settings")?;
    }

    let mut game_time = GameTime::new(settings.time.clone());
    let mut sim = Simulation::new(&settings).context("Failed to build scene")?;

    let duration = f64::from(settings.scene.duration);
    let frame_delta = settings.scene.frame_delta;
    let fixed_timestep = settings.time.fixed_timestep;

    while game_time.total_time < duration {
        game_time.update(frame_delta);
        for _ in 0..game_time.fixed_steps() {
            sim.tick(fixed_timestep);
        }

        // A frame delta that never accumulates time would spin forever
        if game_time.delta_time <= 0.0 {
            anyhow::bail!("Frame delta {} does not advance the clock", frame_delta);
        }
    }

    let controller = sim.controller();
    info!(
        "Finished after {:.1}s ({} frames): position {:.2?}, state {:?}, waypoints reached {}, on platform {}",
        game_time.total_time,
        game_time.frame_count,
        sim.position(),
        controller.ground_state(),
        sim.waypoints_reached(),
        controller.attached_platform().is_some(),
    );

    Ok(())
}
