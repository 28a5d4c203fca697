//! Stellar Sandbox - Star System Simulator
//!
//! Headless driver: loads the configuration, launches one asteroid from the
//! spawn point and logs what happens to it for a fixed number of ticks.

use std::io::ErrorKind;
use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::math::DVec3;
use bevy::prelude::*;

use stellar_sandbox::asteroid::{SPAWN_POINT, launch_velocity};
use stellar_sandbox::collision::SimEvent;
use stellar_sandbox::config::SimulationConfig;
use stellar_sandbox::error::ConfigError;
use stellar_sandbox::physics::PhysicsPlugin;
use stellar_sandbox::simulation::Simulation;

const DEFAULT_CONFIG_PATH: &str = "assets/sandbox.toml";

/// Ticks to run before exiting.
const DEMO_TICKS: u64 = 3000;

fn main() {
    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        .add_plugins(LogPlugin::default())
        .insert_resource(Time::<Fixed>::from_hz(60.0))
        .add_plugins(PhysicsPlugin)
        // Load config first so the demo launch sees the final values
        .add_systems(Startup, (load_config, launch_demo_asteroid).chain())
        .add_systems(Update, (log_events, exit_after_demo))
        .run();
}

/// Replace the default configuration with the file named on the command
/// line, or `assets/sandbox.toml` if present.
fn load_config(mut config: ResMut<SimulationConfig>, mut simulation: ResMut<Simulation>) {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let loaded = match SimulationConfig::load(&path) {
        Ok(loaded) => loaded,
        Err(ConfigError::Io(err)) if err.kind() == ErrorKind::NotFound => {
            info!("No {path} found; using compiled defaults");
            return;
        }
        Err(err) => {
            warn!("Failed to load {path}: {err}; using defaults");
            return;
        }
    };

    match Simulation::new(loaded.clone()) {
        Ok(rebuilt) => {
            *simulation = rebuilt;
            *config = loaded;
            info!("Loaded simulation config from {path}");
        }
        Err(err) => warn!("Rejected {path}: {err}; using defaults"),
    }
}

fn launch_demo_asteroid(mut simulation: ResMut<Simulation>) {
    let aim = SPAWN_POINT + DVec3::new(0.4, -0.2, 0.0);
    let launched = simulation
        .spawn_asteroid(SPAWN_POINT)
        .and_then(|id| simulation.launch_asteroid(id, launch_velocity(aim, true)));

    if let Err(err) = launched {
        error!("Demo launch failed: {err}");
    }
}

fn log_events(mut events: MessageReader<SimEvent>) {
    for event in events.read() {
        match event {
            SimEvent::BodyDestroyed { id, cause } => info!("{id} destroyed ({cause:?})"),
            SimEvent::Explosion { position, tick } => {
                info!("Explosion at {position} on tick {tick}");
            }
            other => debug!("{other:?}"),
        }
    }
}

fn exit_after_demo(simulation: Res<Simulation>, mut exit: MessageWriter<AppExit>) {
    if simulation.tick_count() >= DEMO_TICKS {
        info!("Demo finished after {} ticks", simulation.tick_count());
        exit.write(AppExit::Success);
    }
}
