//! Physics for the star system.
//!
//! The pure functions here (gravity and orbit stabilization) are used by
//! [`Simulation::tick`]. [`PhysicsPlugin`] drives the tick from Bevy's
//! FixedUpdate schedule, one tick per fixed step.

mod gravity;
mod orbit;

#[cfg(test)]
mod proptest_physics;

use bevy::prelude::*;

pub use gravity::{gravitational_force, pull_of};
pub use orbit::stabilized_velocity;

use crate::asteroid::LaunchCommand;
use crate::collision::SimEvent;
use crate::config::SimulationConfig;
use crate::simulation::Simulation;

/// Plugin running the simulation at the fixed timestep.
///
/// Adds systems for:
/// - Applying configuration changes and launch commands between ticks
/// - Advancing the simulation one tick per FixedUpdate
///
/// Uses the [`SimulationConfig`] resource if one is already inserted.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        let simulation = match Simulation::new(config.clone()) {
            Ok(simulation) => simulation,
            Err(err) => {
                warn!("Invalid simulation config ({err}), using defaults");
                Simulation::default()
            }
        };

        app.insert_resource(config)
            .insert_resource(simulation)
            .init_resource::<SimulationControl>()
            .add_message::<LaunchCommand>()
            .add_message::<SimEvent>()
            .add_systems(
                FixedUpdate,
                (apply_config_changes, apply_launch_commands, physics_step).chain(),
            );
    }
}

/// Pause switch for the simulation.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct SimulationControl {
    pub paused: bool,
}

/// Push edits of the [`SimulationConfig`] resource into the simulation.
///
/// A rejected edit is rolled back in the resource too, so later edits start
/// from the configuration the simulation is actually running.
fn apply_config_changes(
    mut config: ResMut<SimulationConfig>,
    mut simulation: ResMut<Simulation>,
) {
    if !config.is_changed() || *config == *simulation.config() {
        return;
    }
    if simulation.apply_config(config.clone()).is_err() {
        config.set_if_neq(simulation.config().clone());
    }
}

fn apply_launch_commands(
    mut commands: MessageReader<LaunchCommand>,
    mut simulation: ResMut<Simulation>,
) {
    for command in commands.read() {
        let result = match *command {
            LaunchCommand::Spawn { position } => simulation.spawn_asteroid(position).map(|_| ()),
            LaunchCommand::MoveHeld { id, position } => simulation.move_held_asteroid(id, position),
            LaunchCommand::Launch { id, velocity } => simulation.launch_asteroid(id, velocity),
            LaunchCommand::Reset => {
                simulation.reset();
                Ok(())
            }
        };

        if let Err(err) = result {
            warn!("Ignoring {:?}: {}", command, err);
        }
    }
}

/// Advance the simulation by one tick and publish what happened.
///
/// A numerical blow-up leaves the state unusable, so the simulation is reset.
fn physics_step(
    mut simulation: ResMut<Simulation>,
    control: Res<SimulationControl>,
    mut events: MessageWriter<SimEvent>,
) {
    if control.paused {
        return;
    }

    match simulation.tick() {
        Ok(tick_events) => {
            for event in tick_events {
                events.write(event);
            }
        }
        Err(err) => {
            error!("Simulation tick failed: {err}");
            simulation.reset();
        }
    }
}
