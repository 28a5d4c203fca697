//! Common test utilities for integration tests.

#![allow(dead_code)]

use bevy::math::DVec3;
use stellar_sandbox::collision::{CollisionKind, SimEvent};
use stellar_sandbox::config::SimulationConfig;
use stellar_sandbox::planet::PlanetSpec;
use stellar_sandbox::simulation::Simulation;
use stellar_sandbox::types::BodyId;

/// A star with no planets and default parameters.
pub fn empty_system() -> Simulation {
    Simulation::empty(SimulationConfig::default()).expect("default config is valid")
}

/// The default eight-planet system.
pub fn solar_system() -> Simulation {
    Simulation::new(SimulationConfig::default()).expect("default config is valid")
}

/// A star with the given planets.
pub fn system_with(specs: &[PlanetSpec]) -> Simulation {
    Simulation::with_planets(SimulationConfig::default(), specs).expect("valid planets")
}

/// Spawn and immediately launch an asteroid.
pub fn launch(sim: &mut Simulation, pos: DVec3, vel: DVec3) -> BodyId {
    let id = sim.spawn_asteroid(pos).expect("spawn position is valid");
    sim.launch_asteroid(id, vel).expect("fresh asteroid launches");
    id
}

/// Run `ticks` ticks and collect every event.
pub fn run(sim: &mut Simulation, ticks: usize) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(sim.tick().expect("tick stays finite"));
    }
    events
}

/// Ids destroyed by collisions of `kind`.
pub fn destroyed(events: &[SimEvent], kind: CollisionKind) -> Vec<BodyId> {
    events
        .iter()
        .filter_map(|event| match event {
            SimEvent::BodyDestroyed { id, cause } if *cause == kind => Some(*id),
            _ => None,
        })
        .collect()
}

/// Explosion positions, in the order they happened.
pub fn explosions(events: &[SimEvent]) -> Vec<DVec3> {
    events
        .iter()
        .filter_map(|event| match event {
            SimEvent::Explosion { position, .. } => Some(*position),
            _ => None,
        })
        .collect()
}
