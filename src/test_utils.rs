//! Test utilities for star-system simulation tests.
//!
//! Provides fixtures for building small scenes and assertions for the
//! invariants the tick must preserve.

use bevy::math::DVec3;

use crate::asteroid::Asteroid;
use crate::planet::{EARTH, Planet, PlanetSpec};
use crate::types::BodyId;

/// Fixtures for creating bodies in known states.
pub mod fixtures {
    use super::*;

    /// A launched asteroid at `pos` moving with `vel`.
    pub fn moving_asteroid(id: u32, pos: DVec3, vel: DVec3) -> Asteroid {
        let mut asteroid = Asteroid::held(BodyId(id), pos, 1.0);
        asteroid.launch(vel);
        asteroid
    }

    /// An unstabilized planet with Earth's size at `pos` moving with `vel`.
    pub fn free_planet(id: u32, pos: DVec3, vel: DVec3, mass: f64) -> Planet {
        let spec = PlanetSpec { mass, ..EARTH };
        let mut planet = Planet::from_spec(BodyId(id), id as usize, &spec, 0.4, false);
        planet.state.pos = pos;
        planet.state.vel = vel;
        planet
    }
}

/// Assertions over body states.
pub mod assertions {
    use super::*;

    /// Total linear momentum of a set of planets.
    pub fn total_momentum<'a>(planets: impl IntoIterator<Item = &'a Planet>) -> DVec3 {
        planets.into_iter().map(|p| p.state.momentum()).sum()
    }

    /// Assert two vectors agree component-wise within `tolerance`.
    pub fn assert_vec_close(actual: DVec3, expected: DVec3, tolerance: f64) {
        let diff = (actual - expected).abs().max_element();
        assert!(
            diff <= tolerance,
            "expected {expected:?}, got {actual:?} (diff {diff:e})"
        );
    }
}
