//! Core physics types and constants for the star-system simulation.
//!
//! All quantities are in scene units: distances in scene units, velocities in
//! scene units per tick, masses in Earth masses. One tick is one discrete step;
//! velocities are added to positions directly.

use std::fmt;

use bevy::math::DVec3;

/// Gravitational constant, scaled for scene units and Earth masses.
pub const G: f64 = 6.674e-11;

/// Star mass at which planet orbits are stabilized (Sun in Earth masses).
pub const REFERENCE_STAR_MASS: f64 = 333_000.0;

/// Two asteroids closer than this collide.
pub const ASTEROID_COLLISION_DISTANCE: f64 = 0.15;

/// Added to a planet's scaled radius to get the asteroid impact distance.
pub const ASTEROID_IMPACT_MARGIN: f64 = 0.1;

/// Scaled gravity above which a neighbor is re-checked more often.
pub const STRONG_GRAVITY_THRESHOLD: f64 = 1e-4;

/// Upper bound on the wait between two checks of the same pair.
///
/// Pairs with no closing speed would otherwise never be checked again.
pub const MAX_CHECK_INTERVAL: u32 = 10_000;

/// Stable identifier of a simulated body.
///
/// Identifiers are allocated from a single counter shared by planets and
/// asteroids and are never reused while the simulation lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub u32);

impl BodyId {
    /// The star always has id 0; other bodies are numbered from 1.
    pub const STAR: BodyId = BodyId(0);
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The three kinds of simulated bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Star,
    Planet,
    Asteroid,
}

/// Physical state of a moving body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BodyState {
    /// Position in scene units from the star.
    pub pos: DVec3,
    /// Velocity in scene units per tick.
    pub vel: DVec3,
    /// Mass in Earth masses.
    pub mass: f64,
}

impl BodyState {
    /// Create a new body state
    pub fn new(pos: DVec3, vel: DVec3, mass: f64) -> Self {
        Self { pos, vel, mass }
    }

    /// Speed in scene units per tick.
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    /// Distance to the star at the origin.
    pub fn distance_to_star(&self) -> f64 {
        self.pos.length()
    }

    /// Advance the position by one tick of the current velocity.
    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Whether position and velocity are free of NaN and infinities.
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }

    /// Linear momentum.
    pub fn momentum(&self) -> DVec3 {
        self.vel * self.mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrate_adds_velocity() {
        let mut state = BodyState::new(DVec3::new(1.0, 0.0, 0.0), DVec3::new(0.0, 0.0, -0.5), 1.0);
        state.integrate();
        assert_eq!(state.pos, DVec3::new(1.0, 0.0, -0.5));
        state.integrate();
        assert_eq!(state.pos, DVec3::new(1.0, 0.0, -1.0));
    }

    #[test]
    fn test_non_finite_state_detected() {
        let mut state = BodyState::new(DVec3::X, DVec3::ZERO, 1.0);
        assert!(state.is_finite());
        state.vel.y = f64::NAN;
        assert!(!state.is_finite());
    }

    #[test]
    fn test_body_id_display() {
        assert_eq!(BodyId(7).to_string(), "#7");
        assert_eq!(BodyId::STAR, BodyId(0));
    }

    #[test]
    fn test_momentum_scales_with_mass() {
        let state = BodyState::new(DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0), 3.0);
        assert_eq!(state.momentum(), DVec3::new(6.0, 0.0, 0.0));
    }
}
