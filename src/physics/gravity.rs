//! Gravity model for the star system.
//!
//! Bodies feed the returned vector straight into their velocity, so the
//! "force" here is really a per-tick velocity change: it depends on the
//! source mass only, never on the mass of the body being pulled.

use bevy::math::DVec3;

use crate::body::Body;
use crate::types::G;

/// Compute the gravitational pull of a mass at `source_pos` on a point at `pos`.
///
/// Magnitude is `G * source_mass / distance²`, directed from `pos` toward
/// `source_pos`. Callers must not pass coincident positions; if they do, the
/// result is the zero vector rather than NaN.
///
/// # Arguments
/// * `source_mass` - Mass of the attracting body (Earth masses)
/// * `pos` - Position being pulled
/// * `source_pos` - Position of the attracting body
#[inline]
pub fn gravitational_force(source_mass: f64, pos: DVec3, source_pos: DVec3) -> DVec3 {
    let delta = source_pos - pos;
    let r_squared = delta.length_squared();

    if r_squared == 0.0 {
        return DVec3::ZERO;
    }

    let r = r_squared.sqrt();
    // delta / r is the unit vector toward the source
    delta * (G * source_mass / (r_squared * r))
}

/// Pull of `source` on a point at `pos`.
#[inline]
pub fn pull_of(source: &impl Body, pos: DVec3) -> DVec3 {
    gravitational_force(source.mass(), pos, source.position())
}
