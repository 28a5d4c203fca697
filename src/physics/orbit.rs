//! Orbit stabilization for planets.
//!
//! With a one-tick time step, plain integration of the star's pull lets
//! planet orbits spiral. While stabilization is enabled the velocity direction
//! is replaced by the chord to the next point on the planet's current circle,
//! keeping the orbital radius fixed and the speed unchanged.

use bevy::math::DVec3;

/// Redirect `vel` so that `pos + vel` lies on the circle of radius `|pos|`.
///
/// The orbit lies in the XZ plane. The chord of length `v` subtends a
/// half-angle `θ = asin((v/2)/r)`; the target point is the current polar
/// angle rotated by `-2θ`. Returns `vel` unchanged when the correction is
/// undefined (zero radius, zero speed, or a chord longer than the diameter).
pub fn stabilized_velocity(pos: DVec3, vel: DVec3) -> DVec3 {
    let speed = vel.length();
    let radius = pos.length();

    if radius == 0.0 || speed == 0.0 || speed / 2.0 > radius {
        return vel;
    }

    let half_angle = ((speed / 2.0) / radius).asin();
    let target_angle = pos.z.atan2(pos.x) - 2.0 * half_angle;
    let target = DVec3::new(radius * target_angle.cos(), 0.0, radius * target_angle.sin());

    let chord = target - pos;
    match chord.try_normalize() {
        Some(direction) => direction * speed,
        None => vel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_step_stays_on_circle() {
        let pos = DVec3::new(2.4, 0.0, 0.0);
        let vel = DVec3::new(0.0, 0.0, -10.0 / 1910.0);
        let corrected = stabilized_velocity(pos, vel);

        assert_relative_eq!(corrected.length(), vel.length(), max_relative = 1e-12);
        assert_relative_eq!((pos + corrected).length(), pos.length(), max_relative = 1e-12);
    }

    #[test]
    fn test_keeps_direction_of_travel() {
        // Orbits run toward negative polar angle, i.e. -z from the +x axis
        let pos = DVec3::new(3.0, 0.0, 0.0);
        let vel = DVec3::new(0.0, 0.0, -0.01);
        let corrected = stabilized_velocity(pos, vel);
        assert!(corrected.z < 0.0);
        assert!(corrected.x < 0.0, "Chord bends inward toward the star");
    }

    #[test]
    fn test_degenerate_inputs_unchanged() {
        let vel = DVec3::new(0.0, 0.0, -0.01);
        assert_eq!(stabilized_velocity(DVec3::ZERO, vel), vel);
        assert_eq!(stabilized_velocity(DVec3::X, DVec3::ZERO), DVec3::ZERO);

        let fast = DVec3::new(0.0, 0.0, -5.0);
        assert_eq!(stabilized_velocity(DVec3::X, fast), fast);
    }

    #[test]
    fn test_many_steps_hold_radius() {
        let mut pos = DVec3::new(6.6, 0.0, 0.0);
        let mut vel = DVec3::new(0.0, 0.0, -10.0 / 6583.0);
        for _ in 0..10_000 {
            vel = stabilized_velocity(pos, vel);
            pos += vel;
        }
        assert_relative_eq!(pos.length(), 6.6, max_relative = 1e-9);
    }
}
