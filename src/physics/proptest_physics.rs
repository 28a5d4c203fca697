//! Property-based tests for the physics and scheduling rules using proptest.
//!
//! These tests verify invariants across a wide range of positions, speeds
//! and masses.

use bevy::math::DVec3;
use proptest::prelude::*;

use super::{gravitational_force, stabilized_velocity};
use crate::collision::resolve_planet_planet;
use crate::scheduler::{amplified_wait, frames_to_close};
use crate::test_utils::{assertions, fixtures};
use crate::types::MAX_CHECK_INTERVAL;

fn vec3(range: std::ops::Range<f64>) -> impl Strategy<Value = DVec3> {
    (range.clone(), range.clone(), range).prop_map(|(x, y, z)| DVec3::new(x, y, z))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Gravity always points at the source and falls off with distance.
    #[test]
    fn prop_gravity_points_at_source_and_weakens(
        mass in 0.01f64..1e6,
        dir in vec3(-1.0..1.0),
        r in 0.1f64..50.0,
    ) {
        prop_assume!(dir.length() > 1e-3);
        let unit = dir.normalize();

        let near = gravitational_force(mass, unit * r, DVec3::ZERO);
        let far = gravitational_force(mass, unit * (r * 2.0), DVec3::ZERO);

        prop_assert!(near.dot(-unit) > 0.0);
        prop_assert!(far.length() < near.length());
        // Inverse square: doubling the distance quarters the pull
        prop_assert!((near.length() / far.length() - 4.0).abs() < 1e-9);
    }

    /// A re-armed check is never scheduled for the current tick and never
    /// beyond the cap. Amplification of at least one only ever shortens it.
    #[test]
    fn prop_wait_is_bounded(
        distance in 0.0f64..1e4,
        speed_a in 0.0f64..1.0,
        speed_b in 0.0f64..1.0,
        force in 0.0f64..1.0,
        amplification in 1.0f64..1000.0,
    ) {
        let frames = frames_to_close(distance, speed_a, speed_b);
        prop_assert!((1..=MAX_CHECK_INTERVAL).contains(&frames));

        let wait = amplified_wait(frames, force, amplification);
        prop_assert!((1..=MAX_CHECK_INTERVAL).contains(&wait));
        prop_assert!(wait <= frames);
    }

    /// Stabilization keeps the speed and lands on the same circle.
    #[test]
    fn prop_stabilizer_preserves_radius(
        r in 0.5f64..20.0,
        angle in 0.0f64..std::f64::consts::TAU,
        speed in 1e-4f64..0.05,
    ) {
        let pos = DVec3::new(r * angle.cos(), 0.0, r * angle.sin());
        let vel = DVec3::new(0.0, 0.0, -speed);
        let corrected = stabilized_velocity(pos, vel);

        prop_assert!((corrected.length() - speed).abs() < 1e-12);
        prop_assert!(((pos + corrected).length() - r).abs() < 1e-9);
    }

    /// Planet-planet collisions conserve momentum and resolving the same
    /// contact twice changes nothing.
    #[test]
    fn prop_planet_impulse_conserves_momentum(
        mass_a in 0.05f64..400.0,
        mass_b in 0.05f64..400.0,
        vel_a in vec3(-0.01..0.01),
        vel_b in vec3(-0.01..0.01),
        offset in vec3(-0.1..0.1),
    ) {
        prop_assume!(offset.length() > 1e-3);
        let mut a = fixtures::free_planet(1, DVec3::new(3.0, 0.0, 0.0), vel_a, mass_a);
        let mut b = fixtures::free_planet(2, DVec3::new(3.0, 0.0, 0.0) + offset, vel_b, mass_b);

        let before = assertions::total_momentum([&a, &b]);
        resolve_planet_planet(&mut a, &mut b);
        let after = assertions::total_momentum([&a, &b]);
        let scale = before.length().max(after.length()).max(1.0);
        assertions::assert_vec_close(after, before, 1e-9 * scale);

        let (va, vb) = (a.state.vel, b.state.vel);
        let events = resolve_planet_planet(&mut b, &mut a);
        prop_assert!(events.is_empty());
        prop_assert_eq!(a.state.vel, va);
        prop_assert_eq!(b.state.vel, vb);
    }
}
