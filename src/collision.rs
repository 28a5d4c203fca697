//! Collision detection thresholds and resolution.
//!
//! Five kinds of contact are recognised:
//! - asteroid into star: the asteroid is destroyed
//! - planet into star: the planet is destroyed
//! - asteroid into asteroid: both are destroyed in one explosion
//! - asteroid into planet: the asteroid is destroyed and kicks the planet
//! - planet into planet: elastic bounce, both survive
//!
//! Every resolver checks liveness first, so resolving a contact that
//! involves an already-dead body changes nothing and emits nothing.

use bevy::math::DVec3;
use bevy::prelude::*;

use crate::asteroid::Asteroid;
use crate::config::SimulationConfig;
use crate::planet::Planet;
use crate::types::{ASTEROID_COLLISION_DISTANCE, ASTEROID_IMPACT_MARGIN, BodyId};

/// Which pair of body kinds collided.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollisionKind {
    AsteroidStar,
    PlanetStar,
    AsteroidAsteroid,
    AsteroidPlanet,
    PlanetPlanet,
}

/// Something the rendering layer should know about, produced by a tick or
/// by a launch command.
#[derive(Message, Clone, Debug, PartialEq)]
pub enum SimEvent {
    AsteroidSpawned { id: BodyId, position: DVec3 },
    AsteroidLaunched { id: BodyId, velocity: DVec3 },
    BodyDestroyed { id: BodyId, cause: CollisionKind },
    /// Visual explosion; `tick` is the tick it happened on.
    Explosion { position: DVec3, tick: u64 },
    /// A planet was knocked off its stabilized orbit.
    PlanetPerturbed { id: BodyId },
}

/// Contact distances derived from the current configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionThresholds {
    pub star_size: f64,
    pub planet_size_scale: f64,
}

impl CollisionThresholds {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            star_size: config.star_size,
            planet_size_scale: config.planet_size_scale,
        }
    }

    /// Asteroid hits the star when `distance <= star_size`.
    pub fn asteroid_hits_star(&self, distance_to_star: f64) -> bool {
        distance_to_star <= self.star_size
    }

    /// Planet falls into the star when `distance <= |star_size - planet_size|`.
    pub fn planet_hits_star(&self, distance_to_star: f64, planet_size: f64) -> bool {
        distance_to_star <= (self.star_size - planet_size).abs()
    }

    pub fn asteroids_touch(&self, distance: f64) -> bool {
        distance < ASTEROID_COLLISION_DISTANCE
    }

    pub fn asteroid_hits_planet(&self, distance: f64, planet_size: f64) -> bool {
        distance < self.asteroid_planet_distance(planet_size)
    }

    pub fn asteroid_planet_distance(&self, planet_size: f64) -> f64 {
        ASTEROID_IMPACT_MARGIN + planet_size * self.planet_size_scale
    }

    pub fn planets_touch(&self, distance: f64, size_a: f64, size_b: f64) -> bool {
        distance < self.planet_planet_distance(size_a, size_b)
    }

    pub fn planet_planet_distance(&self, size_a: f64, size_b: f64) -> f64 {
        (size_a + size_b) * self.planet_size_scale
    }
}

/// Asteroid fell into the star.
pub fn resolve_asteroid_star(asteroid: &mut Asteroid) -> Vec<SimEvent> {
    if !asteroid.active {
        return Vec::new();
    }
    asteroid.active = false;

    info!("Asteroid {} fell into the star", asteroid.id);
    vec![SimEvent::BodyDestroyed {
        id: asteroid.id,
        cause: CollisionKind::AsteroidStar,
    }]
}

/// Planet fell into the star and is removed for good.
pub fn resolve_planet_star(planet: &mut Planet) -> Vec<SimEvent> {
    if !planet.alive {
        return Vec::new();
    }
    planet.alive = false;

    info!("Planet {} ({}) fell into the star", planet.name, planet.id);
    vec![SimEvent::BodyDestroyed {
        id: planet.id,
        cause: CollisionKind::PlanetStar,
    }]
}

/// Two asteroids met. Both vanish in an explosion at their midpoint.
pub fn resolve_asteroid_asteroid(a: &mut Asteroid, b: &mut Asteroid, tick: u64) -> Vec<SimEvent> {
    if !a.active || !b.active || a.id == b.id {
        return Vec::new();
    }
    a.active = false;
    b.active = false;

    let midpoint = (a.state.pos + b.state.pos) * 0.5;
    info!("Asteroids {} and {} collided", a.id, b.id);

    vec![
        SimEvent::BodyDestroyed {
            id: a.id,
            cause: CollisionKind::AsteroidAsteroid,
        },
        SimEvent::BodyDestroyed {
            id: b.id,
            cause: CollisionKind::AsteroidAsteroid,
        },
        SimEvent::Explosion {
            position: midpoint,
            tick,
        },
    ]
}

/// Asteroid struck a planet.
///
/// The planet's velocity changes by the relative velocity scaled by
/// `cbrt(m_asteroid) / cbrt(m_planet)`, and its spin by the cross product of
/// the impact offset with that change. The planet leaves its stabilized
/// orbit.
pub fn resolve_asteroid_planet(
    asteroid: &mut Asteroid,
    planet: &mut Planet,
    tick: u64,
) -> Vec<SimEvent> {
    if !asteroid.active || !planet.alive {
        return Vec::new();
    }
    asteroid.active = false;

    let relative_pos = asteroid.state.pos - planet.state.pos;
    let relative_vel = asteroid.state.vel - planet.state.vel;
    let delta_v = relative_vel * (asteroid.state.mass.cbrt() / planet.state.mass.cbrt());
    let delta_spin = relative_pos.cross(delta_v);

    planet.state.vel += delta_v;
    planet.rotation += delta_spin;
    planet.should_correct_orbit = false;

    info!(
        "Asteroid {} hit {} ({}) at relative speed {:.5}",
        asteroid.id,
        planet.name,
        planet.id,
        relative_vel.length()
    );

    vec![
        SimEvent::BodyDestroyed {
            id: asteroid.id,
            cause: CollisionKind::AsteroidPlanet,
        },
        SimEvent::Explosion {
            position: asteroid.state.pos,
            tick,
        },
        SimEvent::PlanetPerturbed { id: planet.id },
    ]
}

/// Two planets touched. Elastic impulse along the line of centres.
///
/// `J = 2 (v_rel · n) / (1/m_a + 1/m_b)` with `n` pointing from `a` to `b`;
/// `a` loses `J n / m_a` and `b` gains `J n / m_b`, so total momentum is
/// unchanged. Pairs already separating are left alone, which makes a second
/// check of the same contact from the other planet's side a no-op.
pub fn resolve_planet_planet(a: &mut Planet, b: &mut Planet) -> Vec<SimEvent> {
    if !a.alive || !b.alive || a.id == b.id {
        return Vec::new();
    }

    let Some(normal) = (b.state.pos - a.state.pos).try_normalize() else {
        return Vec::new();
    };

    let approach = (a.state.vel - b.state.vel).dot(normal);
    if approach <= 0.0 {
        return Vec::new();
    }

    let impulse = 2.0 * approach / (1.0 / a.state.mass + 1.0 / b.state.mass);
    let impulse_vec = normal * impulse;

    a.state.vel -= impulse_vec / a.state.mass;
    b.state.vel += impulse_vec / b.state.mass;
    a.should_correct_orbit = false;
    b.should_correct_orbit = false;

    info!("Planets {} and {} collided", a.name, b.name);

    vec![
        SimEvent::PlanetPerturbed { id: a.id },
        SimEvent::PlanetPerturbed { id: b.id },
    ]
}
