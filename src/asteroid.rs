//! Player-launched asteroids.
//!
//! An asteroid is spawned *held* at the launch point, where it only follows
//! the position supplied by the input layer. Launching gives it a velocity
//! and from then on it is pulled by the star and planets until it collides
//! with something and is removed.

use bevy::math::{DQuat, DVec3, EulerRot};
use bevy::prelude::*;

use crate::body::Body;
use crate::scheduler::NeighborSet;
use crate::types::{BodyId, BodyKind, BodyState};

/// Where new asteroids appear: a quarter of the way from the camera at
/// `(0, 5, 6)` toward the star, dropped half a unit.
pub const SPAWN_POINT: DVec3 = DVec3::new(0.0, 3.25, 4.5);

/// Scale from aim offset to lateral launch speed.
pub const LATERAL_VELOCITY_SCALE: f64 = 0.02;

/// Scale of the star-ward push added on release.
pub const STARWARD_MOMENTUM_SCALE: f64 = 0.0005;

/// Commands from the input layer, applied before the next tick.
#[derive(Message, Clone, Copy, Debug, PartialEq)]
pub enum LaunchCommand {
    /// Create a held asteroid.
    Spawn { position: DVec3 },
    /// Drag a held asteroid.
    MoveHeld { id: BodyId, position: DVec3 },
    /// Release a held asteroid.
    Launch { id: BodyId, velocity: DVec3 },
    /// Clear all asteroids and restore the planets.
    Reset,
}

/// An asteroid in the running simulation.
#[derive(Clone, Debug)]
pub struct Asteroid {
    pub id: BodyId,
    pub state: BodyState,
    /// Spin applied each tick as XYZ Euler increments.
    pub angular_velocity: DVec3,
    pub orientation: DQuat,
    /// False while the player is still holding it.
    pub moving: bool,
    /// False once it has collided; it is purged at the end of the tick.
    pub active: bool,
    /// Scheduled checks against older asteroids.
    pub asteroid_links: NeighborSet,
    /// Scheduled checks against every planet.
    pub planet_links: NeighborSet,
}

impl Asteroid {
    /// A held asteroid at `pos`.
    pub fn held(id: BodyId, pos: DVec3, mass: f64) -> Self {
        Self {
            id,
            state: BodyState::new(pos, DVec3::ZERO, mass),
            angular_velocity: DVec3::ZERO,
            orientation: DQuat::IDENTITY,
            moving: false,
            active: true,
            asteroid_links: NeighborSet::default(),
            planet_links: NeighborSet::default(),
        }
    }

    /// Release the asteroid with `velocity`. Spin follows the launch vector.
    pub fn launch(&mut self, velocity: DVec3) {
        self.state.vel = velocity;
        self.angular_velocity = velocity;
        self.moving = true;
    }

    /// Whether gravity and collision checks apply this tick.
    pub fn is_simulated(&self) -> bool {
        self.active && self.moving
    }

    /// Advance position and orientation by one tick.
    pub fn integrate(&mut self) {
        self.state.integrate();
        let w = self.angular_velocity;
        let delta = DQuat::from_euler(EulerRot::XYZ, w.x, w.y, w.z);
        self.orientation = (delta * self.orientation).normalize();
    }
}

impl Body for Asteroid {
    fn id(&self) -> BodyId {
        self.id
    }

    fn kind(&self) -> BodyKind {
        BodyKind::Asteroid
    }

    fn position(&self) -> DVec3 {
        self.state.pos
    }

    fn velocity(&self) -> DVec3 {
        self.state.vel
    }

    fn mass(&self) -> f64 {
        self.state.mass
    }

    fn size(&self) -> f64 {
        0.0
    }

    fn is_alive(&self) -> bool {
        self.active
    }
}

/// Convert an aim point into a launch velocity.
///
/// The offset of `aim` from [`SPAWN_POINT`] is stripped of its component
/// along the line to the star and scaled by [`LATERAL_VELOCITY_SCALE`].
/// With `with_momentum`, a push toward the star is added so the asteroid
/// leaves the launch point even when aimed dead centre.
pub fn launch_velocity(aim: DVec3, with_momentum: bool) -> DVec3 {
    let lateral = aim - SPAWN_POINT;
    let to_star = -SPAWN_POINT;

    let along_star = lateral.project_onto(to_star);
    let mut velocity = (lateral - along_star) * LATERAL_VELOCITY_SCALE;

    if with_momentum {
        velocity += to_star * STARWARD_MOMENTUM_SCALE;
    }
    velocity
}
