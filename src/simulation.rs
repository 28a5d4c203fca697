//! The simulation arena and its per-tick orchestration.
//!
//! [`Simulation`] owns the star, the planets and the asteroids, keyed by
//! stable [`BodyId`]. One call to [`Simulation::tick`] advances everything by
//! one step and returns the events produced, in this order:
//!
//! 1. the star (immobile, nothing to do)
//! 2. each live planet in id order: star gravity, then either orbit
//!    stabilization or scheduled checks against other planets, then
//!    position, spin and the star-impact test
//! 3. each launched asteroid in id order: star gravity, star-impact test,
//!    scheduled checks against older asteroids and planets, then position
//!    and orientation
//! 4. bodies that died during the tick are purged
//!
//! Updates are sequential: a body processed later in the tick sees the
//! already-updated state of bodies processed before it.
//!
//! Launch commands (spawn, move, launch, reset) and configuration changes
//! are applied between ticks only.

use std::collections::BTreeMap;

use bevy::math::DVec3;
use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::asteroid::Asteroid;
use crate::body::{Body, Star};
use crate::collision::{
    CollisionThresholds, SimEvent, resolve_asteroid_asteroid, resolve_asteroid_planet,
    resolve_asteroid_star, resolve_planet_planet, resolve_planet_star,
};
use crate::config::SimulationConfig;
use crate::error::{ConfigError, SimulationError};
use crate::physics::{gravitational_force, pull_of, stabilized_velocity};
use crate::planet::{Planet, PlanetSpec, SOLAR_SYSTEM};
use crate::scheduler::{NeighborSet, amplified_wait, frames_to_close};
use crate::types::BodyId;

/// The whole simulated star system.
#[derive(Resource, Clone, Debug)]
pub struct Simulation {
    config: SimulationConfig,
    star: Star,
    planets: BTreeMap<BodyId, Planet>,
    asteroids: BTreeMap<BodyId, Asteroid>,
    /// Planet layout restored by [`Simulation::reset`].
    scene: Vec<PlanetSpec>,
    next_id: u32,
    planets_added: usize,
    tick: u64,
    rng: ChaCha8Rng,
    /// Events from launch commands, delivered with the next tick.
    pending: Vec<SimEvent>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::assemble(SimulationConfig::default(), SOLAR_SYSTEM)
    }
}

impl Simulation {
    /// The default eight-planet system.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        Self::with_planets(config, SOLAR_SYSTEM)
    }

    /// A star with no planets.
    pub fn empty(config: SimulationConfig) -> Result<Self, SimulationError> {
        Self::with_planets(config, &[])
    }

    /// A star with a custom planet layout.
    pub fn with_planets(
        config: SimulationConfig,
        specs: &[PlanetSpec],
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        for spec in specs {
            validate_planet_spec(spec, config.star_size)?;
        }
        Ok(Self::assemble(config, specs))
    }

    fn assemble(config: SimulationConfig, specs: &[PlanetSpec]) -> Self {
        let mut sim = Self {
            star: Star::new(config.star_size, config.star_mass, config.star_luminosity),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            planets: BTreeMap::new(),
            asteroids: BTreeMap::new(),
            scene: Vec::new(),
            next_id: 1,
            planets_added: 0,
            tick: 0,
            pending: Vec::new(),
        };
        for spec in specs {
            sim.insert_planet(spec);
        }
        sim
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn star(&self) -> &Star {
        &self.star
    }

    /// Number of ticks completed since creation or the last reset.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn planet(&self, id: BodyId) -> Option<&Planet> {
        self.planets.get(&id)
    }

    pub fn planet_by_name(&self, name: &str) -> Option<&Planet> {
        self.planets.values().find(|p| p.name == name)
    }

    pub fn planets(&self) -> impl Iterator<Item = &Planet> {
        self.planets.values()
    }

    pub fn asteroid(&self, id: BodyId) -> Option<&Asteroid> {
        self.asteroids.get(&id)
    }

    pub fn asteroids(&self) -> impl Iterator<Item = &Asteroid> {
        self.asteroids.values()
    }

    /// Every body, star first, for the rendering layer.
    pub fn bodies(&self) -> impl Iterator<Item = &dyn Body> {
        std::iter::once(&self.star as &dyn Body)
            .chain(self.planets.values().map(|p| p as &dyn Body))
            .chain(self.asteroids.values().map(|a| a as &dyn Body))
    }

    // =========================================================================
    // Commands applied between ticks
    // =========================================================================

    /// Add a planet to the running system, with links to every other planet.
    pub fn add_planet(&mut self, spec: &PlanetSpec) -> Result<BodyId, SimulationError> {
        validate_planet_spec(spec, self.config.star_size)?;
        Ok(self.insert_planet(spec))
    }

    fn insert_planet(&mut self, spec: &PlanetSpec) -> BodyId {
        let id = self.allocate_id();
        let others: Vec<BodyId> = self.planets.keys().copied().collect();
        let neighbor_count = others.len() as u32 + 1;

        let mut planet = Planet::from_spec(
            id,
            self.planets_added,
            spec,
            self.config.star_size,
            self.config.is_reference_star_mass(),
        );
        planet.planet_links = NeighborSet::build(others, &mut self.rng);

        for other in self.planets.values_mut() {
            let frames = self.rng.gen_range(0..neighbor_count);
            other.planet_links.insert(id, frames);
        }
        let planet_count = self.planets.len() as u32 + 1;
        for asteroid in self.asteroids.values_mut() {
            let frames = self.rng.gen_range(0..planet_count);
            asteroid.planet_links.insert(id, frames);
        }

        debug!("Added planet {} as {}", spec.name, id);
        self.planets.insert(id, planet);
        self.scene.push(*spec);
        self.planets_added += 1;
        id
    }

    /// Create a held asteroid at `position` and return its id.
    ///
    /// Its neighbor links cover every existing asteroid (all of which have
    /// lower ids) and every live planet.
    pub fn spawn_asteroid(&mut self, position: DVec3) -> Result<BodyId, SimulationError> {
        if !position.is_finite() || position == DVec3::ZERO {
            return Err(SimulationError::DegenerateGeometry);
        }

        let id = self.allocate_id();
        let mut asteroid = Asteroid::held(id, position, self.config.asteroid_mass);

        let older: Vec<BodyId> = self
            .asteroids
            .values()
            .filter(|a| a.active)
            .map(|a| a.id)
            .collect();
        let planets: Vec<BodyId> = self
            .planets
            .values()
            .filter(|p| p.alive)
            .map(|p| p.id)
            .collect();
        asteroid.asteroid_links = NeighborSet::build(older, &mut self.rng);
        asteroid.planet_links = NeighborSet::build(planets, &mut self.rng);

        info!(
            "Spawning asteroid {} at ({:.2}, {:.2}, {:.2})",
            id, position.x, position.y, position.z
        );
        self.asteroids.insert(id, asteroid);
        self.pending.push(SimEvent::AsteroidSpawned { id, position });
        Ok(id)
    }

    /// Move a held asteroid to a position supplied by the input layer.
    pub fn move_held_asteroid(&mut self, id: BodyId, position: DVec3) -> Result<(), SimulationError> {
        if !position.is_finite() || position == DVec3::ZERO {
            return Err(SimulationError::DegenerateGeometry);
        }
        let asteroid = self.held_asteroid_mut(id)?;
        asteroid.state.pos = position;
        Ok(())
    }

    /// Release a held asteroid with `velocity`.
    pub fn launch_asteroid(&mut self, id: BodyId, velocity: DVec3) -> Result<(), SimulationError> {
        if !velocity.is_finite() {
            return Err(SimulationError::DegenerateGeometry);
        }
        let asteroid = self.held_asteroid_mut(id)?;
        asteroid.launch(velocity);

        info!("Launched asteroid {} at speed {:.4}", id, velocity.length());
        self.pending.push(SimEvent::AsteroidLaunched { id, velocity });
        Ok(())
    }

    fn held_asteroid_mut(&mut self, id: BodyId) -> Result<&mut Asteroid, SimulationError> {
        let asteroid = self
            .asteroids
            .get_mut(&id)
            .filter(|a| a.active)
            .ok_or(SimulationError::UnknownBody(id))?;
        if asteroid.moving {
            return Err(SimulationError::AlreadyLaunched(id));
        }
        Ok(asteroid)
    }

    /// Replace the configuration. Invalid values are rejected and the
    /// current configuration is kept.
    ///
    /// A change of star mass re-enables orbit stabilization on every planet
    /// when the new mass is the reference mass, and disables it otherwise.
    pub fn apply_config(&mut self, config: SimulationConfig) -> Result<(), SimulationError> {
        if let Err(err) = config.validate() {
            warn!("Rejected simulation config: {err}");
            return Err(err.into());
        }

        let star_mass_changed = config.star_mass != self.config.star_mass;
        self.star = Star::new(config.star_size, config.star_mass, config.star_luminosity);

        for asteroid in self.asteroids.values_mut() {
            asteroid.state.mass = config.asteroid_mass;
        }

        if star_mass_changed {
            let stabilize = config.is_reference_star_mass();
            for planet in self.planets.values_mut() {
                planet.should_correct_orbit = stabilize;
            }
            info!(
                "Star mass set to {}; orbit stabilization {}",
                config.star_mass,
                if stabilize { "on" } else { "off" }
            );
        }

        self.config = config;
        Ok(())
    }

    /// Throw away all asteroids and restore the planets to their initial
    /// layout, keeping the current configuration.
    pub fn reset(&mut self) {
        info!("Resetting simulation...");
        let scene = std::mem::take(&mut self.scene);
        *self = Self::assemble(self.config.clone(), &scene);
        info!("Simulation reset complete");
    }

    fn allocate_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Advance the system by one step and return the events it produced.
    ///
    /// Fails with [`SimulationError::NumericalBlowup`] if any body ends the
    /// tick with a non-finite position or velocity; the simulation must then
    /// be reset.
    pub fn tick(&mut self) -> Result<Vec<SimEvent>, SimulationError> {
        let mut events = std::mem::take(&mut self.pending);
        let thresholds = CollisionThresholds::from_config(&self.config);

        let planet_ids: Vec<BodyId> = self.planets.keys().copied().collect();
        for id in planet_ids {
            if let Some(mut planet) = self.planets.remove(&id) {
                if planet.alive {
                    self.step_planet(&mut planet, &thresholds, &mut events);
                }
                self.planets.insert(id, planet);
            }
        }

        let asteroid_ids: Vec<BodyId> = self.asteroids.keys().copied().collect();
        for id in asteroid_ids {
            if let Some(mut asteroid) = self.asteroids.remove(&id) {
                if asteroid.is_simulated() {
                    self.step_asteroid(&mut asteroid, &thresholds, &mut events);
                }
                self.asteroids.insert(id, asteroid);
            }
        }

        self.planets.retain(|_, p| p.alive);
        self.asteroids.retain(|_, a| a.active);
        self.tick += 1;

        self.check_finite()?;
        Ok(events)
    }

    fn step_planet(
        &mut self,
        planet: &mut Planet,
        thresholds: &CollisionThresholds,
        events: &mut Vec<SimEvent>,
    ) {
        let distance_to_star = planet.state.distance_to_star();

        if distance_to_star > 0.0 {
            planet.state.vel += pull_of(&self.star, planet.state.pos);

            if planet.should_correct_orbit {
                planet.state.vel = stabilized_velocity(planet.state.pos, planet.state.vel);
            } else {
                self.check_planet_links(planet, thresholds, events);
            }

            planet.state.integrate();
            planet.spin();
        }

        if thresholds.planet_hits_star(distance_to_star, planet.size) {
            events.extend(resolve_planet_star(planet));
        }
    }

    fn check_planet_links(
        &mut self,
        planet: &mut Planet,
        thresholds: &CollisionThresholds,
        events: &mut Vec<SimEvent>,
    ) {
        let gravity_factor = self.config.planet_gravity_factor;

        for other_id in planet.planet_links.advance() {
            let Some(other) = self.planets.get_mut(&other_id).filter(|p| p.alive) else {
                planet.planet_links.remove(other_id);
                continue;
            };

            let distance = planet.state.pos.distance(other.state.pos);
            let frames = if thresholds.planets_touch(distance, planet.size, other.size) {
                events.extend(resolve_planet_planet(planet, other));
                let contact = thresholds.planet_planet_distance(planet.size, other.size);
                frames_to_close(distance + contact, planet.state.speed(), other.state.speed())
            } else {
                let frames = frames_to_close(distance, planet.state.speed(), other.state.speed());
                let pull = gravitational_force(other.state.mass, planet.state.pos, other.state.pos)
                    * gravity_factor;
                planet.state.vel += pull;
                amplified_wait(frames, pull.length(), gravity_factor)
            };

            debug!("Planet {} re-checks {} in {} ticks", planet.id, other_id, frames);
            planet.planet_links.rearm(other_id, frames);
        }
    }

    fn step_asteroid(
        &mut self,
        asteroid: &mut Asteroid,
        thresholds: &CollisionThresholds,
        events: &mut Vec<SimEvent>,
    ) {
        let sensitivity = self.config.asteroid_gravity_sensitivity;
        let distance_to_star = asteroid.state.distance_to_star();

        if distance_to_star > 0.0 {
            asteroid.state.vel += pull_of(&self.star, asteroid.state.pos) * sensitivity;
        }

        if thresholds.asteroid_hits_star(distance_to_star) {
            events.extend(resolve_asteroid_star(asteroid));
            return;
        }

        self.check_asteroid_links(asteroid, thresholds, events);
        if asteroid.active {
            self.check_asteroid_planet_links(asteroid, thresholds, events);
        }
        if asteroid.active {
            asteroid.integrate();
        }
    }

    fn check_asteroid_links(
        &mut self,
        asteroid: &mut Asteroid,
        thresholds: &CollisionThresholds,
        events: &mut Vec<SimEvent>,
    ) {
        for other_id in asteroid.asteroid_links.advance() {
            let Some(other) = self.asteroids.get_mut(&other_id).filter(|a| a.active) else {
                asteroid.asteroid_links.remove(other_id);
                continue;
            };

            let distance = asteroid.state.pos.distance(other.state.pos);
            if other.moving && thresholds.asteroids_touch(distance) {
                events.extend(resolve_asteroid_asteroid(asteroid, other, self.tick));
                return;
            }

            let frames = frames_to_close(distance, asteroid.state.speed(), other.state.speed());
            asteroid.asteroid_links.rearm(other_id, frames);
        }
    }

    fn check_asteroid_planet_links(
        &mut self,
        asteroid: &mut Asteroid,
        thresholds: &CollisionThresholds,
        events: &mut Vec<SimEvent>,
    ) {
        let planet_factor = self.config.planet_gravity_factor;
        let scale = self.config.asteroid_gravity_sensitivity * planet_factor;

        for planet_id in asteroid.planet_links.advance() {
            let Some(planet) = self.planets.get_mut(&planet_id).filter(|p| p.alive) else {
                asteroid.planet_links.remove(planet_id);
                continue;
            };

            let distance = asteroid.state.pos.distance(planet.state.pos);
            if thresholds.asteroid_hits_planet(distance, planet.size) {
                events.extend(resolve_asteroid_planet(asteroid, planet, self.tick));
                return;
            }

            let pull =
                gravitational_force(planet.state.mass, asteroid.state.pos, planet.state.pos) * scale;
            asteroid.state.vel += pull;

            let frames = frames_to_close(distance, asteroid.state.speed(), planet.state.speed());
            let frames = amplified_wait(frames, pull.length(), planet_factor);
            asteroid.planet_links.rearm(planet_id, frames);
        }
    }

    fn check_finite(&self) -> Result<(), SimulationError> {
        let planets = self.planets.values().map(|p| (p.id, &p.state));
        let asteroids = self.asteroids.values().map(|a| (a.id, &a.state));
        match planets.chain(asteroids).find(|(_, state)| !state.is_finite()) {
            Some((id, _)) => Err(SimulationError::NumericalBlowup { id }),
            None => Ok(()),
        }
    }
}

fn validate_planet_spec(spec: &PlanetSpec, star_size: f64) -> Result<(), SimulationError> {
    if !spec.mass.is_finite() || spec.mass <= 0.0 {
        return Err(ConfigError::NonPositive {
            field: "planet mass",
            value: spec.mass,
        }
        .into());
    }
    if !spec.size.is_finite() || spec.size < 0.0 {
        return Err(ConfigError::Negative {
            field: "planet size",
            value: spec.size,
        }
        .into());
    }
    if spec.distance + star_size == 0.0 {
        return Err(SimulationError::DegenerateGeometry);
    }
    Ok(())
}
