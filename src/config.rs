//! Runtime-tunable simulation parameters.
//!
//! [`SimulationConfig`] is a Bevy [`Resource`] holding every scalar the
//! control layer can adjust between ticks. Values can be loaded from a TOML
//! file; missing keys keep their defaults, so a file only needs the values
//! it overrides.
//!
//! Validation happens when a configuration is applied to a running
//! [`Simulation`](crate::simulation::Simulation): a rejected configuration
//! leaves the previous values in place.

use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::REFERENCE_STAR_MASS;

/// Simulation parameters supplied by the configuration layer.
#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Star radius in scene units.
    pub star_size: f64,
    /// Star mass in Earth masses.
    pub star_mass: f64,
    /// Multiplier applied to planet radii for collision distances.
    pub planet_size_scale: f64,
    /// Mass of every asteroid in Earth masses.
    pub asteroid_mass: f64,
    /// Multiplier on the gravity asteroids feel.
    pub asteroid_gravity_sensitivity: f64,
    /// Multiplier on planet gravity and on the check-rate boost it triggers.
    pub planet_gravity_factor: f64,
    /// Star brightness. Only the rendering layer reads this.
    pub star_luminosity: f64,
    /// Seed for the neighbor scheduler's initial spread.
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            star_size: 0.4,
            star_mass: REFERENCE_STAR_MASS,
            planet_size_scale: 2.0,
            asteroid_mass: 1.0,
            asteroid_gravity_sensitivity: 10.0,
            planet_gravity_factor: 100.0,
            star_luminosity: 5.0,
            seed: 0x5eed,
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Check every value is in its legal range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("star_size", self.star_size)?;
        positive("star_mass", self.star_mass)?;
        positive("planet_size_scale", self.planet_size_scale)?;
        positive("asteroid_mass", self.asteroid_mass)?;
        non_negative("asteroid_gravity_sensitivity", self.asteroid_gravity_sensitivity)?;
        non_negative("planet_gravity_factor", self.planet_gravity_factor)?;
        non_negative("star_luminosity", self.star_luminosity)?;
        Ok(())
    }

    /// Whether planet orbits should be stabilized at this star mass.
    pub fn is_reference_star_mass(&self) -> bool {
        (self.star_mass - REFERENCE_STAR_MASS).abs() < 1e-9
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}
