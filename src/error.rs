//! Error types for configuration and simulation commands.

use crate::types::BodyId;

/// A configuration value was rejected.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors returned by [`Simulation`](crate::simulation::Simulation) operations.
#[derive(thiserror::Error, Debug)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// A body was placed on the star's centre, where gravity is undefined.
    #[error("body position coincides with the star centre")]
    DegenerateGeometry,

    #[error("no live asteroid with id {0}")]
    UnknownBody(BodyId),

    #[error("asteroid {0} has already been launched")]
    AlreadyLaunched(BodyId),

    /// The tick produced a non-finite position or velocity and the simulation
    /// must be reset.
    #[error("numerical blow-up on body {id}")]
    NumericalBlowup { id: BodyId },
}
