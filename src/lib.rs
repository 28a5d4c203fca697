//! Stellar Sandbox - Star System Simulator
//!
//! A library crate providing the simulation core of an interactive star
//! system: planets on stabilized orbits, player-launched asteroids, adaptive
//! neighbor scheduling and collision resolution, plus a Bevy plugin that
//! drives it at a fixed timestep.

pub mod asteroid;
pub mod body;
pub mod collision;
pub mod config;
pub mod error;
pub mod physics;
pub mod planet;
pub mod scheduler;
pub mod simulation;
pub mod types;

#[cfg(test)]
pub mod test_utils;
