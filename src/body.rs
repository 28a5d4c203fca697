//! Capabilities shared by every simulated body, and the star.

use bevy::math::DVec3;

use crate::types::{BodyId, BodyKind};

/// Read-only view of a simulated body.
///
/// The rendering layer iterates bodies through this trait; the gravity model
/// uses it to treat the star and planets uniformly as attractors.
pub trait Body {
    fn id(&self) -> BodyId;
    fn kind(&self) -> BodyKind;
    fn position(&self) -> DVec3;
    fn velocity(&self) -> DVec3;
    /// Mass in Earth masses. Always positive.
    fn mass(&self) -> f64;
    /// Radius used for collision thresholds.
    fn size(&self) -> f64;
    /// Dead bodies are skipped by every later tick and purged.
    fn is_alive(&self) -> bool;
}

/// The central star. Fixed at the origin, never moves and is never destroyed.
#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub size: f64,
    pub mass: f64,
    /// Brightness for the rendering layer; no physical effect.
    pub luminosity: f64,
}

impl Star {
    pub fn new(size: f64, mass: f64, luminosity: f64) -> Self {
        Self {
            size,
            mass,
            luminosity,
        }
    }
}

impl Body for Star {
    fn id(&self) -> BodyId {
        BodyId::STAR
    }

    fn kind(&self) -> BodyKind {
        BodyKind::Star
    }

    fn position(&self) -> DVec3 {
        DVec3::ZERO
    }

    fn velocity(&self) -> DVec3 {
        DVec3::ZERO
    }

    fn mass(&self) -> f64 {
        self.mass
    }

    fn size(&self) -> f64 {
        self.size
    }

    fn is_alive(&self) -> bool {
        true
    }
}
