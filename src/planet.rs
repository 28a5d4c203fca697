//! Planet entities and the default solar-system layout.
//!
//! Planets orbit the star in the XZ plane. While the star has its reference
//! mass and nothing has hit them, their orbits are held circular by the
//! orbit stabilizer; any collision clears that flag for good.

use bevy::math::DVec3;

use crate::body::Body;
use crate::scheduler::NeighborSet;
use crate::types::{BodyId, BodyKind, BodyState};

/// Static description of a planet, used to build the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlanetSpec {
    pub name: &'static str,
    /// Radius in scene units before the size scale is applied.
    pub size: f64,
    /// Distance from the star's surface along +x.
    pub distance: f64,
    /// Orbital period in days; sets the initial speed to `10 / period`.
    pub period_days: f64,
    /// Spin per tick around each axis.
    pub spin: DVec3,
    /// Mass relative to Earth.
    pub mass: f64,
}

impl PlanetSpec {
    /// Initial state for a star of radius `star_size`.
    pub fn initial_state(&self, star_size: f64) -> BodyState {
        BodyState::new(
            DVec3::new(self.distance + star_size, 0.0, 0.0),
            DVec3::new(0.0, 0.0, -(10.0 / self.period_days)),
            self.mass,
        )
    }
}

/// The eight planets of the default scene, innermost first.
pub static SOLAR_SYSTEM: &[PlanetSpec] = &[
    MERCURY, VENUS, EARTH, MARS, JUPITER, SATURN, URANUS, NEPTUNE,
];

pub const MERCURY: PlanetSpec = PlanetSpec {
    name: "mercury",
    size: 0.0349,
    distance: 0.8,
    period_days: 938.0,
    spin: DVec3::new(0.0, 0.00017, 0.0),
    mass: 0.055,
};

pub const VENUS: PlanetSpec = PlanetSpec {
    name: "venus",
    size: 0.055,
    distance: 1.44,
    period_days: 1559.0,
    spin: DVec3::new(0.0, 0.000041, 0.0),
    mass: 0.815,
};

pub const EARTH: PlanetSpec = PlanetSpec {
    name: "earth",
    size: 0.05644,
    distance: 2.0,
    period_days: 1910.0,
    spin: DVec3::new(0.0, 0.01, 0.0),
    mass: 1.0,
};

pub const MARS: PlanetSpec = PlanetSpec {
    name: "mars",
    size: 0.0412,
    distance: 3.04,
    period_days: 2621.0,
    spin: DVec3::new(0.0, 0.01, 0.0),
    mass: 0.107,
};

pub const JUPITER: PlanetSpec = PlanetSpec {
    name: "jupiter",
    size: 0.1889,
    distance: 6.2,
    period_days: 6583.0,
    spin: DVec3::new(0.0, 0.024, 0.0),
    mass: 316.0,
};

pub const SATURN: PlanetSpec = PlanetSpec {
    name: "saturn",
    size: 0.1706,
    distance: 9.5,
    period_days: 10373.0,
    spin: DVec3::new(0.0, 0.0229, 0.0),
    mass: 95.0,
};

pub const URANUS: PlanetSpec = PlanetSpec {
    name: "uranus",
    size: 0.1126,
    distance: 13.0,
    period_days: 17517.0,
    spin: DVec3::new(0.0, 0.0141, 0.0),
    mass: 14.53,
};

pub const NEPTUNE: PlanetSpec = PlanetSpec {
    name: "neptune",
    size: 0.1105,
    distance: 17.0,
    period_days: 24500.0,
    spin: DVec3::new(0.0, 0.015, 0.0),
    mass: 17.15,
};

/// A planet in the running simulation.
#[derive(Clone, Debug)]
pub struct Planet {
    pub id: BodyId,
    /// Slot in the scene's planet list, for the rendering layer's per-planet
    /// assets. Collisions and neighbor links are keyed on `id`.
    pub index: usize,
    pub name: &'static str,
    pub size: f64,
    pub state: BodyState,
    /// Spin rate per tick around each axis.
    pub rotation: DVec3,
    /// Accumulated spin angles, for the rendering layer.
    pub orientation: DVec3,
    pub should_correct_orbit: bool,
    pub alive: bool,
    /// Scheduled checks against the other planets.
    pub planet_links: NeighborSet,
}

impl Planet {
    pub fn from_spec(
        id: BodyId,
        index: usize,
        spec: &PlanetSpec,
        star_size: f64,
        should_correct_orbit: bool,
    ) -> Self {
        Self {
            id,
            index,
            name: spec.name,
            size: spec.size,
            state: spec.initial_state(star_size),
            rotation: spec.spin,
            orientation: DVec3::ZERO,
            should_correct_orbit,
            alive: true,
            planet_links: NeighborSet::default(),
        }
    }

    /// Advance the spin angles by one tick.
    pub fn spin(&mut self) {
        self.orientation += self.rotation;
    }
}

impl Body for Planet {
    fn id(&self) -> BodyId {
        self.id
    }

    fn kind(&self) -> BodyKind {
        BodyKind::Planet
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
        self.size
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}
