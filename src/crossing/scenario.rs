use crate::error::{ConfigError, ConfigResult};
use crate::math::Vector2d;
use crate::{Axis, AxisOf, RouteNameAxis, VehicleId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// A route straight through the crossing, named by direction of travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Right,
    Left,
    Up,
    Down,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Right, Route::Left, Route::Up, Route::Down];

    pub fn axis(self) -> Axis {
        match self {
            Route::Right | Route::Left => Axis::EastWest,
            Route::Up | Route::Down => Axis::NorthSouth,
        }
    }

    /// A unit vector in the direction of travel.
    pub fn direction(self) -> Vector2d {
        match self {
            Route::Right => Vector2d::new(1.0, 0.0),
            Route::Left => Vector2d::new(-1.0, 0.0),
            Route::Up => Vector2d::new(0.0, 1.0),
            Route::Down => Vector2d::new(0.0, -1.0),
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

fn default_speed() -> f64 {
    13.9
}

/// A vehicle due to enter the crossing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Departure {
    pub id: VehicleId,
    pub route: Route,
    /// The tick at which the vehicle is due to depart.
    pub depart: usize,
    /// The cruising speed in m/s.
    #[serde(default = "default_speed")]
    pub speed: f64,
}

/// The traffic demand for a crossing simulation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub departures: Vec<Departure>,
}

impl Scenario {
    /// Parses and validates a JSON scenario.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Checks that vehicle IDs are unique and speeds are positive.
    pub fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        for departure in &self.departures {
            if !seen.insert(&departure.id) {
                return Err(ConfigError::Invalid(format!(
                    "vehicle {} departs more than once",
                    departure.id
                )));
            }
            if !(departure.speed.is_finite() && departure.speed > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "vehicle {} has non-positive speed {}",
                    departure.id, departure.speed
                )));
            }
        }
        Ok(())
    }

    /// An axis rule which reads each vehicle's route from the scenario.
    pub fn route_axes(&self) -> RouteAxes {
        RouteAxes {
            routes: self
                .departures
                .iter()
                .map(|departure| (departure.id.clone(), departure.route))
                .collect(),
        }
    }
}

/// Infers vehicle axes from route metadata, falling back to [RouteNameAxis]
/// for vehicles the scenario does not mention.
#[derive(Clone, Debug, Default)]
pub struct RouteAxes {
    routes: HashMap<VehicleId, Route>,
}

impl AxisOf for RouteAxes {
    fn axis_of(&self, id: &VehicleId) -> Axis {
        match self.routes.get(id) {
            Some(route) => route.axis(),
            None => RouteNameAxis.axis_of(id),
        }
    }
}
