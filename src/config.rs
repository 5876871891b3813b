//! Controller configuration.

use crate::error::{ConfigError, ConfigResult};
use crate::math::Point2d;
use crate::Axis;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The signal phases which give right of way to each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseMap {
    pub north_south: usize,
    pub east_west: usize,
}

impl PhaseMap {
    /// The phase favouring the given axis.
    pub fn phase_for(&self, axis: Axis) -> usize {
        match axis {
            Axis::NorthSouth => self.north_south,
            Axis::EastWest => self.east_west,
        }
    }

    /// The axis favoured by the given phase, if any.
    pub fn axis_for(&self, phase: usize) -> Option<Axis> {
        Axis::ALL.into_iter().find(|axis| self.phase_for(*axis) == phase)
    }
}

impl Default for PhaseMap {
    /// Green phases of the program `[NS green, NS amber, EW green, EW amber]`.
    fn default() -> Self {
        Self {
            north_south: 0,
            east_west: 2,
        }
    }
}

/// The parameters of a [Controller](crate::Controller). Fixed for the lifetime of a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// The ID of the controlled intersection.
    pub intersection: String,
    /// The centre of the intersection in world space.
    pub centre: Point2d,
    /// The proximity radius in m.
    pub radius: f64,
    /// The number of ticks a leader is held before a forced re-election.
    pub dwell_ticks: i64,
    pub phases: PhaseMap,
    /// An axis whose phase is commanded once before the first tick.
    /// A first leader on this axis is then elected without repeating the command.
    pub initial_axis: Option<Axis>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            intersection: "0".to_owned(),
            centre: Point2d::new(510.0, 510.0),
            radius: 100.0,
            dwell_ticks: 60,
            phases: PhaseMap::default(),
            initial_axis: None,
        }
    }
}

impl ControllerConfig {
    /// Parses and validates a JSON configuration. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Checks that the configuration describes a usable controller.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "radius must be positive, got {}",
                self.radius
            )));
        }
        if self.dwell_ticks <= 0 {
            return Err(ConfigError::Invalid(format!(
                "dwell_ticks must be positive, got {}",
                self.dwell_ticks
            )));
        }
        if self.phases.north_south == self.phases.east_west {
            return Err(ConfigError::Invalid(
                "both axes are mapped to the same phase".to_owned(),
            ));
        }
        Ok(())
    }
}
