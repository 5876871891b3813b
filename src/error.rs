//! Error types.

use crate::{Axis, VehicleId};
use thiserror::Error;

/// A failure reported by a [SimulationPort](crate::SimulationPort).
#[derive(Debug, Error)]
pub enum PortError {
    /// The vehicle is not (or no longer) known to the simulation.
    #[error("vehicle {0} cannot be resolved")]
    Unresolvable(VehicleId),

    #[error("intersection {0:?} does not exist")]
    UnknownIntersection(String),

    #[error("phase {0} is not part of the signal program")]
    UnknownPhase(usize),

    #[error("phase {phase} does not give right of way to {axis} traffic")]
    PhaseMismatch { phase: usize, axis: Axis },

    /// The port was used after [close](crate::SimulationPort::close).
    #[error("simulation connection is closed")]
    Closed,

    #[error("lost connection to the simulation: {0}")]
    Disconnected(String),
}

pub type PortResult<T> = Result<T, PortError>;

/// A failed ranking query.
#[derive(Debug, Error)]
pub enum RankError {
    /// Nothing qualified: the input was empty, every vehicle was filtered out,
    /// or no position could be resolved.
    #[error("no vehicle qualifies for ranking")]
    NoCandidate,

    #[error(transparent)]
    Port(#[from] PortError),
}

pub type RankResult<T> = Result<T, RankError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
