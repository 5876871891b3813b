//! The boundary between the controller and the traffic simulation it drives.

use crate::error::PortResult;
use crate::math::Point2d;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifies a vehicle for as long as it is part of the simulation.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(String);

impl VehicleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VehicleId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for VehicleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A traffic simulation that can be stepped, observed and signalled.
///
/// Every method may fail with [PortError::Disconnected](crate::PortError::Disconnected)
/// if the simulation can no longer be reached; such failures are fatal to the control loop.
pub trait SimulationPort {
    /// Advances simulated time by one tick, blocking until the tick has been computed.
    fn step(&mut self) -> PortResult<()>;

    /// The vehicles which entered the simulation during the last tick.
    fn departed_ids(&mut self) -> PortResult<BTreeSet<VehicleId>>;

    /// The vehicles which reached their destination during the last tick.
    fn arrived_ids(&mut self) -> PortResult<BTreeSet<VehicleId>>;

    /// The current position of a vehicle.
    /// Fails with [PortError::Unresolvable](crate::PortError::Unresolvable)
    /// if the vehicle is not in the simulation.
    fn position_of(&mut self, id: &VehicleId) -> PortResult<Point2d>;

    /// Switches the signal program of an intersection to the given phase.
    fn set_phase(&mut self, intersection: &str, phase: usize) -> PortResult<()>;

    /// The number of vehicles currently present plus those still waiting to depart.
    fn expected_count(&mut self) -> PortResult<usize>;

    /// Releases the connection to the simulation.
    fn close(&mut self) -> PortResult<()>;
}
