//! Travel axes through the intersection and the rule mapping vehicles onto them.

use crate::VehicleId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two orthogonal travel directions through the intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Longitudinal traffic, travelling "up" or "down".
    NorthSouth,
    /// Lateral traffic, travelling "left" or "right".
    EastWest,
}

impl Axis {
    /// Both axes, north-south first.
    pub const ALL: [Axis; 2] = [Axis::NorthSouth, Axis::EastWest];

    /// The axis perpendicular to this one.
    pub fn orthogonal(self) -> Self {
        match self {
            Axis::NorthSouth => Axis::EastWest,
            Axis::EastWest => Axis::NorthSouth,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::NorthSouth => "north-south",
            Axis::EastWest => "east-west",
        })
    }
}

/// Infers the travel axis of a vehicle.
///
/// Implementations must be pure: the same identifier always maps to the same axis.
pub trait AxisOf {
    fn axis_of(&self, id: &VehicleId) -> Axis;
}

impl<F> AxisOf for F
where
    F: Fn(&VehicleId) -> Axis,
{
    fn axis_of(&self, id: &VehicleId) -> Axis {
        self(id)
    }
}

/// Infers the axis from the route name embedded in a vehicle identifier,
/// e.g. `"up_12"` or `"left_3"`.
///
/// Identifiers containing `up` or `down` are north-south.
/// Everything else, including unrecognised names, is east-west.
#[derive(Clone, Copy, Debug, Default)]
pub struct RouteNameAxis;

impl RouteNameAxis {
    const NORTH_SOUTH: [&'static str; 2] = ["up", "down"];
}

impl AxisOf for RouteNameAxis {
    fn axis_of(&self, id: &VehicleId) -> Axis {
        if Self::NORTH_SOUTH.iter().any(|route| id.as_str().contains(route)) {
            Axis::NorthSouth
        } else {
            Axis::EastWest
        }
    }
}
