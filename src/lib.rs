pub use axis::{Axis, AxisOf, RouteNameAxis};
pub use cgmath;
pub use config::{ControllerConfig, PhaseMap};
pub use controller::{Controller, ControllerState, Leader, PhaseCommand, Transition};
pub use driver::{ControlLoop, RunReport};
pub use error::{ConfigError, PortError, RankError};
pub use population::ActivePopulation;
pub use port::{SimulationPort, VehicleId};
pub use ranker::{ProximityRanker, Ranked};

mod axis;
mod config;
mod controller;
pub mod crossing;
mod driver;
pub mod error;
pub mod math;
mod population;
mod port;
mod ranker;
