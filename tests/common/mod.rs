//! Simulation ports for driving the controller from tests.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use traffic_leader::math::Point2d;
use traffic_leader::{PortError, SimulationPort, VehicleId};

type PortResult<T> = Result<T, PortError>;

/// The changes a [ScriptedPort] applies on one step.
#[derive(Default)]
pub struct Frame {
    pub departed: Vec<(&'static str, Point2d)>,
    pub arrived: Vec<&'static str>,
    pub moved: Vec<(&'static str, Point2d)>,
}

/// A port which replays a fixed script of frames.
#[derive(Default)]
pub struct ScriptedPort {
    frames: VecDeque<Frame>,
    positions: BTreeMap<VehicleId, Point2d>,
    departed: BTreeSet<VehicleId>,
    arrived: BTreeSet<VehicleId>,
    /// Vehicles whose position lookups fail.
    pub stale: BTreeSet<VehicleId>,
    /// Every phase command received, as `(intersection, phase)`.
    pub commands: Vec<(String, usize)>,
    pub ticks: usize,
    pub closed: bool,
    /// Makes the step with this index fail as if the connection dropped.
    pub disconnect_at: Option<usize>,
}

impl ScriptedPort {
    pub fn new(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            ..Default::default()
        }
    }

    /// A port with vehicles already present and no script.
    pub fn with_vehicles(vehicles: &[(&str, Point2d)]) -> Self {
        let mut port = Self::default();
        for (id, pos) in vehicles {
            port.place(id, *pos);
        }
        port
    }

    pub fn place(&mut self, id: &str, pos: Point2d) {
        self.positions.insert(id.into(), pos);
    }

    pub fn remove(&mut self, id: &str) {
        self.positions.remove(&VehicleId::from(id));
    }

    pub fn phases(&self) -> Vec<usize> {
        self.commands.iter().map(|(_, phase)| *phase).collect()
    }
}

impl SimulationPort for ScriptedPort {
    fn step(&mut self) -> PortResult<()> {
        if self.closed {
            return Err(PortError::Closed);
        }
        if self.disconnect_at == Some(self.ticks) {
            return Err(PortError::Disconnected("connection reset".to_owned()));
        }
        self.ticks += 1;
        self.departed.clear();
        self.arrived.clear();
        if let Some(frame) = self.frames.pop_front() {
            for (id, pos) in frame.departed {
                self.positions.insert(id.into(), pos);
                self.departed.insert(id.into());
            }
            for (id, pos) in frame.moved {
                self.positions.insert(id.into(), pos);
            }
            for id in frame.arrived {
                self.positions.remove(&VehicleId::from(id));
                self.arrived.insert(id.into());
            }
        }
        Ok(())
    }

    fn departed_ids(&mut self) -> PortResult<BTreeSet<VehicleId>> {
        Ok(self.departed.clone())
    }

    fn arrived_ids(&mut self) -> PortResult<BTreeSet<VehicleId>> {
        Ok(self.arrived.clone())
    }

    fn position_of(&mut self, id: &VehicleId) -> PortResult<Point2d> {
        if self.stale.contains(id) {
            return Err(PortError::Unresolvable(id.clone()));
        }
        self.positions
            .get(id)
            .copied()
            .ok_or_else(|| PortError::Unresolvable(id.clone()))
    }

    fn set_phase(&mut self, intersection: &str, phase: usize) -> PortResult<()> {
        self.commands.push((intersection.to_owned(), phase));
        Ok(())
    }

    fn expected_count(&mut self) -> PortResult<usize> {
        Ok(self.positions.len() + self.frames.len())
    }

    fn close(&mut self) -> PortResult<()> {
        self.closed = true;
        Ok(())
    }
}

/// Wraps a port, recording the phase commands passed through it.
pub struct Recording<P> {
    pub inner: P,
    pub phases: Vec<usize>,
}

impl<P> Recording<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            phases: vec![],
        }
    }
}

impl<P: SimulationPort> SimulationPort for Recording<P> {
    fn step(&mut self) -> PortResult<()> {
        self.inner.step()
    }

    fn departed_ids(&mut self) -> PortResult<BTreeSet<VehicleId>> {
        self.inner.departed_ids()
    }

    fn arrived_ids(&mut self) -> PortResult<BTreeSet<VehicleId>> {
        self.inner.arrived_ids()
    }

    fn position_of(&mut self, id: &VehicleId) -> PortResult<Point2d> {
        self.inner.position_of(id)
    }

    fn set_phase(&mut self, intersection: &str, phase: usize) -> PortResult<()> {
        self.phases.push(phase);
        self.inner.set_phase(intersection, phase)
    }

    fn expected_count(&mut self) -> PortResult<usize> {
        self.inner.expected_count()
    }

    fn close(&mut self) -> PortResult<()> {
        self.inner.close()
    }
}

/// A point at `dist` m from the default centre along an arm.
pub fn east_of_centre(dist: f64) -> Point2d {
    Point2d::new(510.0 + dist, 510.0)
}

pub fn north_of_centre(dist: f64) -> Point2d {
    Point2d::new(510.0, 510.0 + dist)
}
