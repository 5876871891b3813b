//! An in-process simulation of a signalised four-arm crossing.

use crate::error::{PortError, PortResult};
use crate::math::Point2d;
use crate::{Axis, PhaseMap, SimulationPort, VehicleId};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use std::collections::{BTreeSet, HashMap, VecDeque};

pub use scenario::{Departure, Route, RouteAxes, Scenario};
pub use signal::{LightState, Signal};

mod scenario;
mod signal;

new_key_type! {
    /// Unique key of a [Car].
    struct CarKey;
}

/// The geometry and timing of a crossing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossingAttributes {
    /// The ID of the crossing's signal.
    pub intersection: String,
    /// The centre of the crossing in world space.
    pub centre: Point2d,
    /// The length of each arm, from its end to the centre, in m.
    pub arm_length: f64,
    /// The distance from the stop line to the centre in m.
    pub stopline: f64,
    /// The minimum distance between the centres of consecutive vehicles in m.
    pub min_gap: f64,
    /// The duration of a tick in s.
    pub dt: f64,
    /// The duration of the amber phase in ticks.
    pub amber_ticks: usize,
    /// The all-red clearance time in ticks.
    pub clearance_ticks: usize,
}

impl Default for CrossingAttributes {
    fn default() -> Self {
        Self {
            intersection: "0".to_owned(),
            centre: Point2d::new(510.0, 510.0),
            arm_length: 500.0,
            stopline: 12.0,
            min_gap: 7.5,
            dt: 1.0,
            amber_ticks: 3,
            clearance_ticks: 2,
        }
    }
}

/// A simulated vehicle.
#[derive(Clone, Debug)]
struct Car {
    id: VehicleId,
    route: Route,
    /// The cruising speed in m/s.
    speed: f64,
    /// The distance travelled along the route in m.
    pos: f64,
}

/// A simulated crossing, driven through its [SimulationPort] implementation.
pub struct CrossingSim {
    attribs: CrossingAttributes,
    signal: Signal,
    cars: SlotMap<CarKey, Car>,
    keys: HashMap<VehicleId, CarKey>,
    /// The cars on each route, front first.
    lanes: [Vec<CarKey>; 4],
    /// Departures not yet inserted, in departure order.
    pending: VecDeque<Departure>,
    /// The current tick.
    tick: usize,
    departed: BTreeSet<VehicleId>,
    arrived: BTreeSet<VehicleId>,
    closed: bool,
}

impl CrossingSim {
    /// Creates a simulation which will release the scenario's departures as they fall due.
    pub fn new(attribs: CrossingAttributes, scenario: &Scenario) -> Self {
        let mut pending: Vec<_> = scenario.departures.clone();
        pending.sort_by_key(|departure| departure.depart);
        Self {
            signal: Signal::new(attribs.amber_ticks, attribs.clearance_ticks),
            attribs,
            cars: SlotMap::with_key(),
            keys: HashMap::new(),
            lanes: Default::default(),
            pending: pending.into(),
            tick: 0,
            departed: BTreeSet::new(),
            arrived: BTreeSet::new(),
            closed: false,
        }
    }

    /// Checks that each axis is mapped to the phase of the program which
    /// gives it right of way. A controller driving any other phase would
    /// hold every approach at red indefinitely.
    pub fn check_phases(&self, phases: &PhaseMap) -> PortResult<()> {
        for axis in Axis::ALL {
            let phase = phases.phase_for(axis);
            if Signal::favours(phase) != Some(axis) {
                return Err(PortError::PhaseMismatch { phase, axis });
            }
        }
        Ok(())
    }

    /// Gets the current tick.
    pub fn tick(&self) -> usize {
        self.tick
    }

    pub fn signal(&self) -> &Signal {
        &self.signal
    }

    /// The number of vehicles currently in the crossing.
    pub fn vehicle_count(&self) -> usize {
        self.cars.len()
    }

    /// The position along the route of the stop line, in m.
    fn stopline_pos(&self) -> f64 {
        self.attribs.arm_length - self.attribs.stopline
    }

    /// The position along the route at which vehicles leave the crossing, in m.
    fn exit_pos(&self) -> f64 {
        2.0 * self.attribs.arm_length
    }

    fn world_pos(&self, car: &Car) -> Point2d {
        let start = self.attribs.centre - car.route.direction() * self.attribs.arm_length;
        start + car.route.direction() * car.pos
    }

    fn check_open(&self) -> PortResult<()> {
        if self.closed {
            Err(PortError::Closed)
        } else {
            Ok(())
        }
    }

    /// Moves every car forward, stopping at the stop line on red
    /// and behind the car in front.
    fn advance_cars(&mut self) {
        let stopline = self.stopline_pos();
        for route in Route::ALL {
            let green = self.signal.is_green(route.axis());
            let mut limit = f64::INFINITY;
            for key in &self.lanes[route.index()] {
                let car = &mut self.cars[*key];
                let mut target = car.pos + car.speed * self.attribs.dt;
                if !green && car.pos <= stopline {
                    target = target.min(stopline);
                }
                car.pos = target.min(limit).max(car.pos);
                limit = car.pos - self.attribs.min_gap;
            }
        }
    }

    /// Removes the cars which have driven off the end of their route.
    fn remove_exited(&mut self) {
        let exit = self.exit_pos();
        for lane in &mut self.lanes {
            let cars = &mut self.cars;
            let keys = &mut self.keys;
            let arrived = &mut self.arrived;
            lane.retain(|key| {
                if cars[*key].pos < exit {
                    return true;
                }
                if let Some(car) = cars.remove(*key) {
                    keys.remove(&car.id);
                    arrived.insert(car.id);
                }
                false
            });
        }
    }

    /// Inserts the departures which are due, as long as there is room at the
    /// start of their route. Blocked departures wait for a later tick.
    fn insert_due(&mut self) {
        let mut waiting = VecDeque::new();
        while let Some(departure) = self.pending.front() {
            if departure.depart > self.tick {
                break;
            }
            let Some(departure) = self.pending.pop_front() else {
                break;
            };
            let lane = &self.lanes[departure.route.index()];
            let blocked = lane
                .last()
                .map_or(false, |key| self.cars[*key].pos < self.attribs.min_gap);
            if blocked {
                trace!("departure of {} delayed at tick {}", departure.id, self.tick);
                waiting.push_back(departure);
                continue;
            }
            let key = self.cars.insert(Car {
                id: departure.id.clone(),
                route: departure.route,
                speed: departure.speed,
                pos: 0.0,
            });
            self.lanes[departure.route.index()].push(key);
            self.keys.insert(departure.id.clone(), key);
            self.departed.insert(departure.id);
        }
        while let Some(departure) = waiting.pop_back() {
            self.pending.push_front(departure);
        }
    }
}

impl SimulationPort for CrossingSim {
    fn step(&mut self) -> PortResult<()> {
        self.check_open()?;
        self.departed.clear();
        self.arrived.clear();

        self.signal.step();
        self.advance_cars();
        self.remove_exited();
        self.insert_due();
        self.tick += 1;
        Ok(())
    }

    fn departed_ids(&mut self) -> PortResult<BTreeSet<VehicleId>> {
        self.check_open()?;
        Ok(self.departed.clone())
    }

    fn arrived_ids(&mut self) -> PortResult<BTreeSet<VehicleId>> {
        self.check_open()?;
        Ok(self.arrived.clone())
    }

    fn position_of(&mut self, id: &VehicleId) -> PortResult<Point2d> {
        self.check_open()?;
        let key = self
            .keys
            .get(id)
            .ok_or_else(|| PortError::Unresolvable(id.clone()))?;
        Ok(self.world_pos(&self.cars[*key]))
    }

    fn set_phase(&mut self, intersection: &str, phase: usize) -> PortResult<()> {
        self.check_open()?;
        if intersection != self.attribs.intersection {
            return Err(PortError::UnknownIntersection(intersection.to_owned()));
        }
        debug!("tick {}: signal {} to phase {}", self.tick, intersection, phase);
        self.signal.set_phase(phase)
    }

    fn expected_count(&mut self) -> PortResult<usize> {
        self.check_open()?;
        Ok(self.cars.len() + self.pending.len())
    }

    fn close(&mut self) -> PortResult<()> {
        self.closed = true;
        Ok(())
    }
}
