use crate::error::{PortResult, RankError};
use crate::ranker::{ProximityRanker, Ranked};
use crate::{ActivePopulation, Axis, AxisOf, ControllerConfig, SimulationPort, VehicleId};
use log::{debug, info};

/// The vehicle currently favoured by the signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leader {
    pub id: VehicleId,
    pub axis: Axis,
}

/// The state of the leader election.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ControllerState {
    /// No vehicle has come within the proximity radius yet.
    #[default]
    Bootstrapping,
    /// A leader holds the signal.
    Tracking {
        leader: Leader,
        /// Ticks left before a forced re-election. May go negative while
        /// there is no vehicle on the perpendicular axis to hand over to.
        ticks_remaining: i64,
    },
}

impl ControllerState {
    /// The current leader, if there is one.
    pub fn leader(&self) -> Option<&Leader> {
        match self {
            ControllerState::Bootstrapping => None,
            ControllerState::Tracking { leader, .. } => Some(leader),
        }
    }
}

/// A signal phase command issued during a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseCommand {
    pub axis: Axis,
    pub phase: usize,
}

/// The result of one controller transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: ControllerState,
    /// The phase commanded this tick, if a leader was elected and the
    /// signal did not already favour its axis.
    pub command: Option<PhaseCommand>,
}

/// Elects leaders and switches the signal to favour them.
///
/// A leader keeps the signal until a vehicle on the perpendicular axis comes
/// within the proximity radius, or until it has held it for the dwell timeout.
/// Contention means a cross-axis vehicle strictly inside the radius; one
/// exactly on it, or further out, does not unseat the leader.
/// The leader's own distance is not consulted once it has been elected.
pub struct Controller<A> {
    config: ControllerConfig,
    ranker: ProximityRanker<A>,
}

impl<A: AxisOf> Controller<A> {
    /// Creates a controller using `axis_of` to infer the travel axis of vehicles.
    pub fn new(config: ControllerConfig, axis_of: A) -> Self {
        let ranker = ProximityRanker::new(config.centre, axis_of);
        Self { config, ranker }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn ranker(&self) -> &ProximityRanker<A> {
        &self.ranker
    }

    /// Advances the controller by one tick, given the vehicles currently present.
    ///
    /// Only a lost connection to the simulation is reported as an error.
    pub fn transition<P: SimulationPort + ?Sized>(
        &self,
        state: ControllerState,
        active: &ActivePopulation,
        port: &mut P,
    ) -> PortResult<Transition> {
        match state {
            ControllerState::Bootstrapping => self.bootstrap(active, port),
            ControllerState::Tracking {
                leader,
                ticks_remaining,
            } => self.track(leader, ticks_remaining, active, port),
        }
    }

    /// Elects the nearest vehicle as the first leader once it is within the radius.
    fn bootstrap<P: SimulationPort + ?Sized>(
        &self,
        active: &ActivePopulation,
        port: &mut P,
    ) -> PortResult<Transition> {
        let hold = Transition {
            state: ControllerState::Bootstrapping,
            command: None,
        };
        let nearest = match recover(self.ranker.nearest(port, active, None))? {
            Some(nearest) if nearest.dist < self.config.radius => nearest,
            Some(nearest) => {
                debug!(
                    "bootstrapping: nearest vehicle {} is {:.1} m out",
                    nearest.id, nearest.dist
                );
                return Ok(hold);
            }
            None => return Ok(hold),
        };

        let axis = self.ranker.axis_of(&nearest.id);
        info!(
            "first leader {} ({}) at {:.1} m",
            nearest.id, axis, nearest.dist
        );
        if self.config.initial_axis == Some(axis) {
            // The signal already favours this axis from startup.
            return Ok(Transition {
                state: self.tracking(nearest.id, axis),
                command: None,
            });
        }
        self.elect(nearest.id, axis, port)
    }

    /// Holds the current leader, or hands over to the perpendicular axis on
    /// contention or timeout.
    fn track<P: SimulationPort + ?Sized>(
        &self,
        leader: Leader,
        ticks_remaining: i64,
        active: &ActivePopulation,
        port: &mut P,
    ) -> PortResult<Transition> {
        let cross_axis = leader.axis.orthogonal();
        let contender = recover(self.ranker.nearest(port, active, Some(cross_axis)))?;
        let ticks_remaining = ticks_remaining - 1;

        let contended = contender
            .as_ref()
            .map_or(false, |contender| contender.dist < self.config.radius);
        let timed_out = ticks_remaining <= 0;

        match contender {
            Some(contender) if contended || timed_out => {
                info!(
                    "re-electing {} ({}) at {:.1} m, replacing {}{}",
                    contender.id,
                    cross_axis,
                    contender.dist,
                    leader.id,
                    if contended { "" } else { " after dwell timeout" },
                );
                self.elect(contender.id, cross_axis, port)
            }
            _ => {
                if timed_out {
                    debug!(
                        "dwell timeout for {} but no {} vehicle to hand over to",
                        leader.id, cross_axis
                    );
                }
                Ok(Transition {
                    state: ControllerState::Tracking {
                        leader,
                        ticks_remaining,
                    },
                    command: None,
                })
            }
        }
    }

    /// Installs a new leader and switches the signal to its axis.
    fn elect<P: SimulationPort + ?Sized>(
        &self,
        id: VehicleId,
        axis: Axis,
        port: &mut P,
    ) -> PortResult<Transition> {
        let command = PhaseCommand {
            axis,
            phase: self.config.phases.phase_for(axis),
        };
        port.set_phase(&self.config.intersection, command.phase)?;
        Ok(Transition {
            state: self.tracking(id, axis),
            command: Some(command),
        })
    }

    /// A freshly elected leader with the full dwell time ahead of it.
    fn tracking(&self, id: VehicleId, axis: Axis) -> ControllerState {
        ControllerState::Tracking {
            leader: Leader { id, axis },
            ticks_remaining: self.config.dwell_ticks,
        }
    }
}

/// Turns [RankError::NoCandidate] into `None`, passing connectivity failures through.
fn recover(result: Result<Ranked, RankError>) -> PortResult<Option<Ranked>> {
    match result {
        Ok(ranked) => Ok(Some(ranked)),
        Err(RankError::NoCandidate) => Ok(None),
        Err(RankError::Port(err)) => Err(err),
    }
}
