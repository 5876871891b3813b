use crate::controller::{ControllerState, Transition};
use crate::error::PortResult;
use crate::{ActivePopulation, AxisOf, Controller, SimulationPort};
use log::{debug, info};

/// A summary of a completed control run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunReport {
    /// The number of simulated ticks.
    pub ticks: usize,
    /// The number of leaders elected, including the first.
    pub elections: usize,
    /// The number of phase commands sent, including any initial phase.
    pub phase_commands: usize,
    pub final_state: ControllerState,
}

/// Drives a [Controller] from a [SimulationPort], one tick at a time.
pub struct ControlLoop<A> {
    controller: Controller<A>,
    population: ActivePopulation,
    state: ControllerState,
    ticks: usize,
    elections: usize,
    phase_commands: usize,
}

impl<A: AxisOf> ControlLoop<A> {
    pub fn new(controller: Controller<A>) -> Self {
        Self {
            controller,
            population: ActivePopulation::new(),
            state: ControllerState::Bootstrapping,
            ticks: 0,
            elections: 0,
            phase_commands: 0,
        }
    }

    pub fn controller(&self) -> &Controller<A> {
        &self.controller
    }

    pub fn population(&self) -> &ActivePopulation {
        &self.population
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Gets the number of ticks simulated so far.
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Runs until the simulation has no vehicles present or still to depart,
    /// then closes the port.
    ///
    /// The port is closed even if the run fails part way.
    pub fn run<P: SimulationPort + ?Sized>(&mut self, port: &mut P) -> PortResult<RunReport> {
        let result = self.run_to_completion(port);
        let closed = port.close();
        result.and_then(|report| closed.map(|_| report))
    }

    fn run_to_completion<P: SimulationPort + ?Sized>(
        &mut self,
        port: &mut P,
    ) -> PortResult<RunReport> {
        if let Some(axis) = self.controller.config().initial_axis {
            let config = self.controller.config();
            let phase = config.phases.phase_for(axis);
            info!("starting with phase {} ({})", phase, axis);
            port.set_phase(&config.intersection, phase)?;
            self.phase_commands += 1;
        }

        while port.expected_count()? > 0 {
            self.tick(port)?;
        }

        info!(
            "simulation drained after {} ticks, {} elections",
            self.ticks, self.elections
        );
        Ok(self.report())
    }

    /// Performs a single iteration: steps the simulation, refreshes the
    /// population, then lets the controller react.
    pub fn tick<P: SimulationPort + ?Sized>(&mut self, port: &mut P) -> PortResult<Transition> {
        port.step()?;
        self.ticks += 1;

        let departed = port.departed_ids()?;
        let arrived = port.arrived_ids()?;
        self.population.update(&departed, &arrived);

        let previous = self.state.leader().map(|leader| leader.id.clone());
        let state = std::mem::take(&mut self.state);
        let transition = self.controller.transition(state, &self.population, port)?;
        if transition.state.leader().map(|leader| &leader.id) != previous.as_ref() {
            self.elections += 1;
        }
        if transition.command.is_some() {
            self.phase_commands += 1;
        }
        if self.population.is_empty() && transition.state.leader().is_some() {
            debug!("tick {}: no vehicles present, holding leader", self.ticks);
        }
        self.state = transition.state.clone();
        Ok(transition)
    }

    /// A summary of the run so far.
    pub fn report(&self) -> RunReport {
        RunReport {
            ticks: self.ticks,
            elections: self.elections,
            phase_commands: self.phase_commands,
            final_state: self.state.clone(),
        }
    }
}
