use crate::error::{PortError, PortResult};
use crate::Axis;
use std::cell::Cell;

/// The signal program of the crossing, by phase index.
/// `None` means no movement is given right of way.
const PROGRAM: [Option<Axis>; 4] = [
    Some(Axis::NorthSouth),
    None,
    Some(Axis::EastWest),
    None,
];

/// The signal heads of a two-movement crossing.
#[derive(Clone, Debug)]
pub struct Signal {
    /// The movements, indexed by [movement_idx].
    movements: [Movement; 2],
    /// The number of frames a movement must be red before the
    /// conflicting movement is allowed to turn green.
    clearance: usize,
    /// The current phase of the program.
    phase: usize,
}

/// A single signal movement.
#[derive(Clone, Debug)]
struct Movement {
    /// The current state.
    state: LightState,
    /// The next state.
    next_state: Cell<LightState>,
    /// Whether the target state is green.
    active: bool,
    /// The number of frames since the current state was entered.
    since: usize,
    /// The duration of the amber phase in frames.
    amber_time: usize,
}

/// The state of a signal movement.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum LightState {
    Red,
    Amber,
    Green,
}

fn movement_idx(axis: Axis) -> usize {
    match axis {
        Axis::NorthSouth => 0,
        Axis::EastWest => 1,
    }
}

impl Signal {
    /// Creates an all-red signal.
    pub fn new(amber_time: usize, clearance: usize) -> Self {
        let movement = Movement {
            state: LightState::Red,
            next_state: Cell::new(LightState::Red),
            active: false,
            since: clearance,
            amber_time,
        };
        Self {
            movements: [movement.clone(), movement],
            clearance,
            phase: 1,
        }
    }

    /// Switches to a phase of the program. Movements losing right of way run
    /// through amber; the gaining movement turns green once the others have
    /// been red for the clearance time.
    pub fn set_phase(&mut self, phase: usize) -> PortResult<()> {
        let target = *PROGRAM.get(phase).ok_or(PortError::UnknownPhase(phase))?;
        for axis in Axis::ALL {
            self.movements[movement_idx(axis)].active = target == Some(axis);
        }
        self.phase = phase;
        Ok(())
    }

    /// The axis given right of way by a phase of the program, if any.
    pub fn favours(phase: usize) -> Option<Axis> {
        PROGRAM.get(phase).copied().flatten()
    }

    /// The phase most recently selected.
    pub fn phase(&self) -> usize {
        self.phase
    }

    /// The state of the movement serving an axis.
    pub fn state(&self, axis: Axis) -> LightState {
        self.movements[movement_idx(axis)].state
    }

    pub fn is_green(&self, axis: Axis) -> bool {
        self.state(axis) == LightState::Green
    }

    /// Advances the signal timing by one frame.
    pub fn step(&mut self) {
        for (idx, movement) in self.movements.iter().enumerate() {
            use LightState::*;
            let next = match (movement.active, movement.state) {
                (false, Green) => Amber,
                (false, Amber) if movement.since >= movement.amber_time => Red,
                (true, Amber) => Green,
                (true, Red) if self.can_turn_green(idx) => Green,
                (_, state) => state,
            };
            movement.next_state.set(next);
        }
        for movement in &mut self.movements {
            movement.step();
        }
    }

    /// Checks that a movement is not blocked by the conflicting movement.
    fn can_turn_green(&self, movement: usize) -> bool {
        let other = &self.movements[1 - movement];
        other.state == LightState::Red && other.since >= self.clearance
    }
}

impl Movement {
    fn step(&mut self) {
        if self.next_state.get() != self.state {
            self.state = self.next_state.get();
            self.since = 1;
        } else {
            self.since += 1;
        }
    }
}
