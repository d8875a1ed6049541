//! 4-bit synchronous up/down counter.
//!
//! Built from four T flip-flops. On each clock every toggle input is derived
//! from the same pre-clock snapshot of Q before any flip-flop is clocked, so
//! all bits change together instead of rippling.

use serde::{Serialize, Deserialize};
use tracing::{event, Level};
use crate::sequential::{Clocked, Sequential, TFlipFlop};
use crate::signal::Nibble;

/// Counting direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CountMode {
    #[default]
    Up,
    Down,
}

impl CountMode {
    /// The other direction.
    pub const fn flipped(self) -> Self {
        match self {
            CountMode::Up => CountMode::Down,
            CountMode::Down => CountMode::Up,
        }
    }
}

/// 4-bit synchronous binary counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counter4Bit {
    /// Stage 0 is the least significant bit.
    stages: [TFlipFlop; 4],
    mode: CountMode,
}

impl Counter4Bit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> CountMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CountMode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.flipped();
    }

    /// Toggle inputs for the next clock, computed from the current Q values.
    ///
    /// T0 is always 1. Counting up, Ti is the AND of all lower Q bits;
    /// counting down, the AND of all lower complemented Q bits.
    pub fn excitation(&self) -> [bool; 4] {
        let mut t = [true; 4];
        for i in 1..4 {
            let lower = &self.stages[..i];
            t[i] = match self.mode {
                CountMode::Up => lower.iter().all(|ff| ff.q()),
                CountMode::Down => lower.iter().all(|ff| ff.q_not()),
            };
        }
        t
    }

    /// Current count, 0-15.
    pub fn value(&self) -> Nibble {
        Nibble::from_bits(self.bits())
    }

    /// Q of each stage, LSB first.
    pub fn bits(&self) -> [bool; 4] {
        self.stages.map(|ff| ff.q())
    }
}

impl Sequential for Counter4Bit {
    /// Most significant bit.
    fn q(&self) -> bool {
        self.stages[3].q()
    }

    /// Clears every stage and returns to counting up.
    fn reset(&mut self) {
        *self = Self::default();
        event!(Level::DEBUG, "Counter reset");
    }
}

impl Clocked for Counter4Bit {
    fn clock(&mut self) {
        let t = self.excitation();
        let before = self.value();

        for (ff, t) in self.stages.iter_mut().zip(t) {
            ff.set_input(t);
        }
        for ff in &mut self.stages {
            ff.clock();
        }

        event!(Level::TRACE, "Counter {:?}: {} -> {}", self.mode, before.value(), self.value().value());
    }
}
