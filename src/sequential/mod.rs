//! Sequential circuits.
//!
//! Elements that hold one or more bits of state between calls:
//! - Latches: [`NorSrLatch`], [`NandSrLatch`], [`DLatch`] (level-sensitive)
//! - Flip-flops: [`MasterSlaveDFlipFlop`], [`JkFlipFlop`], [`TFlipFlop`]
//! - Composites: [`Counter4Bit`], [`ShiftRegister4Bit`]
//!
//! State changes only inside `update`/`clock` calls; reading an output never
//! mutates anything.

mod counter;
mod flipflop;
mod latch;
mod shift;

pub use counter::{CountMode, Counter4Bit};
pub use flipflop::{ClockEdge, JkAction, JkFlipFlop, MasterSlaveDFlipFlop, TFlipFlop};
pub use latch::{DLatch, LatchCondition, NandSrLatch, NorSrLatch};
pub use shift::ShiftRegister4Bit;

/// Common interface of every single-output storage element.
pub trait Sequential {
    /// The Q output.
    fn q(&self) -> bool;

    /// The inverted output. Latches in an invalid state may report the same
    /// level on both outputs, so this is not always `!q()`.
    fn q_not(&self) -> bool {
        !self.q()
    }

    /// Return to the power-on state.
    fn reset(&mut self);
}

/// An edge-triggered element: state changes only when `clock` is called.
pub trait Clocked: Sequential {
    /// Apply one active clock edge using the staged inputs.
    fn clock(&mut self);
}
