//! Flip-flops.
//!
//! - [`MasterSlaveDFlipFlop`]: two [`DLatch`]es gated by opposite clock levels
//! - [`JkFlipFlop`]: set/reset/toggle/hold on each clock
//! - [`TFlipFlop`]: toggle on each clock when T is high

use serde::{Serialize, Deserialize};
use crate::sequential::{Clocked, DLatch, Sequential};

/// A clock transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockEdge {
    /// Clock goes high.
    Rising,
    /// Clock goes low.
    Falling,
}

impl ClockEdge {
    /// Clock level after the transition.
    pub const fn level(self) -> bool {
        matches!(self, ClockEdge::Rising)
    }
}

/// Master-slave D flip-flop.
///
/// While the clock is high the master latch is transparent and the slave
/// holds; while it is low the master holds and the slave copies it. The
/// visible output Q therefore changes only on the falling edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MasterSlaveDFlipFlop {
    master: DLatch,
    slave: DLatch,
}

impl MasterSlaveDFlipFlop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive D and the clock level, master first, then slave.
    ///
    /// Call once per clock-level change. Prefer [`clock`](Self::clock),
    /// which names the transition being simulated.
    pub fn update(&mut self, d: bool, clk: bool) {
        self.master.update(d, clk);
        self.slave.update(self.master.q(), !clk);
    }

    /// Apply one clock transition with data input `d`.
    pub fn clock(&mut self, d: bool, edge: ClockEdge) {
        self.update(d, edge.level());
    }

    /// A full clock period: rising edge then falling edge, both with `d`.
    pub fn pulse(&mut self, d: bool) {
        self.clock(d, ClockEdge::Rising);
        self.clock(d, ClockEdge::Falling);
    }

    /// Output of the master latch (Qm).
    pub fn master_q(&self) -> bool {
        self.master.q()
    }
}

impl Sequential for MasterSlaveDFlipFlop {
    fn q(&self) -> bool {
        self.slave.q()
    }

    fn q_not(&self) -> bool {
        self.slave.q_not()
    }

    fn reset(&mut self) {
        self.master.reset();
        self.slave.reset();
    }
}

/// What a JK flip-flop did on a clock edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JkAction {
    Hold,
    Reset,
    Set,
    Toggle,
}

impl JkAction {
    /// Action selected by the J and K inputs.
    pub const fn from_inputs(j: bool, k: bool) -> Self {
        match (j, k) {
            (false, false) => JkAction::Hold,
            (false, true) => JkAction::Reset,
            (true, false) => JkAction::Set,
            (true, true) => JkAction::Toggle,
        }
    }

    /// Next Q given the current one.
    pub const fn next(self, q: bool) -> bool {
        match self {
            JkAction::Hold => q,
            JkAction::Reset => false,
            JkAction::Set => true,
            JkAction::Toggle => !q,
        }
    }
}

/// Edge-triggered JK flip-flop.
///
/// Inputs are staged with [`set_inputs`](Self::set_inputs) and only acted
/// on by [`clock`](Self::clock).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JkFlipFlop {
    q: bool,
    j: bool,
    k: bool,
}

impl JkFlipFlop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage J and K. Q is unchanged.
    pub fn set_inputs(&mut self, j: bool, k: bool) {
        self.j = j;
        self.k = k;
    }

    /// Apply the staged inputs and report what happened.
    pub fn tick(&mut self) -> JkAction {
        let action = JkAction::from_inputs(self.j, self.k);
        self.q = action.next(self.q);
        action
    }
}

impl Sequential for JkFlipFlop {
    fn q(&self) -> bool {
        self.q
    }

    /// Clears Q and the staged inputs.
    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Clocked for JkFlipFlop {
    fn clock(&mut self) {
        self.tick();
    }
}

/// Toggle flip-flop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TFlipFlop {
    q: bool,
    t: bool,
}

impl TFlipFlop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage T for the next clock.
    pub fn set_input(&mut self, t: bool) {
        self.t = t;
    }

    /// The staged T input.
    pub fn input(&self) -> bool {
        self.t
    }
}

impl Sequential for TFlipFlop {
    fn q(&self) -> bool {
        self.q
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Clocked for TFlipFlop {
    fn clock(&mut self) {
        if self.t {
            self.q = !self.q;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_slave_changes_on_falling_edge() {
        let mut ff = MasterSlaveDFlipFlop::new();

        ff.clock(true, ClockEdge::Rising);
        assert!(ff.master_q(), "master follows D while clock is high");
        assert!(!ff.q(), "slave holds while clock is high");

        ff.clock(true, ClockEdge::Falling);
        assert!(ff.q());
        assert!(!ff.q_not());
    }

    #[test]
    fn test_master_slave_ignores_d_while_low() {
        let mut ff = MasterSlaveDFlipFlop::new();
        ff.pulse(true);
        assert!(ff.q());

        // Clock stays low: master is opaque, D changes are invisible.
        ff.update(false, false);
        assert!(ff.q());
        assert!(ff.master_q());
    }

    #[test]
    fn test_master_slave_pulse_and_reset() {
        let mut ff = MasterSlaveDFlipFlop::new();
        ff.pulse(true);
        ff.pulse(false);
        assert!(!ff.q());
        ff.pulse(true);
        ff.reset();
        assert!(!ff.q());
        assert!(!ff.master_q());
    }

    #[test]
    fn test_jk_truth_table() {
        let expected = |j: bool, k: bool, q: bool| match (j, k) {
            (false, false) => q,
            (false, true) => false,
            (true, false) => true,
            (true, true) => !q,
        };

        for start in [false, true] {
            for j in [false, true] {
                for k in [false, true] {
                    let mut ff = JkFlipFlop::new();
                    if start {
                        ff.set_inputs(true, false);
                        ff.clock();
                    }
                    assert_eq!(ff.q(), start);

                    ff.set_inputs(j, k);
                    ff.clock();
                    assert_eq!(ff.q(), expected(j, k, start),
                        "J={} K={} Q(t)={}", j, k, start);
                }
            }
        }
    }

    #[test]
    fn test_jk_set_inputs_does_not_change_q() {
        let mut ff = JkFlipFlop::new();
        ff.set_inputs(true, false);
        assert!(!ff.q());
        assert_eq!(ff.tick(), JkAction::Set);
        ff.set_inputs(false, true);
        assert!(ff.q());
    }

    #[test]
    fn test_t_flip_flop() {
        let mut ff = TFlipFlop::new();
        ff.clock();
        assert!(!ff.q(), "T=0 holds");

        ff.set_input(true);
        ff.clock();
        assert!(ff.q());
        ff.clock();
        assert!(!ff.q());
    }

    #[test]
    fn test_t_reset_clears_staged_input() {
        let mut ff = TFlipFlop::new();
        ff.set_input(true);
        assert!(ff.input());
        assert!(!ff.q(), "staging T does not clock");

        ff.reset();
        assert!(!ff.input());
        ff.clock();
        assert!(!ff.q());
    }
}
