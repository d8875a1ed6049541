//! Level-sensitive latches.

use serde::{Serialize, Deserialize};
use crate::sequential::Sequential;

/// What an SR latch did with its last inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatchCondition {
    Set,
    Reset,
    Hold,
    /// Both controls asserted; both outputs forced to the same level.
    Invalid,
}

/// SR latch built from cross-coupled NOR gates. Inputs are active high.
///
/// | S | R | Result |
/// |---|---|--------|
/// | 0 | 0 | hold |
/// | 1 | 0 | set (Q=1) |
/// | 0 | 1 | reset (Q=0) |
/// | 1 | 1 | invalid (Q=Q'=0) |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NorSrLatch {
    q: bool,
    q_not: bool,
}

impl NorSrLatch {
    pub fn new() -> Self {
        Self { q: false, q_not: true }
    }

    pub fn update(&mut self, s: bool, r: bool) -> LatchCondition {
        let condition = match (s, r) {
            (true, true) => LatchCondition::Invalid,
            (true, false) => LatchCondition::Set,
            (false, true) => LatchCondition::Reset,
            (false, false) => LatchCondition::Hold,
        };

        match condition {
            LatchCondition::Invalid => (self.q, self.q_not) = (false, false),
            LatchCondition::Set => (self.q, self.q_not) = (true, false),
            LatchCondition::Reset => (self.q, self.q_not) = (false, true),
            LatchCondition::Hold => {}
        }
        condition
    }
}

impl Default for NorSrLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequential for NorSrLatch {
    fn q(&self) -> bool {
        self.q
    }

    fn q_not(&self) -> bool {
        self.q_not
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

/// SR latch built from cross-coupled NAND gates. Inputs are active low.
///
/// | S | R | Result |
/// |---|---|--------|
/// | 1 | 1 | hold |
/// | 0 | 1 | set (Q=1) |
/// | 1 | 0 | reset (Q=0) |
/// | 0 | 0 | invalid (Q=Q'=1) |
///
/// A fresh latch sits in the state produced by holding from power-on, where
/// both outputs read high until the first set or reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NandSrLatch {
    q: bool,
    q_not: bool,
}

impl NandSrLatch {
    pub fn new() -> Self {
        let mut latch = Self { q: true, q_not: true };
        latch.update(true, true);
        latch
    }

    pub fn update(&mut self, s: bool, r: bool) -> LatchCondition {
        let condition = match (s, r) {
            (false, false) => LatchCondition::Invalid,
            (false, true) => LatchCondition::Set,
            (true, false) => LatchCondition::Reset,
            (true, true) => LatchCondition::Hold,
        };

        match condition {
            LatchCondition::Invalid => (self.q, self.q_not) = (true, true),
            LatchCondition::Set => (self.q, self.q_not) = (true, false),
            LatchCondition::Reset => (self.q, self.q_not) = (false, true),
            LatchCondition::Hold => {}
        }
        condition
    }
}

impl Default for NandSrLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequential for NandSrLatch {
    fn q(&self) -> bool {
        self.q
    }

    fn q_not(&self) -> bool {
        self.q_not
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Gated D latch.
///
/// Transparent while `enable` is high (Q follows D), opaque while it is low.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DLatch {
    q: bool,
}

impl DLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, d: bool, enable: bool) {
        if enable {
            self.q = d;
        }
    }
}

impl Sequential for DLatch {
    fn q(&self) -> bool {
        self.q
    }

    fn reset(&mut self) {
        self.q = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nor_initial_state() {
        let latch = NorSrLatch::new();
        assert!(!latch.q());
        assert!(latch.q_not());
    }

    #[test]
    fn test_nor_set_then_hold() {
        let mut latch = NorSrLatch::new();
        assert_eq!(latch.update(true, false), LatchCondition::Set);
        assert_eq!(latch.update(false, false), LatchCondition::Hold);
        assert!(latch.q());
        assert!(!latch.q_not());
    }

    #[test]
    fn test_nor_reset() {
        let mut latch = NorSrLatch::new();
        latch.update(true, false);
        latch.update(false, true);
        assert!(!latch.q());
        assert!(latch.q_not());
    }

    #[test]
    fn test_nor_invalid_forces_both_low() {
        let mut latch = NorSrLatch::new();
        latch.update(true, false);
        assert_eq!(latch.update(true, true), LatchCondition::Invalid);
        assert!(!latch.q());
        assert!(!latch.q_not());
    }

    #[test]
    fn test_nand_invalid_is_opposite_pattern() {
        let mut latch = NandSrLatch::new();
        latch.update(true, false);
        assert_eq!(latch.update(false, false), LatchCondition::Invalid);
        assert!(latch.q());
        assert!(latch.q_not());

        // Both high is the hold condition for NAND, the invalid one for NOR.
        let mut nand = NandSrLatch::new();
        nand.update(false, true);
        assert_eq!(nand.update(true, true), LatchCondition::Hold);
        assert!(nand.q());
        assert!(!nand.q_not());
    }

    #[test]
    fn test_nand_active_low_controls() {
        let mut latch = NandSrLatch::new();
        latch.update(false, true);
        assert!(latch.q());
        latch.update(true, false);
        assert!(!latch.q());
        assert!(latch.q_not());
    }

    #[test]
    fn test_nand_reset_restores_initial() {
        let mut latch = NandSrLatch::new();
        let initial = latch;
        latch.update(true, false);
        latch.reset();
        assert_eq!(latch, initial);
        assert!(latch.q() && latch.q_not());
    }

    #[test]
    fn test_d_latch_transparent_and_opaque() {
        let mut latch = DLatch::new();
        latch.update(true, true);
        assert!(latch.q());
        assert!(!latch.q_not());

        latch.update(false, false);
        assert!(latch.q(), "disabled latch must hold");

        latch.update(false, true);
        assert!(!latch.q());
        assert!(latch.q_not());
    }
}
