//! Binary adders.
//!
//! [`FullAdder`] adds three bits; [`Adder4Bit`] chains four of them so the
//! carry-out of stage *i* feeds the carry-in of stage *i + 1*.

use crate::signal::Nibble;

/// Full adder: adds three bits (a, b, carry_in), returns (sum, carry_out).
#[inline]
pub const fn full_add(a: bool, b: bool, carry_in: bool) -> (bool, bool) {
    let half = a ^ b;
    let sum = half ^ carry_in;
    let carry_out = (a && b) || (carry_in && half);
    (sum, carry_out)
}

/// A 1-bit full adder that remembers its last result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FullAdder {
    sum: bool,
    carry_out: bool,
}

impl FullAdder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute sum and carry-out from new inputs.
    pub fn update(&mut self, a: bool, b: bool, carry_in: bool) {
        (self.sum, self.carry_out) = full_add(a, b, carry_in);
    }

    pub fn sum(&self) -> bool {
        self.sum
    }

    pub fn carry_out(&self) -> bool {
        self.carry_out
    }
}

/// A 4-bit ripple-carry adder built from four [`FullAdder`] stages.
///
/// Bit arrays are least-significant first (`a[0]` is the LSB).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adder4Bit {
    stages: [FullAdder; 4],
    sum: [bool; 4],
    carry_out: bool,
}

impl Adder4Bit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `a + b + carry_in`, rippling the carry from LSB to MSB.
    pub fn update(&mut self, a: [bool; 4], b: [bool; 4], carry_in: bool) {
        let mut carry = carry_in;

        for (i, stage) in self.stages.iter_mut().enumerate() {
            stage.update(a[i], b[i], carry);
            self.sum[i] = stage.sum();
            carry = stage.carry_out();
        }

        self.carry_out = carry;
    }

    /// Add two nibbles, returning (sum, carry_out).
    pub fn add(&mut self, a: Nibble, b: Nibble, carry_in: bool) -> (Nibble, bool) {
        self.update(a.bits(), b.bits(), carry_in);
        (self.sum_value(), self.carry_out)
    }

    /// The 4-bit sum, LSB first.
    pub fn sum(&self) -> [bool; 4] {
        self.sum
    }

    /// The 4-bit sum as a word.
    pub fn sum_value(&self) -> Nibble {
        Nibble::from_bits(self.sum)
    }

    /// Carry out of the most significant stage (C4).
    pub fn carry_out(&self) -> bool {
        self.carry_out
    }

    /// Carry out of each stage, LSB first. The last entry equals `carry_out()`.
    pub fn stage_carries(&self) -> [bool; 4] {
        self.stages.map(|s| s.carry_out())
    }
}
