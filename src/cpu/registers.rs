//! CPU registers and flags.
//!
//! The lab CPU has 4 registers:
//! - PC: 4-bit program counter
//! - AC: 4-bit accumulator
//! - IR: 8-bit instruction register
//! - MAR: 4-bit memory address register
//!
//! and 2 flags: Z (zero) and C (carry).

use serde::{Serialize, Deserialize};
use crate::signal::{Byte, Nibble};

/// Register selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Register {
    Pc,
    Ac,
    Ir,
    Mar,
}

impl Register {
    /// All registers in display order.
    pub const ALL: [Register; 4] = [Register::Pc, Register::Ac, Register::Ir, Register::Mar];

    /// Width in bits.
    pub const fn width(self) -> usize {
        match self {
            Register::Ir => Byte::WIDTH,
            Register::Pc | Register::Ac | Register::Mar => Nibble::WIDTH,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Register::Pc => "PC",
            Register::Ac => "AC",
            Register::Ir => "IR",
            Register::Mar => "MAR",
        }
    }
}

/// Flag selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flag {
    /// Zero: the accumulator is 0.
    Z,
    /// Carry: the last ADD overflowed 4 bits.
    C,
}

impl Flag {
    pub const ALL: [Flag; 2] = [Flag::Z, Flag::C];

    pub const fn name(self) -> &'static str {
        match self {
            Flag::Z => "Z",
            Flag::C => "C",
        }
    }
}

/// The register file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    /// PC: address of the next instruction
    pub pc: Nibble,

    /// AC: accumulator
    pub ac: Nibble,

    /// IR: last fetched instruction
    pub ir: Byte,

    /// MAR: address of the last memory access
    pub mar: Nibble,
}

impl Registers {
    /// Create a new register file with all values zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all registers to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Read a register by selector.
    pub fn get(&self, reg: Register) -> u8 {
        match reg {
            Register::Pc => self.pc.value(),
            Register::Ac => self.ac.value(),
            Register::Ir => self.ir.value(),
            Register::Mar => self.mar.value(),
        }
    }

    /// Increment the program counter modulo 16.
    /// Returns the old value.
    pub fn advance_pc(&mut self) -> Nibble {
        let old = self.pc;
        self.pc = self.pc.wrapping_inc();
        old
    }
}

/// The flag register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    pub zero: bool,
    pub carry: bool,
}

impl Flags {
    /// Power-on flags: the accumulator starts at 0, so Z is set.
    pub const fn new() -> Self {
        Self { zero: true, carry: false }
    }

    pub fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::Z => self.zero,
            Flag::C => self.carry,
        }
    }

    /// Set Z from an accumulator value.
    pub fn set_zero_from(&mut self, value: Nibble) {
        self.zero = value.is_zero();
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::new()
    }
}
