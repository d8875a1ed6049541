//! 4-bit serial-in, serial-out shift register.

use crate::sequential::{Clocked, Sequential};
use crate::signal::Nibble;

/// Serial-in/serial-out shift register.
///
/// `bits[0]` receives the serial input; `bits[3]` drives the serial output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftRegister4Bit {
    bits: [bool; 4],
    data_in: bool,
}

impl ShiftRegister4Bit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the bit shifted in on the next clock.
    pub fn set_data_input(&mut self, bit: bool) {
        self.data_in = bit;
    }

    pub fn bits(&self) -> [bool; 4] {
        self.bits
    }

    /// Contents read with `bits[0]` as the LSB.
    pub fn value(&self) -> Nibble {
        Nibble::from_bits(self.bits)
    }

    /// The outgoing bit.
    pub fn serial_out(&self) -> bool {
        self.bits[3]
    }
}

impl Sequential for ShiftRegister4Bit {
    fn q(&self) -> bool {
        self.serial_out()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Clocked for ShiftRegister4Bit {
    fn clock(&mut self) {
        self.bits.copy_within(0..3, 1);
        self.bits[0] = self.data_in;
    }
}
