//! Binary signal primitives.
//!
//! This module provides the value types every circuit in the lab works with:
//! - [`Bit`] - a single logic level
//! - [`Nibble`] - a 4-bit word (PC, AC, MAR, counter outputs, instruction fields)
//! - [`Byte`] - an 8-bit word (memory cells and the instruction register)

mod bits;
mod word;

pub use bits::{bit_char, format_msb_first, lsb_first_bits, lsb_first_value, msb_first_index};
pub use word::{Byte, Nibble};

/// A single logic level.
pub type Bit = bool;
