//! Combinational circuits.
//!
//! Pure functions of their current inputs with no memory between calls:
//! - [`FullAdder`] and [`Adder4Bit`] - ripple-carry binary addition
//! - [`Comparator4Bit`] - magnitude comparison
//! - [`Multiplexer`] - 4-to-1 and 8-to-1 data selectors
//! - [`Decoder3To8`] and [`Encoder8To3`] - line decoding and encoding
//! - [`segments_for`] - BCD/hex to seven-segment mapping

mod adder;
mod coder;
mod comparator;
mod display;
mod mux;

pub use adder::{full_add, Adder4Bit, FullAdder};
pub use coder::{Decoder3To8, Encoder8To3};
pub use comparator::Comparator4Bit;
pub use display::{segments_for, Segment, Segments};
pub use mux::{mux4, mux8, Multiplexer};

use thiserror::Error;

/// Errors reported by the strict entry points of combinational circuits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogicError {
    #[error("{input} expects {expected} lines, got {got}")]
    WidthMismatch {
        input: &'static str,
        expected: usize,
        got: usize,
    },
}
