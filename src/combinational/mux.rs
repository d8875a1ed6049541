//! Multiplexers.
//!
//! Select lines are given most-significant first: for a 4-to-1 mux,
//! `[S1, S0] = [1, 0]` routes input `I2` to the output.

use crate::combinational::LogicError;
use crate::signal::msb_first_index;

/// A 2^n-to-1 multiplexer described by its number of select lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Multiplexer {
    select_lines: usize,
}

impl Multiplexer {
    /// 4 data inputs, 2 select lines.
    pub const FOUR_TO_ONE: Multiplexer = Multiplexer { select_lines: 2 };

    /// 8 data inputs, 3 select lines.
    pub const EIGHT_TO_ONE: Multiplexer = Multiplexer { select_lines: 3 };

    pub const fn select_lines(&self) -> usize {
        self.select_lines
    }

    pub const fn data_lines(&self) -> usize {
        1 << self.select_lines
    }

    /// Route the selected data input to the output.
    ///
    /// Arrays of the wrong length give `false` instead of a fault.
    pub fn output(&self, data: &[bool], select: &[bool]) -> bool {
        self.try_output(data, select).unwrap_or(false)
    }

    /// Like [`output`](Self::output) but reports malformed input.
    pub fn try_output(&self, data: &[bool], select: &[bool]) -> Result<bool, LogicError> {
        if data.len() != self.data_lines() {
            return Err(LogicError::WidthMismatch {
                input: "data",
                expected: self.data_lines(),
                got: data.len(),
            });
        }
        if select.len() != self.select_lines {
            return Err(LogicError::WidthMismatch {
                input: "select",
                expected: self.select_lines,
                got: select.len(),
            });
        }

        Ok(data[msb_first_index(select)])
    }
}

/// 4-to-1 multiplexer with fixed-width inputs.
#[inline]
pub fn mux4(data: &[bool; 4], select: [bool; 2]) -> bool {
    data[msb_first_index(&select)]
}

/// 8-to-1 multiplexer with fixed-width inputs.
#[inline]
pub fn mux8(data: &[bool; 8], select: [bool; 3]) -> bool {
    data[msb_first_index(&select)]
}
