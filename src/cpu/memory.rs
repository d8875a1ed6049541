//! Lab CPU memory.
//!
//! 16 cells of 8 bits, addressed 0-15. Addresses that come from inside the
//! CPU are 4-bit [`Nibble`]s and can never be out of range; addresses that
//! come from outside go through [`Memory::write_checked`].

use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{event, Level};
use crate::policy::{InputPolicy, Rejection, WriteOutcome};
use crate::signal::{Byte, Nibble};

/// The number of memory cells.
pub const MEMORY_SIZE: usize = 16;

/// Main memory: 16 eight-bit cells.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    cells: [Byte; MEMORY_SIZE],
}

/// How much of a program made it into memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// First address written.
    pub start: usize,
    /// Words stored.
    pub written: usize,
    /// Words that did not fit and were dropped.
    pub dropped: usize,
}

impl LoadReport {
    /// Whether the program was cut short.
    pub fn truncated(&self) -> bool {
        self.dropped > 0
    }
}

impl Memory {
    /// Create a new memory with all cells zeroed.
    pub fn new() -> Self {
        Self {
            cells: [Byte::zero(); MEMORY_SIZE],
        }
    }

    /// Read a cell.
    #[inline]
    pub fn read(&self, addr: Nibble) -> Byte {
        self.cells[addr.index()]
    }

    /// Write a cell.
    #[inline]
    pub fn write(&mut self, addr: Nibble, value: Byte) {
        self.cells[addr.index()] = value;
    }

    /// Write a value supplied from outside the CPU.
    ///
    /// Out-of-range addresses are never written. A value wider than 8 bits is
    /// masked under the lenient policy and refused under the strict one.
    pub fn write_checked(&mut self, address: usize, value: u32, policy: InputPolicy) -> WriteOutcome {
        if address >= MEMORY_SIZE {
            event!(Level::WARN, "Ignoring write of {} to out-of-range address {}", value, address);
            return WriteOutcome::Rejected(Rejection::AddressOutOfRange);
        }

        let outcome = if Byte::fits(value) {
            WriteOutcome::Applied
        } else if policy.is_strict() {
            event!(Level::WARN, "Refusing {} for M[{}]: wider than 8 bits", value, address);
            return WriteOutcome::Rejected(Rejection::ValueTooWide);
        } else {
            WriteOutcome::Clamped {
                requested: value,
                stored: Byte::from_masked(value).value(),
            }
        };

        self.cells[address] = Byte::from_masked(value);
        outcome
    }

    /// Clear all memory to zeros.
    pub fn clear(&mut self) {
        self.cells = [Byte::zero(); MEMORY_SIZE];
    }

    /// Copy a program into memory starting at `start`.
    ///
    /// Lenient: words past the end of memory are dropped and counted in the
    /// report. Strict: a program that does not fit is refused and nothing is
    /// written.
    pub fn load_program(
        &mut self,
        start: usize,
        program: &[u8],
        policy: InputPolicy,
    ) -> Result<LoadReport, MemoryError> {
        let available = MEMORY_SIZE.saturating_sub(start);
        let written = program.len().min(available);
        let report = LoadReport {
            start,
            written,
            dropped: program.len() - written,
        };

        if report.truncated() {
            if policy.is_strict() {
                return Err(MemoryError::ProgramTooLarge {
                    size: program.len(),
                    start,
                    available,
                });
            }
            event!(Level::WARN, "Program truncated: {} of {} words fit at address {}",
                written, program.len(), start);
        }

        for (cell, &word) in self.cells[start.min(MEMORY_SIZE)..].iter_mut().zip(program) {
            *cell = Byte::new(word);
        }

        Ok(report)
    }

    /// A copy of every cell.
    pub fn cells(&self) -> [Byte; MEMORY_SIZE] {
        self.cells
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only show non-zero cells
        let non_zero: Vec<_> = self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.is_zero())
            .map(|(i, cell)| (i, cell.value()))
            .collect();

        f.debug_struct("Memory")
            .field("non_zero_cells", &non_zero)
            .field("total_cells", &MEMORY_SIZE)
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    /// Program does not fit between `start` and the end of memory.
    #[error("program of {size} words does not fit at address {start} ({available} cells available)")]
    ProgramTooLarge { size: usize, start: usize, available: usize },
}
