//! The 4-bit lab CPU.
//!
//! A single-accumulator von Neumann machine:
//! - 16 eight-bit memory cells holding both code and data
//! - registers PC, AC, MAR (4 bits) and IR (8 bits); flags Z and C
//! - 5 instructions (LDA, ADD, STA, OUT, HLT), everything else is NOP

pub mod memory;
pub mod registers;
pub mod decode;
pub mod execute;
pub mod demo;

pub use memory::{LoadReport, Memory, MemoryError, MEMORY_SIZE};
pub use registers::{Flag, Flags, Register, Registers};
pub use decode::Instruction;
pub use execute::{Cpu, CpuSnapshot, CpuState};
