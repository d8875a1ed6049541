//! # Logic Lab
//!
//! A digital logic laboratory: the building blocks of a computer, from a
//! full adder up to a 4-bit accumulator CPU.
//!
//! - [`combinational`]: adders, comparator, multiplexers, decoder/encoder,
//!   seven-segment driver
//! - [`sequential`]: SR and D latches, master-slave D, JK and T flip-flops,
//!   a synchronous up/down counter and a shift register
//! - [`cpu`]: a 16-byte von Neumann machine with five instructions
//! - [`asm`]: assembler, disassembler and program image files
//! - [`waveform`]: timing-diagram recording

pub mod signal;
pub mod policy;
pub mod config;
pub mod combinational;
pub mod sequential;
pub mod cpu;
pub mod asm;
pub mod waveform;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use signal::{Bit, Byte, Nibble};
pub use policy::{InputPolicy, Rejection, WriteOutcome};
pub use config::{ConfigError, LabConfig};
pub use combinational::LogicError;
pub use sequential::{Clocked, Sequential};
pub use cpu::{Cpu, CpuSnapshot, CpuState, Flag, Instruction, LoadReport, Memory, MemoryError, Register, Registers};
pub use asm::{assemble, disassemble, load_image, save_image, AssemblerError, ImageError};
pub use waveform::Waveform;
