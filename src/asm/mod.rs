//! Assembler and disassembler for lab CPU programs.
//!
//! This module provides:
//! - A two-pass assembler (text → memory image)
//! - A disassembler (memory image → readable listing)
//! - The text image format used to store assembled programs

pub mod assembler;
pub mod disasm;
pub mod image;

pub use assembler::{assemble, AssemblerError};
pub use disasm::{disassemble, disassemble_instruction};
pub use image::{format_image, load_image, parse_image, save_image, ImageError};
