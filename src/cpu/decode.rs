//! Instruction decoder for the lab CPU.
//!
//! Every instruction is one byte: the high nibble is the opcode and the low
//! nibble the operand (a memory address for LDA/ADD/STA).
//!
//! | Opcode | Mnemonic |
//! |--------|----------|
//! | `0001` | LDA addr |
//! | `0010` | ADD addr |
//! | `0011` | STA addr |
//! | `0100` | OUT |
//! | `1111` | HLT |
//! | other  | NOP |

use serde::{Serialize, Deserialize};
use crate::signal::{Byte, Nibble};

/// Decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Load accumulator: AC := M[addr]
    Lda { addr: Nibble },

    /// Add memory to accumulator: AC := AC + M[addr], sets C on overflow
    Add { addr: Nibble },

    /// Store accumulator: M[addr] := AC
    Sta { addr: Nibble },

    /// Copy AC to the output latch
    Out,

    /// Halt execution
    Hlt,

    /// Any unassigned opcode; only advances PC
    Nop { opcode: Nibble, operand: Nibble },
}

/// Opcode values.
struct Opcode;

impl Opcode {
    const LDA: u8 = 0b0001;
    const ADD: u8 = 0b0010;
    const STA: u8 = 0b0011;
    const OUT: u8 = 0b0100;
    const HLT: u8 = 0b1111;
}

impl Instruction {
    /// The opcode nibble this instruction encodes to.
    pub fn opcode(&self) -> Nibble {
        match self {
            Instruction::Lda { .. } => Nibble::new(Opcode::LDA),
            Instruction::Add { .. } => Nibble::new(Opcode::ADD),
            Instruction::Sta { .. } => Nibble::new(Opcode::STA),
            Instruction::Out => Nibble::new(Opcode::OUT),
            Instruction::Hlt => Nibble::new(Opcode::HLT),
            Instruction::Nop { opcode, .. } => *opcode,
        }
    }

    /// Assembly mnemonic without operand.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Lda { .. } => "LDA",
            Instruction::Add { .. } => "ADD",
            Instruction::Sta { .. } => "STA",
            Instruction::Out => "OUT",
            Instruction::Hlt => "HLT",
            Instruction::Nop { .. } => "NOP",
        }
    }

    /// Memory operand, for instructions that take one.
    pub fn address(&self) -> Option<Nibble> {
        match self {
            Instruction::Lda { addr } | Instruction::Add { addr } | Instruction::Sta { addr } => Some(*addr),
            Instruction::Out | Instruction::Hlt | Instruction::Nop { .. } => None,
        }
    }
}

/// Decode an instruction byte. Every byte decodes; unknown opcodes become NOP.
pub fn decode(word: Byte) -> Instruction {
    let opcode = word.high();
    let operand = word.low();

    match opcode.value() {
        Opcode::LDA => Instruction::Lda { addr: operand },
        Opcode::ADD => Instruction::Add { addr: operand },
        Opcode::STA => Instruction::Sta { addr: operand },
        Opcode::OUT => Instruction::Out,
        Opcode::HLT => Instruction::Hlt,
        _ => Instruction::Nop { opcode, operand },
    }
}

/// Encode an instruction back to a byte.
///
/// OUT and HLT encode with a zero operand.
pub fn encode(instr: &Instruction) -> Byte {
    let operand = match instr {
        Instruction::Lda { addr } | Instruction::Add { addr } | Instruction::Sta { addr } => *addr,
        Instruction::Nop { operand, .. } => *operand,
        Instruction::Out | Instruction::Hlt => Nibble::zero(),
    };
    Byte::from_nibbles(instr.opcode(), operand)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_table() {
        assert_eq!(decode(Byte::new(0x1E)), Instruction::Lda { addr: Nibble::new(0xE) });
        assert_eq!(decode(Byte::new(0x2F)), Instruction::Add { addr: Nibble::new(0xF) });
        assert_eq!(decode(Byte::new(0x33)), Instruction::Sta { addr: Nibble::new(3) });
        assert_eq!(decode(Byte::new(0x40)), Instruction::Out);
        assert_eq!(decode(Byte::new(0xF0)), Instruction::Hlt);
    }

    #[test]
    fn test_unknown_opcodes_are_nop() {
        for op in [0x0u8, 0x5, 0x6, 0x7, 0x8, 0x9, 0xA, 0xB, 0xC, 0xD, 0xE] {
            let word = Byte::from_nibbles(Nibble::new(op), Nibble::new(7));
            let instr = decode(word);
            assert_eq!(instr.mnemonic(), "NOP", "opcode {:04b}", op);
            assert_eq!(encode(&instr), word);
        }
    }

    #[test]
    fn test_out_and_hlt_ignore_operand() {
        assert_eq!(decode(Byte::new(0x4A)), Instruction::Out);
        assert_eq!(decode(Byte::new(0xF5)), Instruction::Hlt);
    }

    #[test]
    fn test_encode_known_instructions() {
        assert_eq!(encode(&Instruction::Lda { addr: Nibble::new(0xE) }).value(), 0x1E);
        assert_eq!(encode(&Instruction::Out).value(), 0x40);
        assert_eq!(encode(&Instruction::Hlt).value(), 0xF0);
    }

    #[test]
    fn test_address_operand() {
        assert_eq!(decode(Byte::new(0x35)).address(), Some(Nibble::new(5)));
        assert_eq!(decode(Byte::new(0x45)).address(), None);
    }
}
