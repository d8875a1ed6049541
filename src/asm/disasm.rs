//! Disassembler for lab CPU programs.
//!
//! Converts memory words back to readable assembly.

use crate::cpu::Cpu;
use crate::signal::Byte;

/// Disassemble a single instruction to text, e.g. `LDA E`.
pub fn disassemble_instruction(word: Byte) -> String {
    Cpu::disassemble(word)
}

/// Disassemble a memory image into an address-annotated listing.
///
/// Each line shows the address in hex, the mnemonic and the raw word in
/// binary. Data cells are listed as whatever instruction they decode to.
pub fn disassemble(words: &[Byte]) -> String {
    let mut output = String::new();
    output.push_str("; Lab CPU Disassembly\n");
    output.push_str("; -------------------\n\n");

    for (addr, word) in words.iter().enumerate() {
        let line = disassemble_instruction(*word);
        output.push_str(&format!("{:X}: {:<6} ; {:04b} {:04b}\n",
            addr, line, word.high().value(), word.low().value()));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::assemble;

    #[test]
    fn test_disassemble_instruction() {
        assert_eq!(disassemble_instruction(Byte::new(0x2F)), "ADD F");
        assert_eq!(disassemble_instruction(Byte::new(0x9C)), "NOP");
    }

    #[test]
    fn test_listing() {
        let listing = disassemble(&[Byte::new(0x1E), Byte::new(0xF0)]);
        assert!(listing.contains("0: LDA E  ; 0001 1110\n"));
        assert!(listing.contains("1: HLT    ; 1111 0000\n"));
    }

    #[test]
    fn test_listing_reassembles() {
        let words = assemble("LDA 14\nADD 15\nSTA 3\nOUT\nHLT").unwrap();
        let listing = disassemble(&words);
        let source: String = listing
            .lines()
            .filter_map(|line| line.split_once(": "))
            .map(|(_, rest)| format!("{}\n", rest))
            .collect();
        assert_eq!(assemble(&source).unwrap(), words);
    }
}
