//! Two-pass assembler for the lab CPU.
//!
//! Syntax:
//! ```text
//! ; Comment
//! START:          ; Define a label
//!     LDA X       ; Load from the cell labelled X
//!     ADD 0xF     ; Add M[15]
//!     STA 13      ; Store to M[13]
//!     OUT
//!     HLT
//!     ORG 14      ; Set origin address
//! X:  DAT 9       ; Define data value
//! ```
//!
//! Numbers are decimal, or hex with a `0x` prefix. A bare operand made of hex
//! digits that is not a label is read as hex, so disassembler listings such
//! as `LDA E` assemble back unchanged.
//!
//! The output is a memory image starting at address 0; cells skipped by
//! `ORG` are zero.

use crate::cpu::decode::{encode, Instruction};
use crate::cpu::MEMORY_SIZE;
use crate::signal::{Byte, Nibble};
use std::collections::HashMap;
use thiserror::Error;

/// Assemble source code to a memory image.
pub fn assemble(source: &str) -> Result<Vec<Byte>, AssemblerError> {
    let mut asm = Assembler::new();
    asm.assemble(source)
}

/// An operand as written, resolved in pass 2.
#[derive(Debug, Clone)]
enum Operand {
    Number(i64),
    Symbol(String),
}

#[derive(Debug, Clone)]
enum Statement {
    Lda(Operand),
    Add(Operand),
    Sta(Operand),
    Out,
    Hlt,
    Nop,
    Dat(Operand),
}

/// One word to emit.
struct Item {
    addr: usize,
    line: usize,
    stmt: Statement,
}

/// The assembler state.
struct Assembler {
    /// Current address (origin).
    current_addr: usize,
    /// Symbol table (label -> address).
    symbols: HashMap<String, usize>,
    /// Parsed statements awaiting encoding.
    items: Vec<Item>,
}

impl Assembler {
    fn new() -> Self {
        Self {
            current_addr: 0,
            symbols: HashMap::new(),
            items: Vec::new(),
        }
    }

    fn assemble(&mut self, source: &str) -> Result<Vec<Byte>, AssemblerError> {
        // Pass 1: collect labels and statements
        for (line_num, line) in source.lines().enumerate() {
            self.process_line(line, line_num + 1)?;
        }

        // Pass 2: resolve operands and encode
        let size = self.items.iter().map(|item| item.addr + 1).max().unwrap_or(0);
        let mut image = vec![Byte::zero(); size];
        for item in &self.items {
            image[item.addr] = self.encode_item(item)?;
        }

        Ok(image)
    }

    fn process_line(&mut self, line: &str, line_num: usize) -> Result<(), AssemblerError> {
        // Remove comments
        let line = match line.find(';') {
            Some(idx) => &line[..idx],
            None => line,
        };
        let mut line = line.trim();

        // Check for label definition
        if let Some(colon_idx) = line.find(':') {
            let label = line[..colon_idx].trim().to_uppercase();
            if !is_identifier(&label) {
                return Err(AssemblerError::SyntaxError {
                    line: line_num,
                    message: format!("invalid label '{}'", label),
                });
            }
            if self.symbols.insert(label.clone(), self.current_addr).is_some() {
                return Err(AssemblerError::DuplicateLabel { line: line_num, label });
            }
            line = line[colon_idx + 1..].trim();
        }

        if line.is_empty() {
            return Ok(());
        }

        self.process_statement(line, line_num)
    }

    fn process_statement(&mut self, line: &str, line_num: usize) -> Result<(), AssemblerError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let mnemonic = parts[0].to_uppercase();
        if parts.len() > 2 {
            return Err(AssemblerError::SyntaxError {
                line: line_num,
                message: format!("unexpected '{}'", parts[2..].join(" ")),
            });
        }
        let operand = parts.get(1).map(|op| parse_operand(op, line_num)).transpose()?;

        let require = |operand: Option<Operand>| {
            operand.ok_or_else(|| AssemblerError::SyntaxError {
                line: line_num,
                message: format!("{} requires an operand", mnemonic),
            })
        };
        let forbid = |operand: Option<Operand>, stmt: Statement| match operand {
            Some(_) => Err(AssemblerError::SyntaxError {
                line: line_num,
                message: format!("{} takes no operand", mnemonic),
            }),
            None => Ok(stmt),
        };

        let stmt = match mnemonic.as_str() {
            // Directives
            "ORG" => {
                let addr = match require(operand)? {
                    Operand::Number(n) => n,
                    Operand::Symbol(s) => {
                        return Err(AssemblerError::SyntaxError {
                            line: line_num,
                            message: format!("ORG needs a number, found '{}'", s),
                        })
                    }
                };
                self.current_addr = check_range(addr, MEMORY_SIZE as i64 - 1, line_num)? as usize;
                return Ok(());
            }
            "DAT" | "DATA" => Statement::Dat(require(operand)?),

            // Instructions
            "LDA" => Statement::Lda(require(operand)?),
            "ADD" => Statement::Add(require(operand)?),
            "STA" => Statement::Sta(require(operand)?),
            "OUT" => forbid(operand, Statement::Out)?,
            "HLT" | "HALT" => forbid(operand, Statement::Hlt)?,
            "NOP" => forbid(operand, Statement::Nop)?,

            _ => return Err(AssemblerError::UnknownMnemonic {
                line: line_num,
                mnemonic: mnemonic.clone(),
            }),
        };

        self.emit(stmt, line_num)
    }

    fn emit(&mut self, stmt: Statement, line_num: usize) -> Result<(), AssemblerError> {
        if self.current_addr >= MEMORY_SIZE {
            return Err(AssemblerError::ProgramTooLarge { line: line_num });
        }
        self.items.push(Item { addr: self.current_addr, line: line_num, stmt });
        self.current_addr += 1;
        Ok(())
    }

    fn encode_item(&self, item: &Item) -> Result<Byte, AssemblerError> {
        let addr = |op: &Operand| -> Result<Nibble, AssemblerError> {
            let value = self.resolve(op, item.line)?;
            Ok(Nibble::new(check_range(value, i64::from(Nibble::MASK), item.line)? as u8))
        };

        let instr = match &item.stmt {
            Statement::Dat(op) => {
                let value = self.resolve(op, item.line)?;
                return Ok(Byte::new(check_range(value, i64::from(Byte::MASK), item.line)? as u8));
            }
            Statement::Lda(op) => Instruction::Lda { addr: addr(op)? },
            Statement::Add(op) => Instruction::Add { addr: addr(op)? },
            Statement::Sta(op) => Instruction::Sta { addr: addr(op)? },
            Statement::Out => Instruction::Out,
            Statement::Hlt => Instruction::Hlt,
            Statement::Nop => Instruction::Nop { opcode: Nibble::zero(), operand: Nibble::zero() },
        };

        Ok(encode(&instr))
    }

    fn resolve(&self, operand: &Operand, line_num: usize) -> Result<i64, AssemblerError> {
        match operand {
            Operand::Number(n) => Ok(*n),
            Operand::Symbol(name) => {
                if let Some(&addr) = self.symbols.get(name) {
                    return Ok(addr as i64);
                }
                // Listing-style bare hex
                i64::from_str_radix(name, 16).map_err(|_| AssemblerError::UndefinedLabel {
                    line: line_num,
                    label: name.clone(),
                })
            }
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_operand(operand: &str, line_num: usize) -> Result<Operand, AssemblerError> {
    // Check for hex literal
    if let Some(hex) = operand.strip_prefix("0x").or_else(|| operand.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16)
            .map(Operand::Number)
            .map_err(|_| AssemblerError::SyntaxError {
                line: line_num,
                message: format!("invalid hex literal '{}'", operand),
            });
    }

    // Check for decimal number
    if operand.starts_with(|c: char| c.is_ascii_digit() || c == '-') {
        return operand.parse::<i64>()
            .map(Operand::Number)
            .map_err(|_| AssemblerError::SyntaxError {
                line: line_num,
                message: format!("invalid number '{}'", operand),
            });
    }

    let name = operand.to_uppercase();
    if !is_identifier(&name) {
        return Err(AssemblerError::SyntaxError {
            line: line_num,
            message: format!("invalid operand '{}'", operand),
        });
    }
    Ok(Operand::Symbol(name))
}

fn check_range(value: i64, max: i64, line_num: usize) -> Result<i64, AssemblerError> {
    if (0..=max).contains(&value) {
        Ok(value)
    } else {
        Err(AssemblerError::ValueOutOfRange { line: line_num, value })
    }
}

/// Errors that can occur during assembly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblerError {
    #[error("syntax error on line {line}: {message}")]
    SyntaxError { line: usize, message: String },

    #[error("unknown mnemonic on line {line}: {mnemonic}")]
    UnknownMnemonic { line: usize, mnemonic: String },

    #[error("undefined label on line {line}: {label}")]
    UndefinedLabel { line: usize, label: String },

    #[error("label defined twice on line {line}: {label}")]
    DuplicateLabel { line: usize, label: String },

    #[error("value out of range on line {line}: {value}")]
    ValueOutOfRange { line: usize, value: i64 },

    #[error("program does not fit in memory (line {line} is past address 15)")]
    ProgramTooLarge { line: usize },
}
