//! WebAssembly bindings for the logic lab.
//!
//! This module provides JavaScript-friendly wrappers around the CPU and the
//! display decoder.

use wasm_bindgen::prelude::*;
use js_sys::Uint8Array;
use crate::asm::assembler::assemble;
use crate::asm::disasm::disassemble_instruction;
use crate::combinational::segments_for;
use crate::cpu::{demo, Cpu, Flag, Register};
use crate::policy::InputPolicy;
use crate::signal::Byte;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WebAssembly-friendly CPU wrapper.
#[wasm_bindgen]
pub struct WasmCpu {
    cpu: Cpu,
}

#[wasm_bindgen]
impl WasmCpu {
    /// Create a new CPU instance.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { cpu: Cpu::new() }
    }

    /// Switch between lenient (false) and strict (true) input handling.
    pub fn set_strict(&mut self, strict: bool) {
        let policy = if strict { InputPolicy::Strict } else { InputPolicy::Lenient };
        self.cpu.set_policy(policy);
    }

    /// Reset and load assembly source. Returns the number of words.
    pub fn load_asm(&mut self, source: &str) -> Result<usize, JsError> {
        let words = assemble(source)
            .map_err(|e| JsError::new(&e.to_string()))?;
        let bytes: Vec<u8> = words.iter().map(|b| b.value()).collect();

        self.cpu.reset();
        self.cpu.load_program(&bytes, 0)
            .map_err(|e| JsError::new(&e.to_string()))?;

        Ok(words.len())
    }

    /// Load raw words at `start`. Returns how many were stored.
    pub fn load(&mut self, program: &[u8], start: usize) -> Result<usize, JsError> {
        let report = self.cpu.load_program(program, start)
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(report.written)
    }

    /// Reset and install the built-in 9 + 8 program.
    pub fn load_demo(&mut self) -> Result<(), JsError> {
        demo::load_demo(&mut self.cpu)
            .map(|_| ())
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Write one data cell. Returns whether anything was stored.
    pub fn set_data(&mut self, address: usize, value: u32) -> bool {
        self.cpu.set_data_in_memory(address, value).was_written()
    }

    /// Step one instruction. Returns its mnemonic, or `undefined` if halted.
    pub fn step(&mut self) -> Option<String> {
        self.cpu.step()?;
        Some(disassemble_instruction(Byte::from(self.cpu.register_value(Register::Ir))))
    }

    /// Run until halt or max cycles. Returns instructions executed.
    pub fn run(&mut self, max_cycles: u32) -> u32 {
        // At most max_cycles steps, so the count fits.
        self.cpu.run_limited(u64::from(max_cycles)) as u32
    }

    /// Reset CPU and memory.
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    pub fn is_halted(&self) -> bool {
        self.cpu.is_halted()
    }

    /// Get cycle count.
    pub fn cycles(&self) -> u64 {
        self.cpu.cycles()
    }

    pub fn pc(&self) -> u8 {
        self.cpu.register_value(Register::Pc)
    }

    pub fn ac(&self) -> u8 {
        self.cpu.register_value(Register::Ac)
    }

    pub fn ir(&self) -> u8 {
        self.cpu.register_value(Register::Ir)
    }

    pub fn mar(&self) -> u8 {
        self.cpu.register_value(Register::Mar)
    }

    pub fn zero_flag(&self) -> bool {
        self.cpu.flag_value(Flag::Z)
    }

    pub fn carry_flag(&self) -> bool {
        self.cpu.flag_value(Flag::C)
    }

    /// Drain the output latch. `undefined` when nothing was output.
    pub fn take_output(&mut self) -> Option<u8> {
        self.cpu.take_last_output().map(|n| n.value())
    }

    pub fn last_action(&self) -> String {
        self.cpu.last_action_description().to_string()
    }

    /// Copy of all 16 memory cells.
    pub fn memory(&self) -> Uint8Array {
        let cells: Vec<u8> = self.cpu.memory_state().iter().map(|b| b.value()).collect();
        Uint8Array::from(cells.as_slice())
    }

    /// Full state as a JSON string.
    pub fn snapshot_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.cpu.snapshot())
            .map_err(|e| JsError::new(&e.to_string()))
    }
}

impl Default for WasmCpu {
    fn default() -> Self {
        Self::new()
    }
}

/// Disassemble a single instruction word.
#[wasm_bindgen]
pub fn wasm_disassemble(value: u8) -> String {
    disassemble_instruction(Byte::new(value))
}

/// Lit segments a..g for a digit, as 0/1 values.
#[wasm_bindgen]
pub fn wasm_segments(digit: usize) -> Uint8Array {
    let lit: Vec<u8> = segments_for(digit).as_array().iter().map(|&on| u8::from(on)).collect();
    Uint8Array::from(lit.as_slice())
}
