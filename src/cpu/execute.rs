//! CPU execution engine for the lab CPU.
//!
//! Implements the fetch-decode-execute cycle and all instruction behaviors.

use crate::cpu::{Memory, Registers};
use crate::cpu::decode::{self, Instruction};
use crate::cpu::memory::{LoadReport, MemoryError, MEMORY_SIZE};
use crate::cpu::registers::{Flag, Flags, Register};
use crate::policy::{InputPolicy, WriteOutcome};
use crate::signal::{Byte, Nibble};
use serde::{Serialize, Deserialize};
use tracing::{event, Level};

/// Status message after a reset.
pub const RESET_MESSAGE: &str = "CPU reset. Ready for execution.";

/// Status message when stepping a halted CPU.
pub const HALTED_MESSAGE: &str = "CPU is halted. Press reset to restart.";

/// CPU execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    /// CPU is running normally.
    Running,
    /// CPU has executed HLT and waits for a reset.
    Halted,
}

/// The 4-bit accumulator CPU.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cpu {
    /// CPU registers.
    regs: Registers,
    /// Z and C.
    flags: Flags,
    /// Main memory.
    mem: Memory,
    /// Current execution state.
    state: CpuState,
    /// Value latched by the last OUT, until drained.
    output: Option<Nibble>,
    /// What the last step did, in words.
    last_action: String,
    /// Instructions executed since reset.
    cycles: u64,
    /// How out-of-range data from outside is treated.
    policy: InputPolicy,
}

/// Serializable view of the visible CPU state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuSnapshot {
    pub pc: u8,
    pub ac: u8,
    pub ir: u8,
    pub mar: u8,
    pub zero: bool,
    pub carry: bool,
    pub halted: bool,
    pub memory: Vec<u8>,
    pub last_action: String,
    pub cycles: u64,
}

impl Cpu {
    /// Create a new CPU in the reset state with the lenient input policy.
    pub fn new() -> Self {
        Self::with_policy(InputPolicy::default())
    }

    /// Create a new CPU in the reset state.
    pub fn with_policy(policy: InputPolicy) -> Self {
        Self {
            regs: Registers::new(),
            flags: Flags::new(),
            mem: Memory::new(),
            state: CpuState::Running,
            output: None,
            last_action: RESET_MESSAGE.to_string(),
            cycles: 0,
            policy,
        }
    }

    pub fn policy(&self) -> InputPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: InputPolicy) {
        self.policy = policy;
    }

    /// Reset the CPU to initial state. Memory is cleared as well.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.flags = Flags::new();
        self.mem.clear();
        self.state = CpuState::Running;
        self.output = None;
        self.last_action = RESET_MESSAGE.to_string();
        self.cycles = 0;
        event!(Level::DEBUG, "CPU reset");
    }

    /// Load a program into memory starting at `start`.
    pub fn load_program(&mut self, program: &[u8], start: usize) -> Result<LoadReport, MemoryError> {
        self.mem.load_program(start, program, self.policy)
    }

    /// Write one data word from outside the CPU.
    pub fn set_data_in_memory(&mut self, address: usize, value: u32) -> WriteOutcome {
        self.mem.write_checked(address, value, self.policy)
    }

    /// Execute a single instruction.
    ///
    /// Returns the instruction that was executed, or `None` if the CPU is
    /// halted. A halted CPU only updates its status message.
    pub fn step(&mut self) -> Option<Instruction> {
        if self.is_halted() {
            self.last_action = HALTED_MESSAGE.to_string();
            return None;
        }

        // Fetch
        let pc = self.regs.pc;
        self.regs.mar = pc;
        self.regs.ir = self.mem.read(pc);
        self.regs.advance_pc();

        // Decode
        let instr = decode::decode(self.regs.ir);

        if !matches!(instr, Instruction::Add { .. }) {
            self.flags.carry = false;
        }

        // Execute
        self.execute(instr);
        self.cycles += 1;

        event!(Level::TRACE, "{:X}: {:02X} {}", pc.value(), self.regs.ir.value(), self.last_action);
        if self.is_halted() {
            event!(Level::DEBUG, "CPU halted after {} instructions", self.cycles);
        }

        Some(instr)
    }

    /// Run for at most `max_cycles` instructions or until HLT.
    ///
    /// Returns the number of instructions executed.
    pub fn run_limited(&mut self, max_cycles: u64) -> u64 {
        let start_cycles = self.cycles;

        for _ in 0..max_cycles {
            if self.step().is_none() {
                break;
            }
        }

        self.cycles - start_cycles
    }

    fn execute(&mut self, instr: Instruction) {
        match instr {
            Instruction::Lda { addr } => {
                self.regs.mar = addr;
                self.regs.ac = self.mem.read(addr).low();
                self.flags.set_zero_from(self.regs.ac);
                self.last_action = format!(
                    "LDA {:X}: Loaded M[0x{:X}]({}) into AC.",
                    addr, addr, self.regs.ac.value()
                );
            }

            Instruction::Add { addr } => {
                self.regs.mar = addr;
                let operand = self.mem.read(addr).low();
                let old_ac = self.regs.ac;
                let (sum, carry) = old_ac.overflowing_add(operand);
                self.regs.ac = sum;
                self.flags.set_zero_from(sum);
                self.flags.carry = carry;
                self.last_action = format!(
                    "ADD {:X}: Added M[0x{:X}]({}) to AC({}). New AC is {}.",
                    addr, addr, operand.value(), old_ac.value(), sum.value()
                );
            }

            Instruction::Sta { addr } => {
                self.regs.mar = addr;
                self.mem.write(addr, Byte::from(self.regs.ac));
                self.last_action = format!(
                    "STA {:X}: Stored AC({}) into M[0x{:X}].",
                    addr, self.regs.ac.value(), addr
                );
            }

            Instruction::Out => {
                self.output = Some(self.regs.ac);
                self.last_action = format!("OUT: Output value {} from AC.", self.regs.ac.value());
            }

            Instruction::Hlt => {
                self.state = CpuState::Halted;
                self.last_action = "HLT: CPU execution halted.".to_string();
            }

            Instruction::Nop { opcode, .. } => {
                self.last_action = format!("NOP: Unknown opcode {:04b}.", opcode.value());
            }
        }
    }

    /// Read a register.
    pub fn register_value(&self, reg: Register) -> u8 {
        self.regs.get(reg)
    }

    /// Read a flag.
    pub fn flag_value(&self, flag: Flag) -> bool {
        self.flags.get(flag)
    }

    /// A copy of the whole memory.
    pub fn memory_state(&self) -> [Byte; MEMORY_SIZE] {
        self.mem.cells()
    }

    /// Check if CPU is halted.
    pub fn is_halted(&self) -> bool {
        self.state == CpuState::Halted
    }

    pub fn last_action_description(&self) -> &str {
        &self.last_action
    }

    /// Take the value written by the last OUT, leaving the slot empty.
    pub fn take_last_output(&mut self) -> Option<Nibble> {
        self.output.take()
    }

    /// Instructions executed since the last reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Mnemonic for an instruction word, e.g. `LDA E` or `HLT`.
    pub fn disassemble(word: Byte) -> String {
        let instr = decode::decode(word);
        match instr.address() {
            Some(addr) => format!("{} {:X}", instr.mnemonic(), addr),
            None => instr.mnemonic().to_string(),
        }
    }

    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            pc: self.regs.pc.value(),
            ac: self.regs.ac.value(),
            ir: self.regs.ir.value(),
            mar: self.regs.mar.value(),
            zero: self.flags.zero,
            carry: self.flags.carry,
            halted: self.is_halted(),
            memory: self.mem.cells().iter().map(|b| b.value()).collect(),
            last_action: self.last_action.clone(),
            cycles: self.cycles,
        }
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Rejection;

    fn scenario_cpu() -> Cpu {
        let mut cpu = Cpu::new();
        cpu.reset();
        cpu.set_data_in_memory(14, 9);
        cpu.set_data_in_memory(15, 8);
        cpu.load_program(&[0x1E, 0x2F, 0x40, 0xF0], 0).unwrap();
        cpu
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut cpu = scenario_cpu();

        assert_eq!(cpu.step(), Some(Instruction::Lda { addr: Nibble::new(0xE) }));
        assert_eq!(cpu.register_value(Register::Ac), 9);
        assert_eq!(cpu.register_value(Register::Pc), 1);

        cpu.step();
        assert_eq!(cpu.register_value(Register::Ac), 1);
        assert!(cpu.flag_value(Flag::C));
        assert!(!cpu.flag_value(Flag::Z));
        assert_eq!(cpu.register_value(Register::Pc), 2);

        cpu.step();
        assert_eq!(cpu.take_last_output(), Some(Nibble::new(1)));
        assert!(!cpu.flag_value(Flag::C), "OUT clears carry");

        assert_eq!(cpu.step(), Some(Instruction::Hlt));
        assert!(cpu.is_halted());

        let before = cpu.snapshot();
        assert_eq!(cpu.step(), None);
        let after = cpu.snapshot();
        assert_eq!(after.last_action, HALTED_MESSAGE);
        assert_eq!(
            CpuSnapshot { last_action: before.last_action.clone(), ..after },
            before
        );
    }

    #[test]
    fn test_action_descriptions() {
        let mut cpu = scenario_cpu();
        assert_eq!(cpu.last_action_description(), RESET_MESSAGE);

        cpu.step();
        assert_eq!(cpu.last_action_description(), "LDA E: Loaded M[0xE](9) into AC.");
        cpu.step();
        assert_eq!(cpu.last_action_description(), "ADD F: Added M[0xF](8) to AC(9). New AC is 1.");
        cpu.step();
        assert_eq!(cpu.last_action_description(), "OUT: Output value 1 from AC.");
        cpu.step();
        assert_eq!(cpu.last_action_description(), "HLT: CPU execution halted.");
    }

    #[test]
    fn test_output_drains() {
        let mut cpu = scenario_cpu();
        cpu.run_limited(3);

        assert_eq!(cpu.take_last_output(), Some(Nibble::new(1)));
        assert_eq!(cpu.take_last_output(), None);
    }

    #[test]
    fn test_accessors_are_idempotent() {
        let mut cpu = scenario_cpu();
        cpu.step();

        assert_eq!(cpu.memory_state(), cpu.memory_state());
        assert_eq!(cpu.register_value(Register::Mar), cpu.register_value(Register::Mar));
        assert_eq!(cpu.flag_value(Flag::Z), cpu.flag_value(Flag::Z));
        assert_eq!(cpu.is_halted(), cpu.is_halted());
        assert_eq!(cpu.snapshot(), cpu.snapshot());
    }

    #[test]
    fn test_unknown_opcode_is_nop() {
        let mut cpu = Cpu::new();
        cpu.load_program(&[0x7A, 0xF0], 0).unwrap();

        let instr = cpu.step();
        assert_eq!(instr.map(|i| i.mnemonic()), Some("NOP"));
        assert_eq!(cpu.register_value(Register::Pc), 1);
        assert_eq!(cpu.register_value(Register::Ac), 0);
        assert_eq!(cpu.last_action_description(), "NOP: Unknown opcode 0111.");
    }

    #[test]
    fn test_sta_and_lda_mask_to_four_bits() {
        let mut cpu = Cpu::new();
        cpu.set_data_in_memory(10, 0xAB);
        cpu.load_program(&[0x1A, 0x3B, 0xF0], 0).unwrap();
        cpu.run_limited(2);

        assert_eq!(cpu.register_value(Register::Ac), 0xB);
        assert_eq!(cpu.memory_state()[11].value(), 0x0B);
        assert_eq!(cpu.register_value(Register::Mar), 0xB);

        // Fetching HLT points MAR back at the instruction.
        cpu.step();
        assert!(cpu.is_halted());
        assert_eq!(cpu.register_value(Register::Mar), 2);
    }

    #[test]
    fn test_zero_flag_after_add_wraps_to_zero() {
        let mut cpu = Cpu::new();
        cpu.set_data_in_memory(14, 8);
        cpu.load_program(&[0x1E, 0x2E, 0xF0], 0).unwrap();
        cpu.run_limited(2);

        assert_eq!(cpu.register_value(Register::Ac), 0);
        assert!(cpu.flag_value(Flag::Z));
        assert!(cpu.flag_value(Flag::C));

        // HLT is not ADD, so it clears C.
        cpu.step();
        assert!(cpu.flag_value(Flag::Z));
        assert!(!cpu.flag_value(Flag::C));
    }

    #[test]
    fn test_deserialized_registers_stay_in_width() {
        let mut cpu = scenario_cpu();
        let json = serde_json::to_string(&cpu).unwrap();
        assert!(json.contains(r#""pc":0"#));

        let mut restored: Cpu = serde_json::from_str(&json.replacen(r#""pc":0"#, r#""pc":200"#, 1)).unwrap();
        assert_eq!(restored.register_value(Register::Pc), 200 & 0x0F);
        assert!(restored.step().is_some());
        assert_eq!(restored.register_value(Register::Pc), 9);

        cpu.step();
        let round_trip: Cpu = serde_json::from_str(&serde_json::to_string(&cpu).unwrap()).unwrap();
        assert_eq!(round_trip.snapshot(), cpu.snapshot());
    }

    #[test]
    fn test_pc_wraps_without_halt() {
        let mut cpu = Cpu::new();
        let executed = cpu.run_limited(17);

        assert_eq!(executed, 17);
        assert_eq!(cpu.register_value(Register::Pc), 1);
        assert!(!cpu.is_halted());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut cpu = scenario_cpu();
        cpu.run_limited(10);
        cpu.reset();

        assert_eq!(cpu.snapshot(), Cpu::new().snapshot());
        assert_eq!(cpu.take_last_output(), None);
        assert!(cpu.flag_value(Flag::Z));
    }

    #[test]
    fn test_strict_policy_refuses_wide_data() {
        let mut cpu = Cpu::with_policy(InputPolicy::Strict);
        assert_eq!(cpu.policy(), InputPolicy::Strict);
        assert_eq!(
            cpu.set_data_in_memory(0, 0x100),
            WriteOutcome::Rejected(Rejection::ValueTooWide)
        );
        assert!(cpu.load_program(&[0; 17], 0).is_err());
        assert!(cpu.memory_state().iter().all(|b| b.is_zero()));
    }

    #[test]
    fn test_disassemble() {
        assert_eq!(Cpu::disassemble(Byte::new(0x1E)), "LDA E");
        assert_eq!(Cpu::disassemble(Byte::new(0x2F)), "ADD F");
        assert_eq!(Cpu::disassemble(Byte::new(0x33)), "STA 3");
        assert_eq!(Cpu::disassemble(Byte::new(0x40)), "OUT");
        assert_eq!(Cpu::disassemble(Byte::new(0xF0)), "HLT");
        assert_eq!(Cpu::disassemble(Byte::new(0x00)), "NOP");
    }
}
