//! Built-in demonstration program: 9 + 8 with carry.

use crate::cpu::Cpu;
use crate::cpu::memory::{LoadReport, MemoryError};

/// LDA E, ADD F, OUT, HLT.
pub const DEMO_PROGRAM: [u8; 4] = [
    0b0001_1110, // LDA E
    0b0010_1111, // ADD F: 9 + 8 = 17, AC = 1, C = 1
    0b0100_0000, // OUT
    0b1111_0000, // HLT
];

/// Operands placed in the top two cells.
pub const DEMO_DATA: [(usize, u32); 2] = [(14, 9), (15, 8)];

/// Reset the CPU and install the demo program and its data.
pub fn load_demo(cpu: &mut Cpu) -> Result<LoadReport, MemoryError> {
    cpu.reset();
    for (address, value) in DEMO_DATA {
        cpu.set_data_in_memory(address, value);
    }
    cpu.load_program(&DEMO_PROGRAM, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::{Flag, Register};
    use crate::signal::Nibble;

    #[test]
    fn test_demo_outputs_one_with_carry() {
        let mut cpu = Cpu::new();
        load_demo(&mut cpu).unwrap();

        assert_eq!(cpu.run_limited(100), 4);
        assert!(cpu.is_halted());
        assert!(!cpu.flag_value(Flag::C), "HLT clears carry");
        assert_eq!(cpu.register_value(Register::Ac), 1);
        assert_eq!(cpu.take_last_output(), Some(Nibble::new(1)));
    }

    #[test]
    fn test_demo_replaces_previous_state() {
        let mut cpu = Cpu::new();
        cpu.set_data_in_memory(7, 0xFF);
        load_demo(&mut cpu).unwrap();
        assert!(cpu.memory_state()[7].is_zero());
        assert_eq!(cpu.memory_state()[14].value(), 9);
    }
}
