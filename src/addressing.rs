//! # Addressing Modes
//!
//! This module defines the addressing modes used by the instruction table and
//! the resolver that turns a mode plus the current program counter into an
//! effective address and an encoded instruction length.

use crate::registers::relative_target;
use crate::{MemoryBus, CPU};

/// 6502 addressing mode enumeration.
///
/// The addressing mode determines how the CPU interprets the operand bytes
/// that follow an opcode and how it calculates the effective memory address
/// for the operation.
///
/// # Operand Sizes
///
/// - **0 bytes**: Implied
/// - **1 byte**: Immediate, ZeroPage, ZeroPageX, ZeroPageY, Relative, IndirectX, IndirectY
/// - **2 bytes**: Absolute, AbsoluteX, AbsoluteY, Indirect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    /// No operand, operation implied by instruction.
    ///
    /// Examples: CLD, RTS, NOP
    Implied,

    /// 8-bit constant operand in instruction. The effective address is the
    /// operand byte itself.
    ///
    /// Example: LDA #$10
    Immediate,

    /// 8-bit address in zero page (0x00-0xFF).
    ///
    /// Example: LDA $80
    ZeroPage,

    /// Zero page address indexed by X register, wrapping within zero page.
    ///
    /// Example: LDA $80,X
    ZeroPageX,

    /// Zero page address indexed by Y register, wrapping within zero page.
    ///
    /// Example: LDX $80,Y
    ZeroPageY,

    /// Full 16-bit address.
    ///
    /// Example: JMP $1234
    Absolute,

    /// 16-bit address indexed by X register.
    ///
    /// Example: LDA $1234,X
    AbsoluteX,

    /// 16-bit address indexed by Y register.
    ///
    /// Example: LDA $1234,Y
    AbsoluteY,

    /// Indexed indirect: (ZP + X) then dereference.
    ///
    /// Example: LDA ($40,X)
    IndirectX,

    /// Indirect indexed: ZP dereference then + Y.
    ///
    /// Example: LDA ($40),Y
    IndirectY,

    /// Indirect jump through 16-bit pointer. Only used by JMP.
    ///
    /// Example: JMP ($FFFC)
    Indirect,

    /// Signed 8-bit offset for branch instructions, relative to the address
    /// following the branch.
    ///
    /// Example: BEQ label
    Relative,
}

impl AddressingMode {
    /// Total encoded instruction length in bytes (opcode + operands).
    pub const fn length(self) -> u8 {
        match self {
            AddressingMode::Implied => 1,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY
            | AddressingMode::Relative => 2,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 3,
        }
    }
}

/// Result of resolving an addressing mode at a given program counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    /// Effective address, or `None` for implied-mode instructions.
    ///
    /// For `Relative` this is the branch target.
    pub address: Option<u16>,

    /// Encoded instruction length in bytes (1-3).
    pub length: u8,
}

/// Resolves `mode` against the CPU's current PC and index registers.
///
/// Operand and pointer bytes are read through the CPU so they show up in the
/// last-read observation. Indexing never special-cases page boundaries.
pub(crate) fn resolve<M: MemoryBus>(cpu: &mut CPU<M>, mode: AddressingMode) -> Operand {
    let pc = cpu.regs.pc;
    let operand_addr = pc.wrapping_add(1);

    let address = match mode {
        AddressingMode::Implied => None,
        AddressingMode::Immediate => Some(operand_addr),
        AddressingMode::ZeroPage => Some(cpu.read_byte(operand_addr) as u16),
        AddressingMode::ZeroPageX => {
            let base = cpu.read_byte(operand_addr);
            Some(base.wrapping_add(cpu.regs.x) as u16)
        }
        AddressingMode::ZeroPageY => {
            let base = cpu.read_byte(operand_addr);
            Some(base.wrapping_add(cpu.regs.y) as u16)
        }
        AddressingMode::Absolute => Some(cpu.read_word(operand_addr)),
        AddressingMode::AbsoluteX => {
            let base = cpu.read_word(operand_addr);
            Some(base.wrapping_add(cpu.regs.x as u16))
        }
        AddressingMode::AbsoluteY => {
            let base = cpu.read_word(operand_addr);
            Some(base.wrapping_add(cpu.regs.y as u16))
        }
        AddressingMode::IndirectX => {
            let pointer = cpu.read_byte(operand_addr).wrapping_add(cpu.regs.x);
            Some(cpu.read_word(pointer as u16))
        }
        AddressingMode::IndirectY => {
            let pointer = cpu.read_byte(operand_addr);
            let base = cpu.read_word(pointer as u16);
            Some(base.wrapping_add(cpu.regs.y as u16))
        }
        AddressingMode::Indirect => {
            let pointer = cpu.read_word(operand_addr);
            Some(cpu.read_word(pointer))
        }
        AddressingMode::Relative => {
            let offset = cpu.read_byte(operand_addr);
            Some(relative_target(pc, offset))
        }
    };

    Operand {
        address,
        length: mode.length(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, FlatMemory};

    fn setup_cpu() -> CPU<FlatMemory> {
        let mut memory = FlatMemory::new();
        memory.write(0xFFFC, 0x00);
        memory.write(0xFFFD, 0x80);
        CPU::with_config(memory, Config::default())
    }

    #[test]
    fn test_implied_has_no_address() {
        let mut cpu = setup_cpu();
        let operand = resolve(&mut cpu, AddressingMode::Implied);
        assert_eq!(operand, Operand { address: None, length: 1 });
    }

    #[test]
    fn test_immediate_points_at_operand_byte() {
        let mut cpu = setup_cpu();
        let operand = resolve(&mut cpu, AddressingMode::Immediate);
        assert_eq!(operand.address, Some(0x8001));
        assert_eq!(operand.length, 2);
    }

    #[test]
    fn test_zero_page_x_wraps() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8001, 0xF0);
        cpu.set_x(0x20);

        let operand = resolve(&mut cpu, AddressingMode::ZeroPageX);
        assert_eq!(operand.address, Some(0x0010));
    }

    #[test]
    fn test_absolute_y_crosses_page_without_penalty() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8001, 0xFF);
        cpu.memory_mut().write(0x8002, 0x12);
        cpu.set_y(0x01);

        let operand = resolve(&mut cpu, AddressingMode::AbsoluteY);
        assert_eq!(operand.address, Some(0x1300));
        assert_eq!(operand.length, 3);
    }

    #[test]
    fn test_absolute_x_wraps_address_space() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8001, 0xFF);
        cpu.memory_mut().write(0x8002, 0xFF);
        cpu.set_x(0x02);

        let operand = resolve(&mut cpu, AddressingMode::AbsoluteX);
        assert_eq!(operand.address, Some(0x0001));
    }

    #[test]
    fn test_indirect_x() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8001, 0x40);
        cpu.memory_mut().write(0x0045, 0x34);
        cpu.memory_mut().write(0x0046, 0x12);
        cpu.set_x(0x05);

        let operand = resolve(&mut cpu, AddressingMode::IndirectX);
        assert_eq!(operand.address, Some(0x1234));
        assert_eq!(operand.length, 2);
    }

    #[test]
    fn test_indirect_y() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8001, 0x40);
        cpu.memory_mut().write(0x0040, 0xF0);
        cpu.memory_mut().write(0x0041, 0x12);
        cpu.set_y(0x20);

        let operand = resolve(&mut cpu, AddressingMode::IndirectY);
        assert_eq!(operand.address, Some(0x1310));
    }

    #[test]
    fn test_indirect() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8001, 0x00);
        cpu.memory_mut().write(0x8002, 0x30);
        cpu.memory_mut().write(0x3000, 0xCD);
        cpu.memory_mut().write(0x3001, 0xAB);

        let operand = resolve(&mut cpu, AddressingMode::Indirect);
        assert_eq!(operand.address, Some(0xABCD));
        assert_eq!(operand.length, 3);
    }

    #[test]
    fn test_relative_resolves_branch_target() {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8001, 0xFC);

        let operand = resolve(&mut cpu, AddressingMode::Relative);
        assert_eq!(operand.address, Some(0x7FFE));
        assert_eq!(operand.length, 2);
    }

    #[test]
    fn test_resolve_does_not_move_pc() {
        let mut cpu = setup_cpu();
        let _ = resolve(&mut cpu, AddressingMode::Absolute);
        assert_eq!(cpu.pc(), 0x8000);
    }
}
