//! Property-based tests for CPU invariants.
//!
//! These tests use proptest to verify that CPU operations maintain
//! fundamental invariants across all possible input combinations.

use emu6502::opcodes::Operation;
use emu6502::registers::{decode_offset, relative_target};
use emu6502::{Category, Config, ExecutionError, FlatMemory, MemoryBus, Status, CPU, OPCODE_TABLE};
use proptest::prelude::*;

/// Helper function to create a CPU with reset vector at 0x8000
fn setup_cpu() -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    CPU::new(memory)
}

/// Opcodes that advance PC by their encoded length (no branches or jumps)
fn sequential_opcodes() -> Vec<u8> {
    OPCODE_TABLE
        .iter()
        .flatten()
        .filter(|i| matches!(i.category, Category::Standard { .. } | Category::ReadModifyWrite { .. }))
        .map(|i| i.opcode)
        .collect()
}

/// Opcodes with no table entry
fn unknown_opcodes() -> Vec<u8> {
    (0..=255u8).filter(|&op| OPCODE_TABLE[op as usize].is_none()).collect()
}

/// Opcodes whose result lands in a register and drives Z/N
fn register_result_opcodes() -> Vec<u8> {
    OPCODE_TABLE
        .iter()
        .flatten()
        .filter(|i| {
            matches!(
                i.category,
                Category::Standard {
                    op: Operation::Lda
                        | Operation::Ldx
                        | Operation::Ldy
                        | Operation::Tax
                        | Operation::Tay
                        | Operation::Tsx
                        | Operation::Txa
                        | Operation::Tya
                        | Operation::Inx
                        | Operation::Iny
                        | Operation::Dex
                        | Operation::Dey
                        | Operation::Pla,
                    ..
                }
            )
        })
        .map(|i| i.opcode)
        .collect()
}

/// Which register an opcode from `register_result_opcodes` writes
fn result_register(cpu: &CPU<FlatMemory>, opcode: u8) -> u8 {
    match OPCODE_TABLE[opcode as usize].map(|i| i.category) {
        Some(Category::Standard { op, .. }) => match op {
            Operation::Ldx | Operation::Tax | Operation::Tsx | Operation::Inx | Operation::Dex => cpu.x(),
            Operation::Ldy | Operation::Tay | Operation::Iny | Operation::Dey => cpu.y(),
            _ => cpu.a(),
        },
        _ => unreachable!("not a register result opcode"),
    }
}

// ========== Execution Properties ==========

proptest! {
    /// Property: Standard and Read-Modify-Write instructions advance PC by
    /// exactly their encoded length
    #[test]
    fn prop_pc_advances_by_instruction_length(
        opcode in prop::sample::select(sequential_opcodes()),
        operand1 in 0u8..=255u8,
        operand2 in 0u8..=0x7Fu8,
        sp in 0u8..=255u8,
    ) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8000, opcode);
        cpu.memory_mut().write(0x8001, operand1);
        cpu.memory_mut().write(0x8002, operand2);
        cpu.set_sp(sp);

        let length = OPCODE_TABLE[opcode as usize].unwrap().length() as u16;
        prop_assert_eq!(cpu.step(), Ok(None));
        prop_assert_eq!(cpu.pc(), 0x8000 + length);
        prop_assert_eq!(cpu.instruction_count(), 1);
    }

    /// Property: Z and N always mirror the register an instruction wrote
    #[test]
    fn prop_zero_negative_match_result(
        opcode in prop::sample::select(register_result_opcodes()),
        a in 0u8..=255u8,
        x in 0u8..=255u8,
        y in 0u8..=255u8,
        sp in 0u8..=255u8,
        operand in 0u8..=255u8,
        memory_value in 0u8..=255u8,
    ) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8000, opcode);
        cpu.memory_mut().write(0x8001, operand);
        cpu.memory_mut().write(0x8002, 0x02);
        cpu.set_a(a);
        cpu.set_x(x);
        cpu.set_y(y);
        cpu.set_sp(sp);
        cpu.set_status(Status::ZERO | Status::NEGATIVE);

        // Give every data read something to find outside the program
        for addr in 0x0000..=0x03FFu16 {
            cpu.memory_mut().write(addr, memory_value);
        }

        prop_assert_eq!(cpu.step(), Ok(None));

        let value = result_register(&cpu, opcode);
        prop_assert_eq!(cpu.flag_z(), value == 0);
        prop_assert_eq!(cpu.flag_n(), value & 0x80 != 0);
    }

    /// Property: Unknown opcodes halt on the first step and touch nothing
    #[test]
    fn prop_unknown_opcode_halts_cleanly(
        opcode in prop::sample::select(unknown_opcodes()),
        a in 0u8..=255u8,
        sp in 0u8..=255u8,
    ) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8000, opcode);
        cpu.set_a(a);
        cpu.set_sp(sp);
        let before = cpu.registers();

        prop_assert_eq!(cpu.step(), Err(ExecutionError::UnknownOpcode { opcode, pc: 0x8000 }));
        prop_assert_eq!(cpu.registers(), before);
        prop_assert_eq!(cpu.instruction_count(), 0);
    }

    /// Property: The budget bounds the number of executed instructions
    #[test]
    fn prop_budget_bounds_execution(budget in 1u64..200) {
        let mut memory = FlatMemory::new();
        memory.write(0xFFFC, 0x00);
        memory.write(0xFFFD, 0x02);
        // NOP sled through RAM, wrapping back to 0x0000 is fine
        for addr in 0x0200..=0x02FFu16 {
            memory.write(addr, 0xEA);
        }
        let mut cpu = CPU::with_config(memory, Config::default().with_budget(budget));

        prop_assert!(cpu.run().is_ok());
        prop_assert_eq!(cpu.instruction_count(), budget);
        prop_assert_eq!(cpu.pc(), 0x0200 + budget as u16);
    }
}

// ========== Branch Offset Properties ==========

proptest! {
    /// Property: decoding then re-encoding an offset reproduces it
    #[test]
    fn prop_branch_offset_roundtrip(offset in 0u8..=255u8) {
        let (magnitude, negative) = decode_offset(offset);
        let reencoded = if negative {
            (magnitude as u8).wrapping_neg()
        } else {
            magnitude as u8
        };

        prop_assert_eq!(reencoded, offset);
        prop_assert!(magnitude <= 128);
    }

    /// Property: the branch target is PC + 2 plus the signed displacement
    #[test]
    fn prop_relative_target_matches_signed_add(pc in 0u16..=0xFFFF, offset in 0u8..=255u8) {
        let expected = pc.wrapping_add(2).wrapping_add_signed(offset as i8 as i16);
        prop_assert_eq!(relative_target(pc, offset), expected);
    }

    /// Property: a taken branch executed by the CPU lands on the computed target
    #[test]
    fn prop_taken_branch_lands_on_target(offset in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.memory_mut().write(0x8000, 0xD0); // BNE, Z clear
        cpu.memory_mut().write(0x8001, offset);

        prop_assert_eq!(cpu.step(), Ok(None));
        prop_assert_eq!(cpu.pc(), relative_target(0x8000, offset));
    }
}

// ========== Stack Properties ==========

proptest! {
    /// Property: a pushed word pulls back unchanged
    #[test]
    fn prop_stack_word_roundtrip(value in 0u16..=0xFFFF, sp in 0u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_sp(sp);

        cpu.push_word(value);
        prop_assert_eq!(cpu.sp(), sp.wrapping_sub(2));
        prop_assert_eq!(cpu.pull_word(), value);
        prop_assert_eq!(cpu.sp(), sp);
    }

    /// Property: N pushes followed by N pulls restore SP and return bytes in
    /// reverse order
    #[test]
    fn prop_push_pull_restores_sp(
        values in prop::collection::vec(0u8..=255u8, 0..300),
        sp in 0u8..=255u8,
    ) {
        let mut cpu = setup_cpu();
        cpu.set_sp(sp);

        for &v in &values {
            cpu.push_byte(v);
        }
        prop_assert_eq!(cpu.sp(), sp.wrapping_sub(values.len() as u8));

        let mut pulled = Vec::new();
        for _ in &values {
            pulled.push(cpu.pull_byte());
        }
        prop_assert_eq!(cpu.sp(), sp);

        // Only the last 256 pushes survive a wrapped stack
        let expected: Vec<u8> = values.iter().rev().copied().collect();
        let kept = expected.len().min(256);
        prop_assert_eq!(&pulled[..kept], &expected[..kept]);
    }

    /// Property: stack traffic never leaves page one
    #[test]
    fn prop_stack_stays_in_page_one(sp in 0u8..=255u8, value in 1u8..=255u8) {
        let mut cpu = setup_cpu();
        cpu.set_sp(sp);
        cpu.push_byte(value);

        prop_assert_eq!(cpu.memory().read(0x0100 | sp as u16), value);
        prop_assert_eq!(cpu.read_range(0x0000, 0x00FF), vec![0u8; 256]);
        prop_assert_eq!(cpu.read_range(0x0200, 0x02FF), vec![0u8; 256]);
    }
}
