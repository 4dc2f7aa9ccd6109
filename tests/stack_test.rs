//! Tests for PHA, PHP, PLA and PLP.

use emu6502::{FlatMemory, MemoryBus, Status, CPU};

/// Helper function to create a CPU with reset vector at 0x8000 and the
/// stack pointer at the top of the stack page
fn setup_cpu(program: &[u8]) -> CPU<FlatMemory> {
    let mut memory = FlatMemory::new();
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);
    for (i, &byte) in program.iter().enumerate() {
        memory.write(0x8000 + i as u16, byte);
    }
    let mut cpu = CPU::new(memory);
    cpu.set_sp(0xFF);
    cpu
}

#[test]
fn test_pha() {
    let mut cpu = setup_cpu(&[0x48]);
    cpu.set_a(0x42);

    cpu.step().unwrap();

    assert_eq!(cpu.memory().read(0x01FF), 0x42);
    assert_eq!(cpu.sp(), 0xFE);
    assert_eq!(cpu.pc(), 0x8001);
}

#[test]
fn test_pha_pla_roundtrip() {
    // PHA ; LDA #$00 ; PLA
    let mut cpu = setup_cpu(&[0x48, 0xA9, 0x00, 0x68]);
    cpu.set_a(0x99);

    for _ in 0..3 {
        cpu.step().unwrap();
    }

    assert_eq!(cpu.a(), 0x99);
    assert!(cpu.flag_n());
    assert!(!cpu.flag_z());
    assert_eq!(cpu.sp(), 0xFF);
}

#[test]
fn test_pla_sets_zero() {
    let mut cpu = setup_cpu(&[0x68]);
    cpu.set_a(0x10);
    cpu.memory_mut().write(0x0100, 0x00);

    // SP = 0xFF wraps to 0x00 on pull
    cpu.step().unwrap();

    assert_eq!(cpu.a(), 0x00);
    assert!(cpu.flag_z());
    assert_eq!(cpu.sp(), 0x00);
}

#[test]
fn test_php_sets_bits_4_and_5_on_copy() {
    let mut cpu = setup_cpu(&[0x08]);
    cpu.set_status(Status::CARRY | Status::NEGATIVE);

    cpu.step().unwrap();

    assert_eq!(cpu.memory().read(0x01FF), 0xB1);
    assert_eq!(cpu.status(), Status::CARRY | Status::NEGATIVE);
}

#[test]
fn test_plp_keeps_full_byte() {
    let mut cpu = setup_cpu(&[0x28]);
    cpu.set_sp(0xFE);
    cpu.memory_mut().write(0x01FF, 0xFF);

    cpu.step().unwrap();

    assert_eq!(cpu.status().bits(), 0xFF);
    assert!(cpu.flag_c() && cpu.flag_z() && cpu.flag_i() && cpu.flag_d());
    assert!(cpu.flag_v() && cpu.flag_n());
}

#[test]
fn test_push_wraps_below_stack_page() {
    let mut cpu = setup_cpu(&[0x48, 0x48]);
    cpu.set_sp(0x00);
    cpu.set_a(0x5A);

    cpu.step().unwrap();
    cpu.step().unwrap();

    assert_eq!(cpu.memory().read(0x0100), 0x5A);
    assert_eq!(cpu.memory().read(0x01FF), 0x5A);
    assert_eq!(cpu.sp(), 0xFE);
    // Nothing leaks out of page one
    assert_eq!(cpu.memory().read(0x0000), 0x00);
    assert_eq!(cpu.memory().read(0x0200), 0x00);
}
