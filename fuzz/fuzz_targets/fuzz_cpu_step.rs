//! Fuzz target for CPU step execution.
//!
//! This target creates arbitrary CPU states and memory contents,
//! then executes a few instructions to find edge cases and crashes.

#![no_main]

use arbitrary::Arbitrary;
use emu6502::{Config, FlatMemory, Halt, MemoryBus, RunState, Status, CPU};
use libfuzzer_sys::fuzz_target;

/// Arbitrary CPU initial state for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzCpuState {
    a: u8,
    x: u8,
    y: u8,
    sp: u8,
    /// Raw status byte, unnamed bits included
    status: u8,
    test_mode: bool,
}

/// Memory region for fuzzing
#[derive(Debug, Arbitrary)]
struct FuzzMemory {
    /// Bytes at the PC location (a few instructions)
    instruction_bytes: [u8; 16],
    /// Zero page contents
    zero_page: [u8; 256],
    /// Stack page contents
    stack_page: [u8; 256],
    /// Small region of memory for absolute addressing
    main_memory: [u8; 256],
}

/// Complete fuzz input
#[derive(Debug, Arbitrary)]
struct FuzzInput {
    cpu_state: FuzzCpuState,
    memory: FuzzMemory,
    steps: u8,
}

fuzz_target!(|input: FuzzInput| {
    let mut memory = FlatMemory::new();

    // Reset vector to 0x8000
    memory.write(0xFFFC, 0x00);
    memory.write(0xFFFD, 0x80);

    for (i, &byte) in input.memory.instruction_bytes.iter().enumerate() {
        memory.write(0x8000 + i as u16, byte);
    }
    for (i, &byte) in input.memory.zero_page.iter().enumerate() {
        memory.write(i as u16, byte);
    }
    for (i, &byte) in input.memory.stack_page.iter().enumerate() {
        memory.write(0x0100 + i as u16, byte);
    }
    for (i, &byte) in input.memory.main_memory.iter().enumerate() {
        memory.write(0x4000 + i as u16, byte);
    }

    let config = Config::default()
        .with_test_mode(input.cpu_state.test_mode)
        .with_stuck_detection(true)
        .with_trace(true);
    let mut cpu = CPU::with_config(memory, config);

    cpu.set_a(input.cpu_state.a);
    cpu.set_x(input.cpu_state.x);
    cpu.set_y(input.cpu_state.y);
    cpu.set_sp(input.cpu_state.sp);
    cpu.set_status(Status::from_bits_retain(input.cpu_state.status));

    // Errors are fine, panics are not
    let mut executed = 0u64;
    for _ in 0..input.steps {
        match cpu.step() {
            Ok(None) => executed += 1,
            Ok(Some(_)) | Err(_) => break,
        }
    }

    // The counter tracks executed instructions exactly
    assert_eq!(cpu.instruction_count(), executed);

    // A halted CPU stays halted with the same reason
    if let RunState::Halted(halt) = cpu.state().clone() {
        let again = cpu.step();
        match halt {
            Halt::Failed(err) => assert_eq!(again, Err(err)),
            clean => assert_eq!(again, Ok(Some(clean))),
        }
        assert_eq!(cpu.instruction_count(), executed);
    }

    let _ = cpu.dump_registers();
});
