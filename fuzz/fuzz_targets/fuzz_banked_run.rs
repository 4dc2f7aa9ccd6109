//! Fuzz target for banked-mode execution.
//!
//! Builds a banked machine from an arbitrary ROM and runs it under a small
//! budget. ROM writes and open-bus accesses must never panic, and ROM bytes
//! must survive the run untouched.

#![no_main]

use emu6502::memory::pad_with_vectors;
use emu6502::{MemoryBus, CPU};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (bool, Vec<u8>)| {
    let (wram, program) = data;
    let rom = pad_with_vectors(program, 0x8000, 0x8000, 0x8000);
    let expected = rom.clone();

    let Ok(mut cpu) = CPU::banked(rom, wram, 256) else {
        return;
    };

    let _ = cpu.run();

    for addr in 0x8000..=0xFFFFu16 {
        assert_eq!(cpu.memory().read(addr), expected[addr as usize % expected.len()]);
    }
});
