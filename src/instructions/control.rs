//! # Control Flow Instructions
//!
//! This module implements control flow operations:
//! - JMP: Jump to absolute or indirect address
//! - JSR: Jump to Subroutine
//! - RTS: Return from Subroutine
//! - RTI: Return from Interrupt
//!
//! These replace PC outright instead of advancing it.

use crate::registers::Status;
use crate::{MemoryBus, CPU};

/// Executes the JMP instruction.
pub(crate) fn execute_jmp<M: MemoryBus>(cpu: &mut CPU<M>, target: u16) {
    cpu.regs.pc = target;
}

/// Executes the JSR (Jump to Subroutine) instruction.
///
/// Pushes the address of the last byte of the JSR (PC + 2), high byte first,
/// then jumps to `target`.
///
/// Stack layout after JSR at 0x8000 with SP = 0xFF:
///
/// ```text
/// 0x01FF: 0x80  (high byte of 0x8002)
/// 0x01FE: 0x02  (low byte of 0x8002)
/// SP = 0xFD
/// ```
pub(crate) fn execute_jsr<M: MemoryBus>(cpu: &mut CPU<M>, target: u16) {
    let return_addr = cpu.regs.pc.wrapping_add(2);
    cpu.push_word(return_addr);
    cpu.regs.pc = target;
}

/// Executes the RTS (Return from Subroutine) instruction.
///
/// Pulls the address JSR pushed and resumes one byte after it, at the
/// instruction following the JSR.
pub(crate) fn execute_rts<M: MemoryBus>(cpu: &mut CPU<M>) {
    let return_addr = cpu.pull_word();
    cpu.regs.pc = return_addr.wrapping_add(1);
}

/// Executes the RTI (Return from Interrupt) instruction.
///
/// Pulls the status byte (unnamed bits retained), then the return address.
/// Unlike RTS the pulled address is used as-is.
pub(crate) fn execute_rti<M: MemoryBus>(cpu: &mut CPU<M>) {
    let status = cpu.pull_byte();
    cpu.regs.status = Status::from_bits_retain(status);
    cpu.regs.pc = cpu.pull_word();
}
