//! # Increment and Decrement Instructions
//!
//! This module implements increment and decrement operations:
//! - INC / DEC: Read-Modify-Write on a memory byte
//! - INX / INY / DEX / DEY: Index register forms
//!
//! All wrap modulo 256 and set Z and N from the result. Carry and overflow are
//! never touched.

use crate::opcodes::Modify;
use crate::{MemoryBus, CPU};

/// Applies `op` to the byte at `addr` and writes the result back.
///
/// # Flag Behavior
///
/// - Zero (Z): Set if result = 0
/// - Negative (N): Set if bit 7 of result is set
pub(crate) fn execute_modify<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16, op: Modify) {
    let value = cpu.read_byte(addr);
    let result = match op {
        Modify::Inc => value.wrapping_add(1),
        Modify::Dec => value.wrapping_sub(1),
    };

    cpu.write_byte(addr, result);
    cpu.regs.set_zero_negative(result);
}

/// Executes the INX (Increment X Register) instruction.
pub(crate) fn execute_inx<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.x = cpu.regs.x.wrapping_add(1);
    cpu.regs.set_zero_negative(cpu.regs.x);
}

/// Executes the INY (Increment Y Register) instruction.
pub(crate) fn execute_iny<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.y = cpu.regs.y.wrapping_add(1);
    cpu.regs.set_zero_negative(cpu.regs.y);
}

/// Executes the DEX (Decrement X Register) instruction.
pub(crate) fn execute_dex<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.x = cpu.regs.x.wrapping_sub(1);
    cpu.regs.set_zero_negative(cpu.regs.x);
}

/// Executes the DEY (Decrement Y Register) instruction.
pub(crate) fn execute_dey<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.y = cpu.regs.y.wrapping_sub(1);
    cpu.regs.set_zero_negative(cpu.regs.y);
}
