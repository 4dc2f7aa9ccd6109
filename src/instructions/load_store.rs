//! # Load and Store Instructions
//!
//! This module implements load and store operations:
//! - LDA: Load Accumulator
//! - LDX: Load X Register
//! - LDY: Load Y Register
//! - STA: Store Accumulator
//! - STX: Store X Register
//! - STY: Store Y Register
//!
//! The effective address has already been resolved by the dispatcher. For
//! immediate mode it is the address of the operand byte itself.

use crate::{MemoryBus, CPU};

/// Executes the LDA (Load Accumulator) instruction.
///
/// Loads a byte of memory into the accumulator, setting the zero and negative
/// flags as appropriate.
///
/// # Flag Behavior
///
/// - Zero (Z): Set if A = 0
/// - Negative (N): Set if bit 7 of A is set
/// - Other flags: Not affected
pub(crate) fn execute_lda<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    let value = cpu.read_byte(addr);
    cpu.regs.a = value;
    cpu.regs.set_zero_negative(value);
}

/// Executes the LDX (Load X Register) instruction.
///
/// Same flag behavior as LDA, applied to X.
pub(crate) fn execute_ldx<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    let value = cpu.read_byte(addr);
    cpu.regs.x = value;
    cpu.regs.set_zero_negative(value);
}

/// Executes the LDY (Load Y Register) instruction.
///
/// Same flag behavior as LDA, applied to Y.
pub(crate) fn execute_ldy<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    let value = cpu.read_byte(addr);
    cpu.regs.y = value;
    cpu.regs.set_zero_negative(value);
}

/// Executes the STA (Store Accumulator) instruction.
///
/// No flags are affected. Stores to ROM or unmapped addresses are dropped by
/// the bus.
pub(crate) fn execute_sta<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    let value = cpu.regs.a;
    cpu.write_byte(addr, value);
}

/// Executes the STX (Store X Register) instruction.
pub(crate) fn execute_stx<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    let value = cpu.regs.x;
    cpu.write_byte(addr, value);
}

/// Executes the STY (Store Y Register) instruction.
pub(crate) fn execute_sty<M: MemoryBus>(cpu: &mut CPU<M>, addr: u16) {
    let value = cpu.regs.y;
    cpu.write_byte(addr, value);
}
