//! # Register Transfer Instructions
//!
//! This module implements register-to-register transfers:
//! - TAX: Transfer Accumulator to X
//! - TAY: Transfer Accumulator to Y
//! - TSX: Transfer Stack Pointer to X
//! - TXA: Transfer X to Accumulator
//! - TXS: Transfer X to Stack Pointer
//! - TYA: Transfer Y to Accumulator
//!
//! Every transfer updates Z and N from the copied value, except TXS.

use crate::{MemoryBus, CPU};

/// Executes the TAX (Transfer Accumulator to X) instruction.
pub(crate) fn execute_tax<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.x = cpu.regs.a;
    cpu.regs.set_zero_negative(cpu.regs.x);
}

/// Executes the TAY (Transfer Accumulator to Y) instruction.
pub(crate) fn execute_tay<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.y = cpu.regs.a;
    cpu.regs.set_zero_negative(cpu.regs.y);
}

/// Executes the TSX (Transfer Stack Pointer to X) instruction.
pub(crate) fn execute_tsx<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.x = cpu.regs.sp;
    cpu.regs.set_zero_negative(cpu.regs.x);
}

/// Executes the TXA (Transfer X to Accumulator) instruction.
pub(crate) fn execute_txa<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.a = cpu.regs.x;
    cpu.regs.set_zero_negative(cpu.regs.a);
}

/// Executes the TXS (Transfer X to Stack Pointer) instruction.
///
/// Unlike the other transfers, TXS leaves every flag alone.
pub(crate) fn execute_txs<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.sp = cpu.regs.x;
}

/// Executes the TYA (Transfer Y to Accumulator) instruction.
pub(crate) fn execute_tya<M: MemoryBus>(cpu: &mut CPU<M>) {
    cpu.regs.a = cpu.regs.y;
    cpu.regs.set_zero_negative(cpu.regs.a);
}
