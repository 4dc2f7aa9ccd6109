//! # Stack Operations
//!
//! This module implements stack manipulation instructions:
//! - PHA: Push Accumulator on Stack
//! - PHP: Push Processor Status on Stack
//! - PLA: Pull Accumulator from Stack
//! - PLP: Pull Processor Status from Stack
//!
//! The 6502 stack is located at memory addresses 0x0100-0x01FF and grows downward.
//! The stack pointer (SP) is an 8-bit register that serves as an offset into this
//! page. The full stack address is calculated as 0x0100 | SP.

use crate::registers::Status;
use crate::{MemoryBus, CPU};

/// Bits 4 and 5 of a status byte pushed by PHP.
const PUSHED_STATUS_BITS: u8 = 0x30;

/// Executes the PHA (Push Accumulator) instruction.
///
/// Flags affected: None
pub(crate) fn execute_pha<M: MemoryBus>(cpu: &mut CPU<M>) {
    let value = cpu.regs.a;
    cpu.push_byte(value);
}

/// Executes the PHP (Push Processor Status) instruction.
///
/// The pushed copy has bits 4 and 5 set; the live register is unchanged.
pub(crate) fn execute_php<M: MemoryBus>(cpu: &mut CPU<M>) {
    let value = cpu.regs.status.bits() | PUSHED_STATUS_BITS;
    cpu.push_byte(value);
}

/// Executes the PLA (Pull Accumulator) instruction.
///
/// # Flag Behavior
///
/// - Zero (Z): Set if pulled value = 0
/// - Negative (N): Set if bit 7 of pulled value is set
pub(crate) fn execute_pla<M: MemoryBus>(cpu: &mut CPU<M>) {
    let value = cpu.pull_byte();
    cpu.regs.a = value;
    cpu.regs.set_zero_negative(value);
}

/// Executes the PLP (Pull Processor Status) instruction.
///
/// The full byte is kept, unnamed bits included.
pub(crate) fn execute_plp<M: MemoryBus>(cpu: &mut CPU<M>) {
    let value = cpu.pull_byte();
    cpu.regs.status = Status::from_bits_retain(value);
}
